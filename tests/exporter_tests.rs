// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ipodesk::commands::{exporter, sample};
use ipodesk::{cli, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn sample_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    sample::handle(&mut conn).unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ipodesk", "export", "ipos"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_json_flattens_the_listing_stage() {
    let conn = sample_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("listed.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &[
            "--format", "json", "--out", &out_str, "--status", "listed", "--search", "digital",
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "3",
                "company_name": "Digital Innovations",
                "sector": "Technology",
                "price_band": { "min": "200", "max": "250" },
                "open_date": "2024-01-10",
                "close_date": "2024-01-12",
                "issue_size": "640",
                "issue_type": "Main Board",
                "lot_size": 75,
                "status": "listed",
                "listing_date": "2024-01-17",
                "ipo_price": "250.00",
                "listing_price": "284.00",
                "current_market_price": "312.00",
                "listing_gain": "13.60",
                "current_return": "24.80",
                "rhp_pdf": "rhp/3.pdf",
                "drhp_pdf": null
            }
        ])
    );
}

#[test]
fn export_csv_writes_header_and_blank_listing_cells() {
    let conn = sample_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("upcoming.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["--format", "CSV", "--out", &out_str, "--status", "upcoming"]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, exporter::IPO_CSV_HEADERS.to_vec());

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "Green Energy Ltd");
    assert_eq!(&rows[0][10], "upcoming");
    assert!((11..=16).all(|i| rows[0][i].is_empty()));
    assert_eq!(&rows[1][1], "FinEdge Capital");
}

#[test]
fn export_rejects_unknown_format_before_writing() {
    let conn = sample_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let err = export(&conn, &["--format", "xml", "--out", &out_str]).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out_path.exists());
}
