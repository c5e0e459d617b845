// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ipodesk::commands::{exporter, importer, sample};
use ipodesk::models::IpoStatus;
use ipodesk::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "id,company_name,sector,price_min,price_max,open_date,close_date,issue_size,issue_type,lot_size,status,listing_date,ipo_price,listing_price,current_market_price,listing_gain,current_return,rhp_pdf,drhp_pdf";

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for r in rows {
        writeln!(file, "{}", r).unwrap();
    }
    file.flush().unwrap();
    file
}

fn import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(["ipodesk", "import", "ipos", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn header_constant_matches_export_layout() {
    assert_eq!(exporter::IPO_CSV_HEADERS.join(","), HEADER);
}

#[test]
fn import_assigns_ids_and_derives_listing_percentages() {
    let mut conn = base_conn();
    let file = csv_file(&[
        ",Harbor Logistics,Logistics,95,100,2024-04-01,2024-04-03,310,Main Board,150,upcoming,,,,,,,,",
        "9,Aurora Pharma,Healthcare,400,420,2024-02-05,2024-02-07,\"1,050\",Main Board,35,listed,2024-02-12,420,462,504,,,rhp/9.pdf,",
    ]);
    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    import(&mut conn, &padded).unwrap();

    let book = db::load_book(&conn).unwrap();
    assert_eq!(book.len(), 2);
    let harbor = book.get("1").unwrap();
    assert_eq!(harbor.company_name, "Harbor Logistics");
    assert_eq!(harbor.status(), IpoStatus::Upcoming);
    assert_eq!(harbor.drhp_pdf, None);

    let aurora = book.get("9").unwrap();
    assert_eq!(aurora.issue_size, Decimal::new(1050, 0));
    let l = aurora.listing().unwrap();
    assert_eq!(l.listing_gain, Decimal::new(10, 0));
    assert_eq!(l.current_return, Decimal::new(20, 0));
    assert_eq!(aurora.rhp_pdf.as_deref(), Some("rhp/9.pdf"));
}

#[test]
fn import_is_all_or_nothing() {
    let mut conn = base_conn();
    let file = csv_file(&[
        "1,Good Row,Retail,10,12,2024-03-01,2024-03-03,50,SME,1000,ongoing,,,,,,,,",
        "2,Bad Row,Retail,10,12,2024-03-01,2024-03-03,50,SME,1000,listed,2024-03-08,12,,,,,,",
    ]);
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("Row 3"));
    assert!(db::load_book(&conn).unwrap().is_empty());
}

#[test]
fn import_rejects_ids_already_stored() {
    let mut conn = base_conn();
    sample::handle(&mut conn).unwrap();
    let before = db::load_book(&conn).unwrap().len();

    let file = csv_file(&[
        ",Fresh Issue,Retail,10,12,2024-03-01,2024-03-03,50,SME,1000,upcoming,,,,,,,,",
        "1,Clash,Retail,10,12,2024-03-01,2024-03-03,50,SME,1000,upcoming,,,,,,,,",
    ]);
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("already exists"));
    assert_eq!(db::load_book(&conn).unwrap().len(), before);
}

#[test]
fn import_rejects_listing_cells_on_unlisted_rows() {
    let mut conn = base_conn();
    let file = csv_file(&[
        "1,Early,Retail,10,12,2024-03-01,2024-03-03,50,SME,1000,upcoming,,,14,,,,,",
    ]);
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("has listing fields set"));
}

#[test]
fn exported_csv_imports_into_an_empty_database() {
    let source = {
        let mut conn = base_conn();
        sample::handle(&mut conn).unwrap();
        conn
    };
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("all.csv");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "ipodesk", "export", "ipos", "--format", "csv", "--out", &out_str,
    ]);
    exporter::handle(&source, matches.subcommand_matches("export").unwrap()).unwrap();

    let mut target = base_conn();
    import(&mut target, &out_str).unwrap();
    assert_eq!(
        db::load_book(&target).unwrap().records(),
        db::load_book(&source).unwrap().records()
    );
}
