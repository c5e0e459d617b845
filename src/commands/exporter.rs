// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{IpoQuery, StatusFilter, filter_records};
use crate::models::IpoRecord;
use crate::utils::search_arg;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

pub const IPO_CSV_HEADERS: [&str; 19] = [
    "id",
    "company_name",
    "sector",
    "price_min",
    "price_max",
    "open_date",
    "close_date",
    "issue_size",
    "issue_type",
    "lot_size",
    "status",
    "listing_date",
    "ipo_price",
    "listing_price",
    "current_market_price",
    "listing_gain",
    "current_return",
    "rhp_pdf",
    "drhp_pdf",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ipos", sub)) => export_ipos(conn, sub),
        _ => Ok(()),
    }
}

pub fn csv_row(r: &IpoRecord) -> Vec<String> {
    let l = r.listing();
    let opt = |v: Option<String>| v.unwrap_or_default();
    vec![
        r.id.clone(),
        r.company_name.clone(),
        r.sector.clone(),
        r.price_band.min.to_string(),
        r.price_band.max.to_string(),
        r.open_date.to_string(),
        r.close_date.to_string(),
        r.issue_size.to_string(),
        r.issue_type.to_string(),
        opt(r.lot_size.map(|n| n.to_string())),
        r.status().to_string(),
        opt(l.map(|l| l.listing_date.to_string())),
        opt(l.map(|l| l.ipo_price.to_string())),
        opt(l.map(|l| l.listing_price.to_string())),
        opt(l.map(|l| l.current_market_price.to_string())),
        opt(l.map(|l| l.listing_gain.to_string())),
        opt(l.map(|l| l.current_return.to_string())),
        opt(r.rhp_pdf.clone()),
        opt(r.drhp_pdf.clone()),
    ]
}

fn export_ipos(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<StatusFilter>())
        .transpose()?
        .unwrap_or_default();
    let book = db::load_book(conn)?;
    let records = filter_records(book.records(), &IpoQuery::new(status, search_arg(sub)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(IPO_CSV_HEADERS)?;
            for r in &records {
                wtr.write_record(csv_row(r))?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
    }
    info!(count = records.len(), out, format = %fmt, "exported IPOs");
    println!("Exported {} IPOs to {}", records.len(), out);
    Ok(())
}
