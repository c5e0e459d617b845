// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{IpoRecord, IpoStage, IpoStatus, IssueType, Listing, PriceBand};
use crate::store::validate_record;
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use tracing::{debug, info};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ipos", sub)) => import_ipos(conn, sub),
        _ => Ok(()),
    }
}

fn cell(rec: &StringRecord, idx: usize) -> Option<&str> {
    rec.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Parses one row laid out as `exporter::IPO_CSV_HEADERS`. A blank id is
/// returned as an empty string for the caller to fill in.
pub fn record_from_csv(rec: &StringRecord) -> Result<IpoRecord> {
    let req = move |idx: usize, name: &str| {
        cell(rec, idx).with_context(|| format!("{} missing", name))
    };

    let id = cell(rec, 0).unwrap_or("").to_string();
    let company_name = req(1, "company_name")?.to_string();
    let sector = req(2, "sector")?.to_string();
    let price_band = PriceBand::new(
        parse_decimal(req(3, "price_min")?)?,
        parse_decimal(req(4, "price_max")?)?,
    );
    let open_date = parse_date(req(5, "open_date")?)?;
    let close_date = parse_date(req(6, "close_date")?)?;
    let issue_size = parse_decimal(req(7, "issue_size")?)?;
    let issue_type = req(8, "issue_type")?.parse::<IssueType>()?;
    let lot_size = cell(rec, 9)
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid lot size '{}'", s))
        })
        .transpose()?;
    let status = req(10, "status")?.parse::<IpoStatus>()?;

    let listing_cells: Vec<Option<&str>> = (11..=16).map(|i| cell(rec, i)).collect();
    let stage = match status {
        IpoStatus::Upcoming | IpoStatus::Ongoing => {
            if listing_cells.iter().any(|c| c.is_some()) {
                return Err(anyhow!(
                    "IPO '{}' is {} but has listing fields set",
                    company_name,
                    status
                ));
            }
            if status == IpoStatus::Upcoming {
                IpoStage::Upcoming
            } else {
                IpoStage::Ongoing
            }
        }
        IpoStatus::Listed => {
            let ipo_price = parse_decimal(req(12, "ipo_price")?)?;
            let listing_price = parse_decimal(req(13, "listing_price")?)?;
            let cmp = parse_decimal(req(14, "current_market_price")?)?;
            let listing_gain = match cell(rec, 15) {
                Some(s) => parse_decimal(s)?,
                None => Listing::pct_change(ipo_price, listing_price),
            };
            let current_return = match cell(rec, 16) {
                Some(s) => parse_decimal(s)?,
                None => Listing::pct_change(ipo_price, cmp),
            };
            IpoStage::Listed(Listing {
                listing_date: parse_date(req(11, "listing_date")?)?,
                ipo_price,
                listing_price,
                current_market_price: cmp,
                listing_gain,
                current_return,
            })
        }
    };

    Ok(IpoRecord {
        id,
        company_name,
        sector,
        price_band,
        open_date,
        close_date,
        issue_size,
        issue_type,
        lot_size,
        stage,
        rhp_pdf: cell(rec, 17).map(|s| s.to_string()),
        drhp_pdf: cell(rec, 18).map(|s| s.to_string()),
    })
}

fn import_ipos(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut book = db::load_book(conn)?;
    let tx = conn.transaction()?;
    let mut imported = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let row = result?;
        let mut rec = record_from_csv(&row).with_context(|| format!("Row {} of {}", line, path))?;
        if rec.id.is_empty() {
            rec.id = book.next_id();
        }
        validate_record(&rec).with_context(|| format!("Row {} of {}", line, path))?;
        book.add(rec.clone())
            .with_context(|| format!("Row {} of {}", line, path))?;
        db::insert_ipo(&tx, &rec)?;
        debug!(line, id = %rec.id, "imported row");
        imported += 1;
    }
    tx.commit()?;
    info!(imported, path, "IPO import committed");
    println!("Imported {} IPOs from {}", imported, path);
    Ok(())
}
