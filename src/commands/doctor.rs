// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, IpoRow};
use crate::store::validate_record;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Data-entry problems as (issue, detail) pairs. Works on raw rows so one bad
/// record does not hide the others.
pub fn diagnose(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    // 1) Listing fields must be all present for listed IPOs and all absent otherwise
    let rows = db::ipo_rows(conn)?;
    for row in &rows {
        let present = row.present_listing_fields();
        if row.status == "listed" && present.len() < 6 {
            let missing: Vec<&str> = [
                "listing_date",
                "ipo_price",
                "listing_price",
                "current_market_price",
                "listing_gain",
                "current_return",
            ]
            .into_iter()
            .filter(|f| !present.contains(f))
            .collect();
            issues.push((
                "listed_missing_fields".to_string(),
                format!("{}: {}", row.id, missing.join(", ")),
            ));
            continue;
        }
        if row.status != "listed" && !present.is_empty() {
            issues.push((
                "unlisted_has_listing_fields".to_string(),
                format!("{} ({}): {}", row.id, row.status, present.join(", ")),
            ));
            continue;
        }
        check_record(row, &mut issues);
    }

    // 2) Allotments that exceed the application
    let mut stmt = conn.prepare(
        "SELECT application_number, applied_shares, allotted_shares FROM applications
         WHERE allotted_shares IS NOT NULL AND allotted_shares > applied_shares",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let number: String = r.get(0)?;
        let applied: i64 = r.get(1)?;
        let allotted: i64 = r.get(2)?;
        issues.push((
            "over_allotted".to_string(),
            format!("{}: {} of {}", number, allotted, applied),
        ));
    }

    Ok(issues)
}

fn check_record(row: &IpoRow, issues: &mut Vec<(String, String)>) {
    match row.clone().into_record() {
        Ok(rec) => {
            if let Err(e) = validate_record(&rec) {
                issues.push(("invalid_record".to_string(), format!("{}: {}", row.id, e)));
            }
        }
        Err(e) => issues.push(("unreadable_record".to_string(), format!("{:#}", e))),
    }
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = diagnose(conn)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
