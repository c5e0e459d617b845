// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{IpoQuery, filter_records};
use crate::models::Application;
use crate::utils::{fmt_inr, maybe_print_json, pretty_table, search_arg};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AllotmentRow {
    pub company: String,
    pub application_number: String,
    pub pan: String,
    pub applied_shares: u32,
    pub allotted_shares: Option<u32>,
    pub bid_price: String,
    pub status: String,
    pub refund_amount: Option<String>,
}

impl From<&Application> for AllotmentRow {
    fn from(a: &Application) -> Self {
        Self {
            company: a.company_name.clone(),
            application_number: a.application_number.clone(),
            pan: a.pan.clone(),
            applied_shares: a.applied_shares,
            allotted_shares: a.allotted_shares,
            bid_price: a.bid_price.to_string(),
            status: a.allotment_status().to_string(),
            refund_amount: a.refund_amount().map(|d| d.to_string()),
        }
    }
}

/// Applications whose company name or application number matches `search`.
pub fn query_rows(conn: &Connection, search: Option<&str>) -> Result<Vec<Application>> {
    let all = db::list_applications(conn)?;
    let query = IpoQuery::new(Default::default(), search);
    Ok(filter_records(&all, &query))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let apps = query_rows(conn, search_arg(sub))?;
    let data: Vec<AllotmentRow> = apps.iter().map(AllotmentRow::from).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = apps
        .iter()
        .map(|a| {
            vec![
                a.company_name.clone(),
                a.application_number.clone(),
                a.pan.clone(),
                a.applied_shares.to_string(),
                a.allotted_shares
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".into()),
                fmt_inr(&a.bid_price),
                a.allotment_status().to_string(),
                a.refund_amount()
                    .map(|d| fmt_inr(&d))
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Company",
                "Application",
                "PAN",
                "Applied",
                "Allotted",
                "Bid",
                "Status",
                "Refund",
            ],
            rows,
        )
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = sub
        .get_one::<String>("application")
        .unwrap()
        .trim()
        .to_uppercase();
    let allotted = *sub.get_one::<u32>("allotted").unwrap();
    let app = db::get_application(conn, &number)?
        .ok_or_else(|| anyhow!("Application '{}' not found", number))?;
    if allotted > app.applied_shares {
        return Err(anyhow!(
            "Cannot allot {} shares: application {} applied for {}",
            allotted,
            number,
            app.applied_shares
        ));
    }
    db::set_allotment(conn, &number, allotted)?;
    let updated = Application {
        allotted_shares: Some(allotted),
        ..app
    };
    info!(application = %number, allotted, "allotment recorded");
    println!(
        "{}: {} ({} of {} shares)",
        number,
        updated.allotment_status(),
        allotted,
        updated.applied_shares
    );
    Ok(())
}
