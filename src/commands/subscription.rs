// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Application, IpoRecord, IpoStatus};
use crate::utils::{
    fmt_opt_date, is_valid_application_number, is_valid_pan, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// What an investor can do with an IPO in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubscriptionAction {
    ApplyNow,
    ComingSoon,
    Closed,
}

impl SubscriptionAction {
    pub fn for_status(status: IpoStatus) -> Self {
        match status {
            IpoStatus::Ongoing => SubscriptionAction::ApplyNow,
            IpoStatus::Upcoming => SubscriptionAction::ComingSoon,
            IpoStatus::Listed => SubscriptionAction::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SubscriptionAction::ApplyNow)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionAction::ApplyNow => "Apply Now",
            SubscriptionAction::ComingSoon => "Coming Soon",
            SubscriptionAction::Closed => "Closed",
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("apply", sub)) => apply(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct OfferRow {
    pub id: String,
    pub company: String,
    pub price_band: String,
    pub lot_size: Option<u32>,
    pub open_date: String,
    pub close_date: String,
    pub action: SubscriptionAction,
    pub applications: usize,
}

pub fn offers(conn: &Connection) -> Result<Vec<OfferRow>> {
    let book = db::load_book(conn)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for a in db::list_applications(conn)? {
        *counts.entry(a.ipo_id).or_insert(0) += 1;
    }
    Ok(book
        .records()
        .iter()
        .map(|r| OfferRow {
            id: r.id.clone(),
            company: r.company_name.clone(),
            price_band: r.price_band.to_string(),
            lot_size: r.lot_size,
            open_date: r.open_date.to_string(),
            close_date: r.close_date.to_string(),
            action: SubscriptionAction::for_status(r.status()),
            applications: counts.get(&r.id).copied().unwrap_or(0),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = offers(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|o| {
            vec![
                o.id,
                o.company,
                o.price_band,
                o.lot_size.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
                o.open_date,
                o.close_date,
                o.applications.to_string(),
                o.action.label().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id",
                "Company",
                "Price Band",
                "Lot Size",
                "Open",
                "Close",
                "Applications",
                "Action",
            ],
            rows,
        )
    );
    Ok(())
}

/// Checks a bid against the IPO it targets.
pub fn check_bid(ipo: &IpoRecord, shares: u32, bid: rust_decimal::Decimal) -> Result<()> {
    let action = SubscriptionAction::for_status(ipo.status());
    if !action.is_open() {
        return Err(anyhow!(
            "IPO '{}' is not open for subscription ({})",
            ipo.company_name,
            action.label()
        ));
    }
    if let Some(lot) = ipo.lot_size.filter(|n| *n > 0) {
        if shares % lot != 0 {
            return Err(anyhow!(
                "Shares must be a multiple of the lot size {} (got {})",
                lot,
                shares
            ));
        }
    }
    if !ipo.price_band.contains(bid) {
        return Err(anyhow!(
            "Bid {} is outside the price band {}",
            bid,
            ipo.price_band
        ));
    }
    Ok(())
}

fn apply(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ipo_id = sub.get_one::<String>("ipo").unwrap().trim().to_string();
    let number = sub
        .get_one::<String>("application")
        .unwrap()
        .trim()
        .to_uppercase();
    let pan = sub.get_one::<String>("pan").unwrap().trim().to_uppercase();
    let shares = *sub.get_one::<u32>("shares").unwrap();
    let bid = parse_decimal(sub.get_one::<String>("bid").unwrap())?;
    let applied_on = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };

    if !is_valid_application_number(&number) {
        return Err(anyhow!(
            "Invalid application number '{}', expected APP followed by 9 digits",
            number
        ));
    }
    if !is_valid_pan(&pan) {
        return Err(anyhow!("Invalid PAN '{}'", pan));
    }
    let book = db::load_book(conn)?;
    let ipo = book
        .get(&ipo_id)
        .ok_or_else(|| anyhow!("IPO '{}' not found", ipo_id))?;
    check_bid(ipo, shares, bid)?;

    let application = Application {
        application_number: number,
        ipo_id: ipo.id.clone(),
        company_name: ipo.company_name.clone(),
        pan,
        applied_shares: shares,
        bid_price: bid,
        allotted_shares: None,
        applied_on,
    };
    db::insert_application(conn, &application)?;
    info!(application = %application.application_number, ipo = %ipo.id, "application recorded");
    println!(
        "Applied for {} shares of {} at ₹{} on {} (application {})",
        shares,
        ipo.company_name,
        bid,
        fmt_opt_date(Some(applied_on)),
        application.application_number
    );
    Ok(())
}
