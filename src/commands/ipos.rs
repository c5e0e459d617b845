// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db;
use crate::engine::{IpoQuery, Page, StatusFilter, page_window, query_page};
use crate::models::{IpoRecord, IpoStage, IpoStatus, IssueType, Listing};
use crate::store::validate_record;
use crate::utils::{
    fmt_inr, fmt_opt_date, fmt_pct, maybe_print_json, parse_date, parse_decimal,
    parse_price_band, pretty_table, resolve_page_size, search_arg,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_str(sub: &clap::ArgMatches, key: &str) -> Option<String> {
    sub.get_one::<String>(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

const LISTING_ARGS: [&str; 6] = [
    "listing_date",
    "ipo_price",
    "listing_price",
    "cmp",
    "listing_gain",
    "current_return",
];

/// Builds the stage from form input. Missing listing values fall back to
/// `prev`. A missing gain or return keeps the previous value unless one of
/// the prices it is computed from was given, in which case it is re-derived.
fn stage_from_args(
    sub: &clap::ArgMatches,
    status: IpoStatus,
    prev: Option<&Listing>,
) -> Result<IpoStage> {
    match status {
        IpoStatus::Upcoming | IpoStatus::Ongoing => {
            if let Some(k) = LISTING_ARGS.iter().find(|k| opt_str(sub, k).is_some()) {
                return Err(anyhow!(
                    "--{} only applies to listed IPOs (use --status listed)",
                    k.replace('_', "-")
                ));
            }
            Ok(if status == IpoStatus::Upcoming {
                IpoStage::Upcoming
            } else {
                IpoStage::Ongoing
            })
        }
        IpoStatus::Listed => {
            let dec_or = |key: &str, fallback: Option<rust_decimal::Decimal>, flag: &str| {
                match opt_str(sub, key) {
                    Some(raw) => parse_decimal(&raw),
                    None => fallback.ok_or_else(|| anyhow!("Listed IPOs need --{}", flag)),
                }
            };
            let listing_date = match opt_str(sub, "listing_date") {
                Some(raw) => parse_date(&raw)?,
                None => prev
                    .map(|l| l.listing_date)
                    .ok_or_else(|| anyhow!("Listed IPOs need --listing-date"))?,
            };
            let ipo_price = dec_or("ipo_price", prev.map(|l| l.ipo_price), "ipo-price")?;
            let listing_price =
                dec_or("listing_price", prev.map(|l| l.listing_price), "listing-price")?;
            let cmp = dec_or("cmp", prev.map(|l| l.current_market_price), "cmp")?;
            let given = |keys: [&str; 2]| keys.iter().any(|k| opt_str(sub, k).is_some());
            let gain_inputs_changed = given(["ipo_price", "listing_price"]);
            let return_inputs_changed = given(["ipo_price", "cmp"]);
            let listing_gain = match opt_str(sub, "listing_gain") {
                Some(raw) => parse_decimal(&raw)?,
                None => match prev {
                    Some(l) if !gain_inputs_changed => l.listing_gain,
                    _ => Listing::pct_change(ipo_price, listing_price),
                },
            };
            let current_return = match opt_str(sub, "current_return") {
                Some(raw) => parse_decimal(&raw)?,
                None => match prev {
                    Some(l) if !return_inputs_changed => l.current_return,
                    _ => Listing::pct_change(ipo_price, cmp),
                },
            };
            Ok(IpoStage::Listed(Listing {
                listing_date,
                ipo_price,
                listing_price,
                current_market_price: cmp,
                listing_gain,
                current_return,
            }))
        }
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut book = db::load_book(conn)?;
    let id = opt_str(sub, "id").unwrap_or_else(|| book.next_id());
    let company_name = opt_str(sub, "company").unwrap_or_default();
    let sector = opt_str(sub, "sector").unwrap_or_default();
    let price_band = parse_price_band(&opt_str(sub, "price_band").unwrap_or_default())?;
    let open_date = parse_date(&opt_str(sub, "open").unwrap_or_default())?;
    let close_date = parse_date(&opt_str(sub, "close").unwrap_or_default())?;
    let issue_size = parse_decimal(&opt_str(sub, "issue_size").unwrap_or_default())?;
    let issue_type = opt_str(sub, "issue_type")
        .unwrap_or_default()
        .parse::<IssueType>()?;
    let status = match opt_str(sub, "status") {
        Some(s) => s.parse::<IpoStatus>()?,
        None => IpoStatus::Upcoming,
    };
    let stage = stage_from_args(sub, status, None)?;

    let rec = IpoRecord {
        id,
        company_name,
        sector,
        price_band,
        open_date,
        close_date,
        issue_size,
        issue_type,
        lot_size: sub.get_one::<u32>("lot_size").copied(),
        stage,
        rhp_pdf: opt_str(sub, "rhp"),
        drhp_pdf: opt_str(sub, "drhp"),
    };
    validate_record(&rec)?;
    book.add(rec.clone())?;
    db::insert_ipo(conn, &rec)?;
    info!(id = %rec.id, status = %rec.status(), "registered IPO");
    println!(
        "Registered IPO '{}' ({}) as {} [id {}]",
        rec.company_name,
        rec.issue_type,
        rec.status(),
        rec.id
    );
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut book = db::load_book(conn)?;
    let id = opt_str(sub, "id").context("--id is required")?;
    let mut rec = book
        .get(&id)
        .cloned()
        .ok_or_else(|| anyhow!("IPO '{}' not found", id))?;

    if let Some(v) = opt_str(sub, "company") {
        rec.company_name = v;
    }
    if let Some(v) = opt_str(sub, "sector") {
        rec.sector = v;
    }
    if let Some(v) = opt_str(sub, "price_band") {
        rec.price_band = parse_price_band(&v)?;
    }
    if let Some(v) = opt_str(sub, "open") {
        rec.open_date = parse_date(&v)?;
    }
    if let Some(v) = opt_str(sub, "close") {
        rec.close_date = parse_date(&v)?;
    }
    if let Some(v) = opt_str(sub, "issue_size") {
        rec.issue_size = parse_decimal(&v)?;
    }
    if let Some(v) = opt_str(sub, "issue_type") {
        rec.issue_type = v.parse()?;
    }
    if let Some(n) = sub.get_one::<u32>("lot_size") {
        rec.lot_size = Some(*n);
    }
    if let Some(v) = opt_str(sub, "rhp") {
        rec.rhp_pdf = Some(v);
    }
    if let Some(v) = opt_str(sub, "drhp") {
        rec.drhp_pdf = Some(v);
    }
    let status = match opt_str(sub, "status") {
        Some(s) => s.parse::<IpoStatus>()?,
        None => rec.status(),
    };
    let prev = rec.listing().cloned();
    rec.stage = stage_from_args(sub, status, prev.as_ref())?;

    validate_record(&rec)?;
    book.update(rec.clone())?;
    db::update_ipo(conn, &rec)?;
    info!(id = %rec.id, status = %rec.status(), "updated IPO");
    println!("Updated IPO '{}' [id {}]", rec.company_name, rec.id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut book = db::load_book(conn)?;
    let id = opt_str(sub, "id").context("--id is required")?;
    let removed = book.remove(&id)?;
    db::delete_ipo(conn, &id)?;
    info!(id = %id, "removed IPO");
    println!("Removed IPO '{}' [id {}]", removed.company_name, id);
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let book = db::load_book(conn)?;
    let id = opt_str(sub, "id").context("--id is required")?;
    let rec = book
        .get(&id)
        .ok_or_else(|| anyhow!("IPO '{}' not found", id))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), rec)? {
        return Ok(());
    }
    let mut rows = vec![
        vec!["Id".to_string(), rec.id.clone()],
        vec!["Company".into(), rec.company_name.clone()],
        vec!["Sector".into(), rec.sector.clone()],
        vec!["Price Band".into(), rec.price_band.to_string()],
        vec!["Open".into(), fmt_opt_date(Some(rec.open_date))],
        vec!["Close".into(), fmt_opt_date(Some(rec.close_date))],
        vec!["Issue Size".into(), format!("{} Cr.", rec.issue_size)],
        vec!["Issue Type".into(), rec.issue_type.to_string()],
        vec![
            "Lot Size".into(),
            rec.lot_size.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
        ],
        vec!["Status".into(), rec.status().label().to_string()],
    ];
    if let Some(l) = rec.listing() {
        rows.push(vec!["Listing Date".into(), fmt_opt_date(Some(l.listing_date))]);
        rows.push(vec!["IPO Price".into(), fmt_inr(&l.ipo_price)]);
        rows.push(vec!["Listing Price".into(), fmt_inr(&l.listing_price)]);
        rows.push(vec!["Listing Gain".into(), fmt_pct(&l.listing_gain)]);
        rows.push(vec!["CMP".into(), fmt_inr(&l.current_market_price)]);
        rows.push(vec!["Current Return".into(), fmt_pct(&l.current_return)]);
    }
    for (label, doc) in [("RHP", &rec.rhp_pdf), ("DRHP", &rec.drhp_pdf)] {
        rows.push(vec![
            label.into(),
            doc.clone().unwrap_or_else(|| "not offered".into()),
        ]);
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

/// Filter and paginate the stored IPOs according to `ipo list` arguments.
pub fn query_rows(
    conn: &Connection,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<Page<IpoRecord>> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<StatusFilter>())
        .transpose()?
        .unwrap_or_default();
    let search = search_arg(sub);
    let page_size = resolve_page_size(
        conn,
        sub.get_one::<usize>("page_size").copied(),
        settings.page_size,
    )?;
    let page = sub.get_one::<usize>("page").copied().unwrap_or(1);

    let book = db::load_book(conn)?;
    let query = IpoQuery::new(status, search);
    Ok(query_page(book.records(), &query, page_size, page))
}

pub fn page_footer<T>(page: &Page<T>) -> String {
    if page.total_pages == 0 {
        return "No IPOs found matching your criteria".to_string();
    }
    let w = page_window(page.page, page.total_pages);
    let mut parts = Vec::new();
    if w.has_prev {
        parts.push("‹".to_string());
    }
    for n in &w.pages {
        if *n == page.page {
            parts.push(format!("[{}]", n));
        } else {
            parts.push(n.to_string());
        }
    }
    if let Some(last) = w.jump_to_last {
        parts.push(format!("… {}", last));
    }
    if w.has_next {
        parts.push("›".to_string());
    }
    format!(
        "{}   Page {} of {} ({} IPOs)",
        parts.join(" "),
        page.page,
        page.total_pages,
        page.total_items
    )
}

fn list(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let page = query_rows(conn, settings, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.items)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.company_name.clone(),
                r.sector.clone(),
                r.price_band.to_string(),
                fmt_opt_date(Some(r.open_date)),
                fmt_opt_date(Some(r.close_date)),
                format!("{} Cr.", r.issue_size),
                r.issue_type.to_string(),
                fmt_opt_date(r.listing().map(|l| l.listing_date)),
                r.status().label().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id",
                "Company",
                "Sector",
                "Price Band",
                "Open",
                "Close",
                "Issue Size",
                "Issue Type",
                "Listing Date",
                "Status",
            ],
            rows,
        )
    );
    println!("{}", page_footer(&page));
    Ok(())
}
