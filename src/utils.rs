// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::engine::DEFAULT_PAGE_SIZE;
use crate::models::PriceBand;

static PAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("static PAN regex"));
static APPLICATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^APP[0-9]{9}$").expect("static application regex"));
static BAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*₹?\s*([0-9]+(?:\.[0-9]+)?)\s*(?:-|to)\s*₹?\s*([0-9]+(?:\.[0-9]+)?)\s*$")
        .expect("static price band regex")
});

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    // Form inputs come as "₹ 383", "13.58 %" or "2300 Cr."
    let cleaned: String = s
        .trim()
        .trim_start_matches('₹')
        .trim_end_matches('%')
        .trim_end_matches("Cr.")
        .trim_end_matches("Cr")
        .trim()
        .replace(',', "");
    cleaned
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses "120-150", "₹120 - ₹150" or "120 to 150".
pub fn parse_price_band(s: &str) -> Result<PriceBand> {
    let caps = BAND_RE
        .captures(s)
        .ok_or_else(|| anyhow!("Invalid price band '{}', expected MIN-MAX", s))?;
    let min = parse_decimal(&caps[1])?;
    let max = parse_decimal(&caps[2])?;
    Ok(PriceBand::new(min, max))
}

pub fn is_valid_pan(s: &str) -> bool {
    PAN_RE.is_match(s)
}

pub fn is_valid_application_number(s: &str) -> bool {
    APPLICATION_RE.is_match(s)
}

pub fn fmt_inr(d: &Decimal) -> String {
    format!("₹{}", d.round_dp(2))
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{:.2}%", d)
}

pub fn fmt_opt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_page_size(conn: &Connection) -> Result<usize> {
    match get_setting(conn, "page_size")? {
        Some(s) => {
            let n = s
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid stored page size '{}'", s))?;
            Ok(n.max(1))
        }
        None => Ok(DEFAULT_PAGE_SIZE),
    }
}

pub fn set_page_size(conn: &Connection, n: usize) -> Result<()> {
    if n == 0 {
        return Err(anyhow!("Page size must be at least 1"));
    }
    set_setting(conn, "page_size", &n.to_string())
}

/// Flag beats environment, environment beats the stored setting.
pub fn resolve_page_size(
    conn: &Connection,
    flag: Option<usize>,
    env: Option<usize>,
) -> Result<usize> {
    match flag.or(env) {
        Some(n) => Ok(n.max(1)),
        None => get_page_size(conn),
    }
}

/// The `--search` needle as typed. Only an empty string counts as absent.
pub fn search_arg(m: &clap::ArgMatches) -> Option<&str> {
    m.get_one::<String>("search")
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
