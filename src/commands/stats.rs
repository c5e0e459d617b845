// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::IpoStats;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn compute(conn: &Connection) -> Result<IpoStats> {
    let book = db::load_book(conn)?;
    Ok(IpoStats::compute(book.records()))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let stats = compute(conn)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Total IPOs".to_string(), stats.total.to_string()],
        vec!["Upcoming".to_string(), stats.upcoming.to_string()],
        vec!["Ongoing".to_string(), stats.ongoing.to_string()],
        vec!["Listed".to_string(), stats.listed.to_string()],
        vec!["Avg Return".to_string(), format!("{:.1}%", stats.avg_return)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
