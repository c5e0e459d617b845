// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{ENV_PAGE_SIZE, Settings};
use crate::db;
use crate::utils::{get_page_size, pretty_table, set_page_size};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-page-size", sub)) => {
            let n = *sub.get_one::<usize>("size").unwrap();
            set_page_size(conn, n)?;
            println!("Page size set to {}", n);
            if settings.page_size.is_some() {
                println!("Note: {} is set and takes precedence", ENV_PAGE_SIZE);
            }
        }
        Some(("show", _)) => {
            let stored = get_page_size(conn)?;
            let effective = settings.page_size.unwrap_or(stored);
            let rows = vec![
                vec!["database".to_string(), db::db_path(settings)?.display().to_string()],
                vec!["page_size (stored)".to_string(), stored.to_string()],
                vec!["page_size (effective)".to_string(), effective.to_string()],
                vec!["log filter".to_string(), settings.log_filter.clone()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
