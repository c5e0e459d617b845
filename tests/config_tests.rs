// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ipodesk::config::{ConfigError, ENV_DB, ENV_LOG, ENV_PAGE_SIZE, Settings};
use ipodesk::{db, utils};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::PathBuf;

fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|name| env.get(name).cloned())
}

#[test]
fn defaults_without_environment() {
    let s = settings_from(&[]).unwrap();
    assert_eq!(s.db_path, None);
    assert_eq!(s.page_size, None);
    assert_eq!(s.log_filter, "warn");
}

#[test]
fn reads_overrides_and_ignores_blank_values() {
    let s = settings_from(&[
        (ENV_DB, " /tmp/ipodesk/test.sqlite "),
        (ENV_PAGE_SIZE, "25"),
        (ENV_LOG, ""),
        ("RUST_LOG", "ipodesk=debug"),
    ])
    .unwrap();
    assert_eq!(s.db_path, Some(PathBuf::from("/tmp/ipodesk/test.sqlite")));
    assert_eq!(s.page_size, Some(25));
    assert_eq!(s.log_filter, "ipodesk=debug");

    let s = settings_from(&[(ENV_LOG, "info"), ("RUST_LOG", "trace")]).unwrap();
    assert_eq!(s.log_filter, "info");
}

#[test]
fn rejects_unusable_page_size() {
    for bad in ["0", "ten", "-3"] {
        let err = settings_from(&[(ENV_PAGE_SIZE, bad)]).unwrap_err();
        assert!(err.to_string().contains(ENV_PAGE_SIZE), "{}", err);
    }
}

#[test]
fn db_path_honours_override_and_creates_parent() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("ipos.sqlite");
    let settings = Settings {
        db_path: Some(target.clone()),
        ..Settings::default()
    };
    assert_eq!(db::db_path(&settings).unwrap(), target);
    assert!(target.parent().unwrap().is_dir());

    let conn = db::open_or_init(&settings).unwrap();
    assert!(db::load_book(&conn).unwrap().is_empty());
}

#[test]
fn stored_page_size_defaults_to_ten() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    assert_eq!(utils::get_page_size(&conn).unwrap(), 10);
    assert!(utils::set_page_size(&conn, 0).is_err());
    utils::set_page_size(&conn, 15).unwrap();
    assert_eq!(utils::get_page_size(&conn).unwrap(), 15);
    assert_eq!(utils::resolve_page_size(&conn, None, Some(7)).unwrap(), 7);
    assert_eq!(utils::resolve_page_size(&conn, Some(3), Some(7)).unwrap(), 3);
}
