// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ipodesk::commands::subscription::{self, SubscriptionAction};
use ipodesk::commands::sample;
use ipodesk::models::{AllotmentStatus, IpoStatus};
use ipodesk::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn sample_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    sample::handle(&mut conn).unwrap();
    conn
}

fn apply(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ipodesk", "subscribe", "apply"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("subscribe", sub_m)) = matches.subcommand() {
        subscription::handle(conn, sub_m)
    } else {
        panic!("no subscribe subcommand");
    }
}

#[test]
fn action_follows_status() {
    assert_eq!(
        SubscriptionAction::for_status(IpoStatus::Ongoing),
        SubscriptionAction::ApplyNow
    );
    assert_eq!(
        SubscriptionAction::for_status(IpoStatus::Upcoming).label(),
        "Coming Soon"
    );
    assert!(!SubscriptionAction::for_status(IpoStatus::Listed).is_open());
}

#[test]
fn offers_count_applications_per_ipo() {
    let conn = sample_conn();
    let offers = subscription::offers(&conn).unwrap();
    let tech = offers.iter().find(|o| o.id == "1").unwrap();
    assert_eq!(tech.action, SubscriptionAction::ApplyNow);
    assert_eq!(tech.applications, 1);
    let green = offers.iter().find(|o| o.id == "2").unwrap();
    assert_eq!(green.action, SubscriptionAction::ComingSoon);
    assert_eq!(green.applications, 0);
}

#[test]
fn bids_must_fit_lot_and_band_of_an_open_ipo() {
    let book = sample::sample_records().unwrap();
    let tech = book.iter().find(|r| r.id == "1").unwrap();
    assert!(subscription::check_bid(tech, 200, Decimal::new(150, 0)).is_ok());
    assert!(subscription::check_bid(tech, 150, Decimal::new(150, 0)).is_err());
    assert!(subscription::check_bid(tech, 100, Decimal::new(151, 0)).is_err());

    let upcoming = book.iter().find(|r| r.id == "2").unwrap();
    let err = subscription::check_bid(upcoming, 150, Decimal::new(90, 0)).unwrap_err();
    assert!(err.to_string().contains("not open for subscription"));
}

#[test]
fn apply_records_a_pending_application() {
    let conn = sample_conn();
    apply(
        &conn,
        &[
            "--ipo",
            "8",
            "--application",
            "app123456789",
            "--pan",
            "pqrst6789k",
            "--shares",
            "2400",
            "--bid",
            "₹95",
            "--date",
            "2024-08-13",
        ],
    )
    .unwrap();

    let app = db::get_application(&conn, "APP123456789").unwrap().unwrap();
    assert_eq!(app.company_name, "Pixel Retail Tech");
    assert_eq!(app.pan, "PQRST6789K");
    assert_eq!(app.applied_shares, 2400);
    assert_eq!(app.bid_price, Decimal::new(95, 0));
    assert_eq!(app.allotment_status(), AllotmentStatus::Pending);
}

#[test]
fn apply_rejects_bad_identifiers_and_duplicates() {
    let conn = sample_conn();
    let args = |number: &'static str, pan: &'static str| {
        vec![
            "--ipo", "1", "--application", number, "--pan", pan, "--shares", "100", "--bid",
            "140",
        ]
    };
    assert!(apply(&conn, &args("APP12345", "ABCDE1234F")).is_err());
    assert!(apply(&conn, &args("APP000000777", "ABCD1234F")).is_err());
    assert!(apply(&conn, &args("APP001234567", "ABCDE1234F")).is_err());
    assert!(apply(&conn, &args("APP000000777", "ABCDE1234F")).is_ok());
    assert_eq!(db::list_applications(&conn).unwrap().len(), 4);
}
