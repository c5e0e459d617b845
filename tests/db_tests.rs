// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ipodesk::commands::{doctor, sample, stats};
use ipodesk::db;
use ipodesk::models::IpoStatus;
use rusqlite::Connection;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn saved_book_loads_back_in_order() {
    let conn = base_conn();
    let mut records = sample::sample_records().unwrap();
    records.reverse();
    for r in &records {
        db::insert_ipo(&conn, r).unwrap();
    }

    let book = db::load_book(&conn).unwrap();
    assert_eq!(book.records(), records.as_slice());

    let listed = book.get("3").unwrap();
    assert_eq!(listed.status(), IpoStatus::Listed);
    let l = listed.listing().unwrap();
    assert_eq!(l.listing_price.to_string(), "284.00");
    assert_eq!(l.current_return.to_string(), "24.80");
}

#[test]
fn update_and_delete_hit_the_stored_row() {
    let conn = base_conn();
    let mut rec = sample::sample_records().unwrap().remove(0);
    db::insert_ipo(&conn, &rec).unwrap();

    rec.sector = "Software".to_string();
    db::update_ipo(&conn, &rec).unwrap();
    assert_eq!(db::load_book(&conn).unwrap().get("1").unwrap().sector, "Software");

    rec.id = "404".to_string();
    assert!(db::update_ipo(&conn, &rec).is_err());

    db::delete_ipo(&conn, "1").unwrap();
    assert!(db::load_book(&conn).unwrap().is_empty());
}

#[test]
fn unreadable_row_is_skipped_and_reported_by_doctor() {
    let conn = base_conn();
    let good = sample::sample_records().unwrap().remove(0);
    db::insert_ipo(&conn, &good).unwrap();
    conn.execute(
        "INSERT INTO ipos(id, company_name, sector, price_min, price_max, open_date, close_date,
            issue_size, issue_type, lot_size, status, listing_date, ipo_price)
         VALUES ('7','Half Listed','Retail','10','12','2024-03-01','2024-03-03','50','SME',1000,
            'listed','2024-03-08','12')",
        [],
    )
    .unwrap();

    let book = db::load_book(&conn).unwrap();
    assert_eq!(book.records(), &[good][..]);
    assert_eq!(stats::compute(&conn).unwrap().total, 1);

    let rows = db::ipo_rows(&conn).unwrap();
    let err = rows[1].clone().into_record().unwrap_err();
    assert!(format!("{:#}", err).contains("is listed but has no listing_price"));

    let issues = doctor::diagnose(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].0, "listed_missing_fields");
    assert_eq!(
        issues[0].1,
        "7: listing_price, current_market_price, listing_gain, current_return"
    );
}

#[test]
fn doctor_flags_stray_listing_fields_and_over_allotment() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO ipos(id, company_name, sector, price_min, price_max, open_date, close_date,
            issue_size, issue_type, status, listing_price)
         VALUES ('1','Early Bird','Retail','10','12','2024-03-01','2024-03-03','50','SME',
            'upcoming','14')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO ipos(id, company_name, sector, price_min, price_max, open_date, close_date,
            issue_size, issue_type, status)
         VALUES ('2','Backwards','Retail','12','10','2024-03-01','2024-03-03','50','SME','ongoing')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO applications(application_number, ipo_id, pan, applied_shares, bid_price,
            allotted_shares, applied_on)
         VALUES ('APP000000001','2','ABCDE1234F',100,'12',150,'2024-03-02')",
        [],
    )
    .unwrap();

    let codes: Vec<String> = doctor::diagnose(&conn)
        .unwrap()
        .into_iter()
        .map(|(code, _)| code)
        .collect();
    assert_eq!(
        codes,
        vec!["unlisted_has_listing_fields", "invalid_record", "over_allotted"]
    );
}

#[test]
fn sample_data_loads_once() {
    let mut conn = base_conn();
    sample::handle(&mut conn).unwrap();
    sample::handle(&mut conn).unwrap();

    let book = db::load_book(&conn).unwrap();
    assert_eq!(book.len(), sample::sample_records().unwrap().len());
    let apps = db::list_applications(&conn).unwrap();
    assert_eq!(apps.len(), 3);
    assert_eq!(apps[0].company_name, "TechCorp Solutions");
    assert!(doctor::diagnose(&conn).unwrap().is_empty());

    let counts = stats::compute(&conn).unwrap();
    assert_eq!((counts.upcoming, counts.ongoing, counts.listed), (2, 3, 3));
    for rec in book.records() {
        assert_eq!(rec.drhp_pdf.is_none(), rec.listing().is_some(), "{}", rec.id);
    }
}

#[test]
fn deleting_an_ipo_drops_its_applications() {
    let mut conn = base_conn();
    sample::handle(&mut conn).unwrap();
    db::delete_ipo(&conn, "3").unwrap();
    assert!(db::get_application(&conn, "APP001234569").unwrap().is_none());
    assert!(db::get_application(&conn, "APP001234567").unwrap().is_some());
}
