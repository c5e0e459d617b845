// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Application, IpoRecord, IpoStage, IssueType, Listing, PriceBand};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

fn ymd(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("Invalid date {}-{}-{}", y, m, d))
}

struct Seed {
    id: &'static str,
    company: &'static str,
    sector: &'static str,
    band: (i64, i64),
    open: (i32, u32, u32),
    close: (i32, u32, u32),
    issue_size: Decimal,
    issue_type: IssueType,
    lot_size: u32,
    stage: SeedStage,
}

enum SeedStage {
    Upcoming,
    Ongoing,
    // (listing date, ipo price, listing price, cmp, gain %, return %), amounts scaled by 100
    Listed((i32, u32, u32), i64, i64, i64, i64, i64),
}

fn seeds() -> Vec<Seed> {
    vec![
        Seed {
            id: "1",
            company: "TechCorp Solutions",
            sector: "Technology",
            band: (120, 150),
            open: (2024, 1, 15),
            close: (2024, 1, 17),
            issue_size: Decimal::new(850, 0),
            issue_type: IssueType::MainBoard,
            lot_size: 100,
            stage: SeedStage::Ongoing,
        },
        Seed {
            id: "2",
            company: "Green Energy Ltd",
            sector: "Renewable Energy",
            band: (80, 100),
            open: (2024, 1, 20),
            close: (2024, 1, 22),
            issue_size: Decimal::new(1200, 0),
            issue_type: IssueType::MainBoard,
            lot_size: 150,
            stage: SeedStage::Upcoming,
        },
        Seed {
            id: "3",
            company: "Digital Innovations",
            sector: "Technology",
            band: (200, 250),
            open: (2024, 1, 10),
            close: (2024, 1, 12),
            issue_size: Decimal::new(640, 0),
            issue_type: IssueType::MainBoard,
            lot_size: 75,
            stage: SeedStage::Listed((2024, 1, 17), 25000, 28400, 31200, 1360, 2480),
        },
        Seed {
            id: "4",
            company: "MediCare Hospitals",
            sector: "Healthcare",
            band: (360, 383),
            open: (2024, 5, 22),
            close: (2024, 5, 24),
            issue_size: Decimal::new(2300, 0),
            issue_type: IssueType::MainBoard,
            lot_size: 39,
            stage: SeedStage::Listed((2024, 5, 30), 38300, 43500, 41000, 1358, 705),
        },
        Seed {
            id: "5",
            company: "Shree Agro Foods",
            sector: "FMCG",
            band: (52, 55),
            open: (2024, 6, 3),
            close: (2024, 6, 5),
            issue_size: Decimal::new(4250, 2),
            issue_type: IssueType::Sme,
            lot_size: 2000,
            stage: SeedStage::Listed((2024, 6, 10), 5500, 5100, 4620, -727, -1600),
        },
        Seed {
            id: "6",
            company: "Bharat Infra Bonds",
            sector: "Infrastructure",
            band: (1000, 1000),
            open: (2024, 7, 1),
            close: (2024, 7, 12),
            issue_size: Decimal::new(500, 0),
            issue_type: IssueType::Debt,
            lot_size: 10,
            stage: SeedStage::Ongoing,
        },
        Seed {
            id: "7",
            company: "FinEdge Capital",
            sector: "Financial Services",
            band: (410, 432),
            open: (2024, 8, 5),
            close: (2024, 8, 7),
            issue_size: Decimal::new(1750, 0),
            issue_type: IssueType::MainBoard,
            lot_size: 34,
            stage: SeedStage::Upcoming,
        },
        Seed {
            id: "8",
            company: "Pixel Retail Tech",
            sector: "Retail",
            band: (90, 95),
            open: (2024, 8, 12),
            close: (2024, 8, 14),
            issue_size: Decimal::new(2480, 2),
            issue_type: IssueType::Sme,
            lot_size: 1200,
            stage: SeedStage::Ongoing,
        },
    ]
}

fn record(s: Seed) -> Result<IpoRecord> {
    let stage = match s.stage {
        SeedStage::Upcoming => IpoStage::Upcoming,
        SeedStage::Ongoing => IpoStage::Ongoing,
        SeedStage::Listed(date, ipo, listing, cmp, gain, ret) => IpoStage::Listed(Listing {
            listing_date: ymd(date.0, date.1, date.2)?,
            ipo_price: Decimal::new(ipo, 2),
            listing_price: Decimal::new(listing, 2),
            current_market_price: Decimal::new(cmp, 2),
            listing_gain: Decimal::new(gain, 2),
            current_return: Decimal::new(ret, 2),
        }),
    };
    let listed = stage.listing().is_some();
    Ok(IpoRecord {
        id: s.id.to_string(),
        company_name: s.company.to_string(),
        sector: s.sector.to_string(),
        price_band: PriceBand::new(Decimal::from(s.band.0), Decimal::from(s.band.1)),
        open_date: ymd(s.open.0, s.open.1, s.open.2)?,
        close_date: ymd(s.close.0, s.close.1, s.close.2)?,
        issue_size: s.issue_size,
        issue_type: s.issue_type,
        lot_size: Some(s.lot_size),
        stage,
        rhp_pdf: Some(format!("rhp/{}.pdf", s.id)),
        drhp_pdf: (!listed).then(|| format!("drhp/{}.pdf", s.id)),
    })
}

pub fn sample_records() -> Result<Vec<IpoRecord>> {
    seeds().into_iter().map(record).collect()
}

fn application(
    number: &str,
    ipo_id: &str,
    company: &str,
    shares: u32,
    bid: i64,
    allotted: Option<u32>,
    applied_on: NaiveDate,
) -> Application {
    Application {
        application_number: number.to_string(),
        ipo_id: ipo_id.to_string(),
        company_name: company.to_string(),
        pan: "ABCDE1234F".to_string(),
        applied_shares: shares,
        bid_price: Decimal::from(bid),
        allotted_shares: allotted,
        applied_on,
    }
}

/// Applications against the sample IPOs: one pending, one rejected, one partial.
pub fn sample_applications() -> Result<Vec<Application>> {
    Ok(vec![
        application("APP001234567", "1", "TechCorp Solutions", 100, 150, None, ymd(2024, 1, 16)?),
        application("APP001234568", "4", "MediCare Hospitals", 39, 383, Some(0), ymd(2024, 5, 23)?),
        application("APP001234569", "3", "Digital Innovations", 150, 250, Some(75), ymd(2024, 1, 11)?),
    ])
}

/// Insert the sample IPOs whose ids are not taken yet.
pub fn handle(conn: &mut Connection) -> Result<()> {
    let mut book = db::load_book(conn)?;
    let tx = conn.transaction()?;
    let mut added = 0usize;
    for rec in sample_records()? {
        if book.get(&rec.id).is_some() {
            continue;
        }
        db::insert_ipo(&tx, &rec)?;
        book.add(rec)?;
        added += 1;
    }
    let mut applications = 0usize;
    for a in sample_applications()? {
        if book.get(&a.ipo_id).is_none()
            || db::get_application(&tx, &a.application_number)?.is_some()
        {
            continue;
        }
        db::insert_application(&tx, &a)?;
        applications += 1;
    }
    tx.commit()?;
    info!(added, applications, "sample data loaded");
    println!(
        "Loaded {} sample IPOs ({} total) and {} applications",
        added,
        book.len(),
        applications
    );
    Ok(())
}
