// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{Application, IpoRecord, IpoStage, IpoStatus, IssueType, Listing, PriceBand};
use crate::store::IpoBook;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.ipodesk", "Ipodesk", "ipodesk"));

const IPO_COLUMNS: &str = "id, company_name, sector, price_min, price_max, open_date, close_date, \
     issue_size, issue_type, lot_size, status, listing_date, ipo_price, listing_price, \
     current_market_price, listing_gain, current_return, rhp_pdf, drhp_pdf";

pub fn db_path(settings: &Settings) -> Result<PathBuf> {
    if let Some(p) = &settings.db_path {
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(p.clone());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ipodesk.sqlite"))
}

pub fn open_or_init(settings: &Settings) -> Result<Connection> {
    let path = db_path(settings)?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ipos(
        id TEXT PRIMARY KEY,
        company_name TEXT NOT NULL,
        sector TEXT NOT NULL,
        price_min TEXT NOT NULL,
        price_max TEXT NOT NULL,
        open_date TEXT NOT NULL,
        close_date TEXT NOT NULL,
        issue_size TEXT NOT NULL, -- crore
        issue_type TEXT NOT NULL CHECK(issue_type IN ('Main Board','SME','Debt')),
        lot_size INTEGER,
        status TEXT NOT NULL CHECK(status IN ('upcoming','ongoing','listed')),
        listing_date TEXT,
        ipo_price TEXT,
        listing_price TEXT,
        current_market_price TEXT,
        listing_gain TEXT,
        current_return TEXT,
        rhp_pdf TEXT,
        drhp_pdf TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_ipos_status ON ipos(status);

    CREATE TABLE IF NOT EXISTS applications(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        application_number TEXT NOT NULL UNIQUE,
        ipo_id TEXT NOT NULL,
        pan TEXT NOT NULL,
        applied_shares INTEGER NOT NULL CHECK(applied_shares > 0),
        bid_price TEXT NOT NULL,
        allotted_shares INTEGER,
        applied_on TEXT NOT NULL,
        FOREIGN KEY(ipo_id) REFERENCES ipos(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

fn dec(raw: &str, field: &str, id: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' for IPO '{}'", field, raw, id))
}

fn date(raw: &str, field: &str, id: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} '{}' for IPO '{}'", field, raw, id))
}

/// Raw `ipos` row, before the listed-fields invariant is checked.
#[derive(Debug, Clone, Default)]
pub struct IpoRow {
    pub id: String,
    pub company_name: String,
    pub sector: String,
    pub price_min: String,
    pub price_max: String,
    pub open_date: String,
    pub close_date: String,
    pub issue_size: String,
    pub issue_type: String,
    pub lot_size: Option<i64>,
    pub status: String,
    pub listing_date: Option<String>,
    pub ipo_price: Option<String>,
    pub listing_price: Option<String>,
    pub current_market_price: Option<String>,
    pub listing_gain: Option<String>,
    pub current_return: Option<String>,
    pub rhp_pdf: Option<String>,
    pub drhp_pdf: Option<String>,
}

impl IpoRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            company_name: r.get(1)?,
            sector: r.get(2)?,
            price_min: r.get(3)?,
            price_max: r.get(4)?,
            open_date: r.get(5)?,
            close_date: r.get(6)?,
            issue_size: r.get(7)?,
            issue_type: r.get(8)?,
            lot_size: r.get(9)?,
            status: r.get(10)?,
            listing_date: r.get(11)?,
            ipo_price: r.get(12)?,
            listing_price: r.get(13)?,
            current_market_price: r.get(14)?,
            listing_gain: r.get(15)?,
            current_return: r.get(16)?,
            rhp_pdf: r.get(17)?,
            drhp_pdf: r.get(18)?,
        })
    }

    /// Names of the listing columns that are set.
    pub fn present_listing_fields(&self) -> Vec<&'static str> {
        [
            ("listing_date", self.listing_date.is_some()),
            ("ipo_price", self.ipo_price.is_some()),
            ("listing_price", self.listing_price.is_some()),
            ("current_market_price", self.current_market_price.is_some()),
            ("listing_gain", self.listing_gain.is_some()),
            ("current_return", self.current_return.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    pub fn into_record(self) -> Result<IpoRecord> {
        let id = self.id.clone();
        let status = self
            .status
            .parse::<IpoStatus>()
            .with_context(|| format!("IPO '{}'", id))?;
        let stage = match status {
            IpoStatus::Upcoming => IpoStage::Upcoming,
            IpoStatus::Ongoing => IpoStage::Ongoing,
            IpoStatus::Listed => {
                let need = |v: Option<String>, field: &str| {
                    v.ok_or_else(|| anyhow!("IPO '{}' is listed but has no {}", id, field))
                };
                let listing_date = need(self.listing_date, "listing_date")?;
                IpoStage::Listed(Listing {
                    listing_date: date(&listing_date, "listing_date", &id)?,
                    ipo_price: dec(&need(self.ipo_price, "ipo_price")?, "ipo_price", &id)?,
                    listing_price: dec(
                        &need(self.listing_price, "listing_price")?,
                        "listing_price",
                        &id,
                    )?,
                    current_market_price: dec(
                        &need(self.current_market_price, "current_market_price")?,
                        "current_market_price",
                        &id,
                    )?,
                    listing_gain: dec(
                        &need(self.listing_gain, "listing_gain")?,
                        "listing_gain",
                        &id,
                    )?,
                    current_return: dec(
                        &need(self.current_return, "current_return")?,
                        "current_return",
                        &id,
                    )?,
                })
            }
        };
        let lot_size = self
            .lot_size
            .map(|n| {
                u32::try_from(n).with_context(|| format!("Invalid lot size {} for IPO '{}'", n, id))
            })
            .transpose()?;
        Ok(IpoRecord {
            price_band: PriceBand::new(
                dec(&self.price_min, "price_min", &id)?,
                dec(&self.price_max, "price_max", &id)?,
            ),
            open_date: date(&self.open_date, "open_date", &id)?,
            close_date: date(&self.close_date, "close_date", &id)?,
            issue_size: dec(&self.issue_size, "issue_size", &id)?,
            issue_type: self
                .issue_type
                .parse::<IssueType>()
                .with_context(|| format!("IPO '{}'", id))?,
            lot_size,
            stage,
            rhp_pdf: self.rhp_pdf,
            drhp_pdf: self.drhp_pdf,
            company_name: self.company_name,
            sector: self.sector,
            id: self.id,
        })
    }
}

pub fn ipo_rows(conn: &Connection) -> Result<Vec<IpoRow>> {
    let sql = format!("SELECT {} FROM ipos ORDER BY rowid", IPO_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], IpoRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Load every readable IPO, in insertion order, into an owned book. Rows that
/// cannot be turned into a record are skipped with a warning; `doctor` lists them.
pub fn load_book(conn: &Connection) -> Result<IpoBook> {
    let mut records = Vec::new();
    for row in ipo_rows(conn)? {
        let id = row.id.clone();
        match row.into_record() {
            Ok(rec) => records.push(rec),
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(id = %id, error = %error, "skipping unreadable IPO row");
            }
        }
    }
    debug!(count = records.len(), "loaded IPO book");
    Ok(IpoBook::from_records(records)?)
}

fn ipo_params(rec: &IpoRecord) -> Vec<Value> {
    let l = rec.listing();
    vec![
        Value::from(rec.id.clone()),
        Value::from(rec.company_name.clone()),
        Value::from(rec.sector.clone()),
        Value::from(rec.price_band.min.to_string()),
        Value::from(rec.price_band.max.to_string()),
        Value::from(rec.open_date.to_string()),
        Value::from(rec.close_date.to_string()),
        Value::from(rec.issue_size.to_string()),
        Value::from(rec.issue_type.as_str().to_string()),
        Value::from(rec.lot_size),
        Value::from(rec.status().as_str().to_string()),
        Value::from(l.map(|l| l.listing_date.to_string())),
        Value::from(l.map(|l| l.ipo_price.to_string())),
        Value::from(l.map(|l| l.listing_price.to_string())),
        Value::from(l.map(|l| l.current_market_price.to_string())),
        Value::from(l.map(|l| l.listing_gain.to_string())),
        Value::from(l.map(|l| l.current_return.to_string())),
        Value::from(rec.rhp_pdf.clone()),
        Value::from(rec.drhp_pdf.clone()),
    ]
}

pub fn insert_ipo(conn: &Connection, rec: &IpoRecord) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO ipos({}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19)",
            IPO_COLUMNS
        ),
        rusqlite::params_from_iter(ipo_params(rec)),
    )
    .with_context(|| format!("Insert IPO '{}'", rec.id))?;
    Ok(())
}

pub fn update_ipo(conn: &Connection, rec: &IpoRecord) -> Result<()> {
    let n = conn.execute(
        "UPDATE ipos SET company_name=?2, sector=?3, price_min=?4, price_max=?5, open_date=?6,
            close_date=?7, issue_size=?8, issue_type=?9, lot_size=?10, status=?11,
            listing_date=?12, ipo_price=?13, listing_price=?14, current_market_price=?15,
            listing_gain=?16, current_return=?17, rhp_pdf=?18, drhp_pdf=?19
         WHERE id=?1",
        rusqlite::params_from_iter(ipo_params(rec)),
    )?;
    if n == 0 {
        return Err(anyhow!("IPO '{}' not found", rec.id));
    }
    Ok(())
}

pub fn delete_ipo(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM ipos WHERE id=?1", params![id])?;
    Ok(())
}

const APPLICATION_SELECT: &str = "SELECT a.application_number, a.ipo_id, COALESCE(i.company_name, ''), a.pan,
        a.applied_shares, a.bid_price, a.allotted_shares, a.applied_on
     FROM applications a LEFT JOIN ipos i ON a.ipo_id=i.id";

struct ApplicationRow {
    application_number: String,
    ipo_id: String,
    company_name: String,
    pan: String,
    applied_shares: u32,
    bid_price: String,
    allotted_shares: Option<u32>,
    applied_on: String,
}

impl ApplicationRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            application_number: r.get(0)?,
            ipo_id: r.get(1)?,
            company_name: r.get(2)?,
            pan: r.get(3)?,
            applied_shares: r.get(4)?,
            bid_price: r.get(5)?,
            allotted_shares: r.get(6)?,
            applied_on: r.get(7)?,
        })
    }

    fn into_application(self) -> Result<Application> {
        let bid_price = self.bid_price.parse::<Decimal>().with_context(|| {
            format!(
                "Invalid bid price '{}' for {}",
                self.bid_price, self.application_number
            )
        })?;
        let applied_on = chrono::NaiveDate::parse_from_str(&self.applied_on, "%Y-%m-%d")
            .with_context(|| {
                format!(
                    "Invalid date '{}' for {}",
                    self.applied_on, self.application_number
                )
            })?;
        Ok(Application {
            application_number: self.application_number,
            ipo_id: self.ipo_id,
            company_name: self.company_name,
            pan: self.pan,
            applied_shares: self.applied_shares,
            bid_price,
            allotted_shares: self.allotted_shares,
            applied_on,
        })
    }
}

pub fn list_applications(conn: &Connection) -> Result<Vec<Application>> {
    let sql = format!("{} ORDER BY a.id", APPLICATION_SELECT);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], ApplicationRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_application()?);
    }
    Ok(out)
}

pub fn get_application(conn: &Connection, number: &str) -> Result<Option<Application>> {
    let sql = format!("{} WHERE a.application_number=?1", APPLICATION_SELECT);
    let raw = conn
        .query_row(&sql, params![number], ApplicationRow::from_row)
        .optional()?;
    raw.map(ApplicationRow::into_application).transpose()
}

pub fn insert_application(conn: &Connection, a: &Application) -> Result<()> {
    conn.execute(
        "INSERT INTO applications(application_number, ipo_id, pan, applied_shares, bid_price, allotted_shares, applied_on)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            a.application_number,
            a.ipo_id,
            a.pan,
            a.applied_shares,
            a.bid_price.to_string(),
            a.allotted_shares,
            a.applied_on.to_string()
        ],
    )
    .with_context(|| format!("Insert application {}", a.application_number))?;
    Ok(())
}

pub fn set_allotment(conn: &Connection, number: &str, allotted: u32) -> Result<()> {
    conn.execute(
        "UPDATE applications SET allotted_shares=?2 WHERE application_number=?1",
        params![number, allotted],
    )?;
    Ok(())
}
