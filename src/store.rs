// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{IpoRecord, IpoStage};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("IPO '{0}' already exists")]
    DuplicateId(String),
    #[error("IPO '{0}' not found")]
    NotFound(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompanyName,
    #[error("Sector is required")]
    MissingSector,
    #[error("Price band {min}-{max} is invalid: min must be >= 0 and <= max")]
    InvalidPriceBand { min: Decimal, max: Decimal },
    #[error("Open date {open} is after close date {close}")]
    DatesOutOfOrder {
        open: chrono::NaiveDate,
        close: chrono::NaiveDate,
    },
    #[error("Issue size {0} must be >= 0")]
    NegativeIssueSize(Decimal),
    #[error("Lot size must be greater than zero")]
    ZeroLotSize,
    #[error("Listing date {listing} is before open date {open}")]
    ListedBeforeOpen {
        listing: chrono::NaiveDate,
        open: chrono::NaiveDate,
    },
}

/// Checks a record coming from the registration side (CLI form or CSV
/// import). The listing engine never calls this.
pub fn validate_record(rec: &IpoRecord) -> Result<(), ValidationError> {
    if rec.company_name.trim().is_empty() {
        return Err(ValidationError::MissingCompanyName);
    }
    if rec.sector.trim().is_empty() {
        return Err(ValidationError::MissingSector);
    }
    let band = rec.price_band;
    if band.min < Decimal::ZERO || band.min > band.max {
        return Err(ValidationError::InvalidPriceBand {
            min: band.min,
            max: band.max,
        });
    }
    if rec.open_date > rec.close_date {
        return Err(ValidationError::DatesOutOfOrder {
            open: rec.open_date,
            close: rec.close_date,
        });
    }
    if rec.issue_size < Decimal::ZERO {
        return Err(ValidationError::NegativeIssueSize(rec.issue_size));
    }
    if rec.lot_size == Some(0) {
        return Err(ValidationError::ZeroLotSize);
    }
    if let IpoStage::Listed(l) = &rec.stage {
        if l.listing_date < rec.open_date {
            return Err(ValidationError::ListedBeforeOpen {
                listing: l.listing_date,
                open: rec.open_date,
            });
        }
    }
    Ok(())
}

/// The IPO collection, owned by whoever drives a session. All mutation goes
/// through `add`, `update` and `remove`; readers get a slice in insertion order.
#[derive(Debug, Clone, Default)]
pub struct IpoBook {
    records: Vec<IpoRecord>,
}

impl IpoBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<IpoRecord>) -> Result<Self, StoreError> {
        let mut book = Self::new();
        for r in records {
            book.add(r)?;
        }
        Ok(book)
    }

    pub fn records(&self) -> &[IpoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&IpoRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn add(&mut self, record: IpoRecord) -> Result<(), StoreError> {
        if self.position(&record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// Replace the record with the same id, keeping its position.
    pub fn update(&mut self, record: IpoRecord) -> Result<(), StoreError> {
        let idx = self
            .position(&record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        self.records[idx] = record;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<IpoRecord, StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.records.remove(idx))
    }

    /// Smallest positive integer id not yet taken, as a string.
    pub fn next_id(&self) -> String {
        let mut n: u64 = 1;
        while self.position(&n.to_string()).is_some() {
            n += 1;
        }
        n.to_string()
    }
}
