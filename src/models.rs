// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoStatus {
    Upcoming,
    Ongoing,
    Listed,
}

impl IpoStatus {
    pub const ALL: [IpoStatus; 3] = [IpoStatus::Upcoming, IpoStatus::Ongoing, IpoStatus::Listed];

    pub fn as_str(&self) -> &'static str {
        match self {
            IpoStatus::Upcoming => "upcoming",
            IpoStatus::Ongoing => "ongoing",
            IpoStatus::Listed => "listed",
        }
    }

    /// Capitalised form shown in tables.
    pub fn label(&self) -> &'static str {
        match self {
            IpoStatus::Upcoming => "Upcoming",
            IpoStatus::Ongoing => "Ongoing",
            IpoStatus::Listed => "Listed",
        }
    }
}

impl fmt::Display for IpoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpoStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(IpoStatus::Upcoming),
            "ongoing" => Ok(IpoStatus::Ongoing),
            "listed" => Ok(IpoStatus::Listed),
            _ => Err(UnknownVariant::new("status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "Main Board")]
    MainBoard,
    #[serde(rename = "SME")]
    Sme,
    #[serde(rename = "Debt")]
    Debt,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MainBoard => "Main Board",
            IssueType::Sme => "SME",
            IssueType::Debt => "Debt",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "mainboard" => Ok(IssueType::MainBoard),
            "sme" => Ok(IssueType::Sme),
            "debt" => Ok(IssueType::Debt),
            _ => Err(UnknownVariant::new("issue type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceBand {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹ {} - {}", self.min, self.max)
    }
}

/// Post-listing market data. Only a listed IPO carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub listing_date: NaiveDate,
    pub ipo_price: Decimal,
    pub listing_price: Decimal,
    pub current_market_price: Decimal,
    /// Percent, as supplied at registration.
    pub listing_gain: Decimal,
    /// Percent, as supplied at registration.
    pub current_return: Decimal,
}

impl Listing {
    /// Percentage change from `from` to `to`, two decimal places.
    /// Zero when `from` is zero.
    pub fn pct_change(from: Decimal, to: Decimal) -> Decimal {
        if from.is_zero() {
            return Decimal::ZERO;
        }
        ((to - from) / from * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IpoStage {
    Upcoming,
    Ongoing,
    Listed(Listing),
}

impl IpoStage {
    pub fn status(&self) -> IpoStatus {
        match self {
            IpoStage::Upcoming => IpoStatus::Upcoming,
            IpoStage::Ongoing => IpoStatus::Ongoing,
            IpoStage::Listed(_) => IpoStatus::Listed,
        }
    }

    pub fn listing(&self) -> Option<&Listing> {
        match self {
            IpoStage::Listed(l) => Some(l),
            IpoStage::Upcoming | IpoStage::Ongoing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoRecord {
    pub id: String,
    pub company_name: String,
    pub sector: String,
    pub price_band: PriceBand,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub issue_size: Decimal, // crore
    pub issue_type: IssueType,
    pub lot_size: Option<u32>,
    #[serde(flatten)]
    pub stage: IpoStage,
    pub rhp_pdf: Option<String>,
    pub drhp_pdf: Option<String>,
}

impl IpoRecord {
    pub fn status(&self) -> IpoStatus {
        self.stage.status()
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.stage.listing()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllotmentStatus {
    Pending,
    #[serde(rename = "Not Allotted")]
    NotAllotted,
    #[serde(rename = "Partially Allotted")]
    PartiallyAllotted,
    #[serde(rename = "Fully Allotted")]
    FullyAllotted,
}

impl AllotmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllotmentStatus::Pending => "Pending",
            AllotmentStatus::NotAllotted => "Not Allotted",
            AllotmentStatus::PartiallyAllotted => "Partially Allotted",
            AllotmentStatus::FullyAllotted => "Fully Allotted",
        }
    }
}

impl fmt::Display for AllotmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An investor's bid on an IPO, plus its allotment once known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub application_number: String,
    pub ipo_id: String,
    pub company_name: String,
    pub pan: String,
    pub applied_shares: u32,
    pub bid_price: Decimal,
    pub allotted_shares: Option<u32>,
    pub applied_on: NaiveDate,
}

impl Application {
    pub fn allotment_status(&self) -> AllotmentStatus {
        match self.allotted_shares {
            None => AllotmentStatus::Pending,
            Some(0) => AllotmentStatus::NotAllotted,
            Some(n) if n >= self.applied_shares => AllotmentStatus::FullyAllotted,
            Some(_) => AllotmentStatus::PartiallyAllotted,
        }
    }

    pub fn refund_amount(&self) -> Option<Decimal> {
        let allotted = self.allotted_shares?;
        let unallotted = self.applied_shares.saturating_sub(allotted);
        Some(Decimal::from(unallotted) * self.bid_price)
    }
}
