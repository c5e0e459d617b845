// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Listing engine: status/search filtering, pagination and dashboard stats.
//!
//! Everything here is a pure function over a caller-owned slice. Filtering is
//! stable, and calling any function twice with the same inputs gives the same
//! output.

use crate::models::{Application, IpoRecord, IpoStatus, UnknownVariant};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page numbers shown around the current page.
pub const WINDOW_PAGES: usize = 5;

/// Something the filter predicate can be applied to.
pub trait Listable {
    /// `None` means the item has no status and only `StatusFilter::All` keeps it.
    fn status(&self) -> Option<IpoStatus>;

    /// Fields searched by the free-text needle.
    fn haystacks(&self) -> [&str; 2];
}

impl Listable for IpoRecord {
    fn status(&self) -> Option<IpoStatus> {
        Some(IpoRecord::status(self))
    }

    fn haystacks(&self) -> [&str; 2] {
        [self.company_name.as_str(), self.sector.as_str()]
    }
}

impl Listable for Application {
    fn status(&self) -> Option<IpoStatus> {
        None
    }

    fn haystacks(&self) -> [&str; 2] {
        [self.company_name.as_str(), self.application_number.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(IpoStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: Option<IpoStatus>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(want) => status == Some(*want),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<IpoStatus>().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpoQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
}

impl IpoQuery {
    pub fn new(status: StatusFilter, search: Option<&str>) -> Self {
        Self {
            status,
            search: search.map(|s| s.to_string()),
        }
    }

    pub fn status(status: IpoStatus) -> Self {
        Self::new(StatusFilter::Only(status), None)
    }

    pub fn search(needle: &str) -> Self {
        Self::new(StatusFilter::All, Some(needle))
    }
}

/// Case-insensitive substring match of `needle` against any haystack.
/// An empty needle matches everything.
pub fn search_matches(haystacks: &[&str], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

pub fn record_matches<T: Listable>(item: &T, query: &IpoQuery) -> bool {
    if !query.status.matches(item.status()) {
        return false;
    }
    match query.search.as_deref() {
        Some(needle) => search_matches(&item.haystacks(), needle),
        None => true,
    }
}

/// Stable filter: survivors keep their relative order.
pub fn filter_records<T: Listable + Clone>(items: &[T], query: &IpoQuery) -> Vec<T> {
    items
        .iter()
        .filter(|item| record_matches(*item, query))
        .cloned()
        .collect()
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Clamp a requested 1-based page into `[1, total_pages]`; 1 when there are no pages.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out 1-based `page`. Page 0 or a page past the end gives an empty
/// `items`, never an error; clamping is the caller's job.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = total_pages(items.len(), page_size);
    let slice = match page.checked_sub(1) {
        Some(idx) => {
            let start = idx.saturating_mul(page_size).min(items.len());
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        }
        None => &items[..0],
    };
    Page {
        items: slice.to_vec(),
        page,
        page_size,
        total_pages: total,
        total_items: items.len(),
    }
}

/// Filter, clamp the page, then paginate. This is what list views call.
pub fn query_page(
    records: &[IpoRecord],
    query: &IpoQuery,
    page_size: usize,
    page: usize,
) -> Page<IpoRecord> {
    let filtered = filter_records(records, query);
    let page = clamp_page(page, total_pages(filtered.len(), page_size));
    paginate(&filtered, page_size, page)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,
    /// Set when the last page sits beyond the window behind an ellipsis.
    pub jump_to_last: Option<usize>,
}

pub fn page_window(current: usize, total_pages: usize) -> PageWindow {
    let half = WINDOW_PAGES / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = total_pages.min(start + WINDOW_PAGES - 1);
    if end + 1 < start + WINDOW_PAGES {
        start = (end + 1).saturating_sub(WINDOW_PAGES).max(1);
    }
    let pages = if total_pages == 0 {
        Vec::new()
    } else {
        (start..=end).collect()
    };
    let jump_to_last = (total_pages > 10 && current + 2 < total_pages).then_some(total_pages);
    PageWindow {
        pages,
        has_prev: current > 1,
        has_next: current < total_pages,
        jump_to_last,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpoStats {
    pub total: usize,
    pub upcoming: usize,
    pub ongoing: usize,
    pub listed: usize,
    pub avg_return: Decimal,
}

impl IpoStats {
    pub fn compute(records: &[IpoRecord]) -> Self {
        let count = |s: IpoStatus| records.iter().filter(|r| r.status() == s).count();
        let returns: Vec<Decimal> = records
            .iter()
            .filter_map(|r| r.listing().map(|l| l.current_return))
            .collect();
        let avg_return = if returns.is_empty() {
            Decimal::ZERO
        } else {
            returns.iter().sum::<Decimal>() / Decimal::from(returns.len())
        };
        Self {
            total: records.len(),
            upcoming: count(IpoStatus::Upcoming),
            ongoing: count(IpoStatus::Ongoing),
            listed: count(IpoStatus::Listed),
            avg_return,
        }
    }
}
