// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ipodesk::models::{IssueType, PriceBand};
use ipodesk::utils::{
    fmt_inr, fmt_opt_date, fmt_pct, is_valid_application_number, is_valid_pan, parse_decimal,
    parse_price_band,
};
use rust_decimal::Decimal;

#[test]
fn price_band_accepts_form_spellings() {
    let want = PriceBand::new(Decimal::new(120, 0), Decimal::new(150, 0));
    assert_eq!(parse_price_band("120-150").unwrap(), want);
    assert_eq!(parse_price_band("₹120 - ₹150").unwrap(), want);
    assert_eq!(parse_price_band("120 to 150").unwrap(), want);
    assert!(parse_price_band("120").is_err());
    assert_eq!(want.to_string(), "₹ 120 - 150");
}

#[test]
fn decimals_strip_currency_percent_and_crore() {
    assert_eq!(parse_decimal("₹ 383").unwrap(), Decimal::new(383, 0));
    assert_eq!(parse_decimal("13.58 %").unwrap(), Decimal::new(1358, 2));
    assert_eq!(parse_decimal("2,300 Cr.").unwrap(), Decimal::new(2300, 0));
    assert!(parse_decimal("abc").is_err());
}

#[test]
fn identifiers_follow_their_formats() {
    assert!(is_valid_pan("ABCDE1234F"));
    assert!(!is_valid_pan("abcde1234f"));
    assert!(!is_valid_pan("ABCDE12345"));
    assert!(is_valid_application_number("APP001234567"));
    assert!(!is_valid_application_number("APP00123456"));
}

#[test]
fn issue_type_parsing_is_lenient() {
    assert_eq!("Main Board".parse::<IssueType>().unwrap(), IssueType::MainBoard);
    assert_eq!("main-board".parse::<IssueType>().unwrap(), IssueType::MainBoard);
    assert_eq!("sme".parse::<IssueType>().unwrap(), IssueType::Sme);
    assert!("equity".parse::<IssueType>().is_err());
}

#[test]
fn display_formats() {
    assert_eq!(fmt_inr(&Decimal::new(38300, 2)), "₹383.00");
    assert_eq!(fmt_pct(&Decimal::new(-727, 2)), "-7.27%");
    let d = NaiveDate::from_ymd_opt(2024, 1, 17);
    assert_eq!(fmt_opt_date(d), "17/01/2024");
    assert_eq!(fmt_opt_date(None), "-");
}
