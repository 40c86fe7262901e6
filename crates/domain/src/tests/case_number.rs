// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseNumber, DomainError, format_case_number, next_case_number_fallback};

#[test]
fn test_format_case_number_pads_to_five_digits() {
    assert_eq!(format_case_number("CASE", 42).unwrap(), "CASE-00042");
    assert_eq!(format_case_number("inv", 1).unwrap(), "INV-00001");
}

#[test]
fn test_format_case_number_widens_past_five_digits() {
    assert_eq!(format_case_number("CASE", 123_456).unwrap(), "CASE-123456");
}

#[test]
fn test_format_case_number_rejects_zero_and_bad_prefix() {
    assert!(matches!(
        format_case_number("CASE", 0),
        Err(DomainError::InvalidCaseNumber(_))
    ));
    assert!(matches!(
        format_case_number("CA SE", 1),
        Err(DomainError::InvalidCaseNumberPrefix(_))
    ));
    assert!(matches!(
        format_case_number("", 1),
        Err(DomainError::InvalidCaseNumberPrefix(_))
    ));
}

#[test]
fn test_parse_case_number() {
    let number: CaseNumber = CaseNumber::parse("CASE-00017").unwrap();
    assert_eq!(number.prefix(), "CASE");
    assert_eq!(number.sequence(), 17);
    assert_eq!(number.next().to_string(), "CASE-00018");

    assert!(CaseNumber::parse("CASE").is_err());
    assert!(CaseNumber::parse("CASE-12a").is_err());
    assert!(CaseNumber::parse("-00001").is_err());
}

#[test]
fn test_fallback_continues_after_highest_sequence() {
    let existing: Vec<String> = (1..=5)
        .map(|n| format_case_number("CASE", n).unwrap())
        .collect();

    let next: CaseNumber = next_case_number_fallback("CASE", &existing).unwrap();

    assert_eq!(next.to_string(), "CASE-00006");
}

#[test]
fn test_fallback_starts_at_one() {
    let existing: [&str; 0] = [];
    let next: CaseNumber = next_case_number_fallback("CASE", &existing).unwrap();

    assert_eq!(next.to_string(), "CASE-00001");
}

#[test]
fn test_fallback_ignores_other_prefixes_and_malformed_numbers() {
    let existing: [&str; 4] = ["CASE-00003", "INV-00099", "garbage", "CASE-00001"];

    let next: CaseNumber = next_case_number_fallback("case", &existing).unwrap();

    assert_eq!(next.to_string(), "CASE-00004");
}

#[test]
fn test_fallback_uses_numeric_not_lexical_order() {
    let existing: [&str; 2] = ["CASE-99999", "CASE-100000"];

    let next: CaseNumber = next_case_number_fallback("CASE", &existing).unwrap();

    assert_eq!(next.to_string(), "CASE-100001");
}
