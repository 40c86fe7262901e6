// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseStatus, DomainError};
use uuid::Uuid;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidStatusTransition {
        from: CaseStatus::Closed,
        to: CaseStatus::Active,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot change case status from Closed to Active"
    );

    let err: DomainError = DomainError::CaseClosed {
        case_number: String::from("CASE-00001"),
    };
    assert_eq!(
        format!("{err}"),
        "Case CASE-00001 is closed and cannot be modified"
    );

    let err: DomainError = DomainError::InvalidRecord {
        field: "title",
        reason: String::from("cannot be empty"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid record field 'title': cannot be empty"
    );

    let err: DomainError = DomainError::SectionIndexOutOfRange { index: 9, len: 3 };
    assert_eq!(
        format!("{err}"),
        "Section index 9 is out of range for 3 sections"
    );

    let id: Uuid = Uuid::nil();
    let err: DomainError = DomainError::SectionNotFound(id);
    assert_eq!(
        format!("{err}"),
        format!("Section {id} does not belong to the template")
    );
}

#[test]
fn test_domain_error_is_std_error() {
    let err: DomainError = DomainError::InvalidCaseType(String::from("empty"));
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert_eq!(boxed.to_string(), "Invalid case type: empty");
}
