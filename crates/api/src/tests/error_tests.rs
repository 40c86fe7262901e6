// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook::{CoreError, ReportError};
use casebook_domain::{CaseStatus, DomainError};
use casebook_persistence::PersistenceError;

use crate::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_report_error,
};

#[test]
fn test_status_transition_is_rule_violation() {
    let err: ApiError = translate_domain_error(DomainError::InvalidStatusTransition {
        from: CaseStatus::Closed,
        to: CaseStatus::Active,
    });

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "status_transition"
    ));
}

#[test]
fn test_record_field_error_names_the_field() {
    let err: ApiError = translate_domain_error(DomainError::InvalidRecord {
        field: "body",
        reason: String::from("cannot be empty"),
    });

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "body"));
}

#[test]
fn test_core_error_unwraps_report_customization() {
    let section_id = uuid::Uuid::new_v4();
    let err: ApiError = translate_core_error(CoreError::Report(
        ReportError::InvalidCustomization(DomainError::SectionNotFound(section_id)),
    ));

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Section"),
            message: format!("Section {section_id} is not part of the template"),
        }
    );
}

#[test]
fn test_integrity_mismatch_is_internal() {
    let err: ApiError = translate_report_error(ReportError::IntegrityMismatch {
        stored: String::from("aa"),
        computed: String::from("bb"),
    });

    assert!(matches!(err, ApiError::Internal { .. }));
}

#[test]
fn test_persistence_errors_map_by_kind() {
    assert!(matches!(
        translate_persistence_error(PersistenceError::DuplicateCaseNumber(String::from(
            "CASE-00001"
        ))),
        ApiError::Conflict { ref resource_type, .. } if resource_type == "Case"
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::ReportNotFound(3)),
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Report"
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::DatabaseError(String::from("locked"))),
        ApiError::Internal { .. }
    ));
}

#[test]
fn test_display_includes_context() {
    let err: ApiError = ApiError::InvalidInput {
        field: String::from("format"),
        message: String::from("unsupported export format 'xlsx'"),
    };

    assert_eq!(
        err.to_string(),
        "Invalid input for field 'format': unsupported export format 'xlsx'"
    );
}
