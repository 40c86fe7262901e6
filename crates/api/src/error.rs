// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use casebook::{CoreError, ReportError};
use casebook_domain::DomainError;
use casebook_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request collides with an existing resource.
    Conflict {
        /// The type of resource that already exists.
        resource_type: String,
        /// A human-readable description of the collision.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

fn invalid_input(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn rule_violation(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidOrganizationName(_) => invalid_input("name", message),
        DomainError::InvalidCaseNumberPrefix(_) => invalid_input("case_number_prefix", message),
        DomainError::InvalidCaseNumber(_) => invalid_input("case_number", message),
        DomainError::InvalidCaseTitle(_) => invalid_input("title", message),
        DomainError::InvalidCaseType(_) => invalid_input("case_type", message),
        DomainError::InvalidCaseStatus(_) => invalid_input("status", message),
        DomainError::InvalidStatusTransition { .. } => {
            rule_violation("status_transition", message)
        }
        DomainError::CaseClosed { .. } => rule_violation("case_open", message),
        DomainError::InvalidSubject(_) => invalid_input("subject", message),
        DomainError::InvalidSubjectKind(_) => invalid_input("kind", message),
        DomainError::InvalidSubjectRole(_) => invalid_input("role", message),
        DomainError::ClientCannotBePrimary { .. } => rule_violation("primary_subject", message),
        DomainError::InvalidRecord { field, .. } => invalid_input(field, message),
        DomainError::InvalidAttachment(_) => invalid_input("attachment", message),
        DomainError::InvalidTemplate(_) => invalid_input("template", message),
        DomainError::DuplicateSectionId(_) => rule_violation("unique_section_id", message),
        DomainError::SectionNotFound(section_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Section"),
            message: format!("Section {section_id} is not part of the template"),
        },
        DomainError::DuplicateOrderEntry(_) => invalid_input("section_order", message),
        DomainError::CollectionOverrideOnNonCollection { .. } => {
            rule_violation("collection_override", message)
        }
        DomainError::InvalidSectionType(_) => invalid_input("section_type", message),
        DomainError::InvalidSortOrder(_) => invalid_input("sort_order", message),
        DomainError::UnknownPlaceholder(_) => invalid_input("placeholder", message),
        DomainError::SectionIndexOutOfRange { .. } => invalid_input("to_index", message),
        DomainError::DateParseError { .. } => invalid_input("date", message),
    }
}

/// Translates a report error into an API error.
#[must_use]
pub fn translate_report_error(err: ReportError) -> ApiError {
    match err {
        ReportError::InvalidCustomization(domain_err) => translate_domain_error(domain_err),
        ReportError::LayoutTooSmall { .. } => invalid_input("layout", err.to_string()),
        ReportError::UnsupportedFormat(_) => invalid_input("format", err.to_string()),
        ReportError::NotPersisted => rule_violation("report_persisted", err.to_string()),
        ReportError::IntegrityMismatch { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Report(report_err) => translate_report_error(report_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Missing rows become `ResourceNotFound`, uniqueness collisions become
/// `Conflict`, and everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::OrganizationNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Organization"),
            message,
        },
        PersistenceError::CaseNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Case"),
            message,
        },
        PersistenceError::TemplateNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Template"),
            message,
        },
        PersistenceError::ReportNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message,
        },
        PersistenceError::EventNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message,
        },
        PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::DuplicateCaseNumber(_) => ApiError::Conflict {
            resource_type: String::from("Case"),
            message,
        },
        PersistenceError::DuplicateTemplateName(_) => ApiError::Conflict {
            resource_type: String::from("Template"),
            message,
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::ReconstructionError(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => ApiError::Internal { message },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
