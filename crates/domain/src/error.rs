// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::CaseStatus;
use uuid::Uuid;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Organization name is empty or invalid.
    InvalidOrganizationName(String),
    /// Case number prefix is empty or contains invalid characters.
    InvalidCaseNumberPrefix(String),
    /// A case number could not be parsed.
    InvalidCaseNumber(String),
    /// Case title is empty or invalid.
    InvalidCaseTitle(String),
    /// Case type is empty or invalid.
    InvalidCaseType(String),
    /// Case status string is not recognized.
    InvalidCaseStatus(String),
    /// The requested status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: CaseStatus,
        /// The requested status.
        to: CaseStatus,
    },
    /// The case is closed and cannot accept new records.
    CaseClosed {
        /// The case number of the closed case.
        case_number: String,
    },
    /// Subject fields are invalid.
    InvalidSubject(String),
    /// Subject kind string is not recognized.
    InvalidSubjectKind(String),
    /// Subject role string is not recognized.
    InvalidSubjectRole(String),
    /// A client cannot be designated as the primary subject.
    ClientCannotBePrimary {
        /// The client's name.
        name: String,
    },
    /// A case update or activity record is invalid.
    InvalidRecord {
        /// The field that was invalid.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// Attachment metadata is invalid.
    InvalidAttachment(String),
    /// Template fields are invalid.
    InvalidTemplate(String),
    /// Two sections in a template share an identifier.
    DuplicateSectionId(Uuid),
    /// A section identifier does not belong to the template.
    SectionNotFound(Uuid),
    /// A section appears more than once in a customization's order list.
    DuplicateOrderEntry(Uuid),
    /// A collection override targets a section that is not a collection.
    CollectionOverrideOnNonCollection {
        /// The targeted section.
        section_id: Uuid,
    },
    /// Section type string is not recognized.
    InvalidSectionType(String),
    /// Sort order string is not recognized.
    InvalidSortOrder(String),
    /// Placeholder token name is not part of the recognized vocabulary.
    UnknownPlaceholder(String),
    /// A move target lies outside the section list.
    SectionIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of sections.
        len: usize,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrganizationName(msg) => write!(f, "Invalid organization name: {msg}"),
            Self::InvalidCaseNumberPrefix(msg) => write!(f, "Invalid case number prefix: {msg}"),
            Self::InvalidCaseNumber(value) => write!(f, "Invalid case number: '{value}'"),
            Self::InvalidCaseTitle(msg) => write!(f, "Invalid case title: {msg}"),
            Self::InvalidCaseType(msg) => write!(f, "Invalid case type: {msg}"),
            Self::InvalidCaseStatus(value) => write!(f, "Invalid case status: '{value}'"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change case status from {from} to {to}")
            }
            Self::CaseClosed { case_number } => {
                write!(f, "Case {case_number} is closed and cannot be modified")
            }
            Self::InvalidSubject(msg) => write!(f, "Invalid subject: {msg}"),
            Self::InvalidSubjectKind(value) => write!(f, "Invalid subject kind: '{value}'"),
            Self::InvalidSubjectRole(value) => write!(f, "Invalid subject role: '{value}'"),
            Self::ClientCannotBePrimary { name } => {
                write!(f, "Client '{name}' cannot be the primary subject")
            }
            Self::InvalidRecord { field, reason } => {
                write!(f, "Invalid record field '{field}': {reason}")
            }
            Self::InvalidAttachment(msg) => write!(f, "Invalid attachment: {msg}"),
            Self::InvalidTemplate(msg) => write!(f, "Invalid template: {msg}"),
            Self::DuplicateSectionId(id) => write!(f, "Duplicate section id {id}"),
            Self::SectionNotFound(id) => write!(f, "Section {id} does not belong to the template"),
            Self::DuplicateOrderEntry(id) => {
                write!(f, "Section {id} appears more than once in the section order")
            }
            Self::CollectionOverrideOnNonCollection { section_id } => {
                write!(
                    f,
                    "Section {section_id} is not a collection and cannot take a collection override"
                )
            }
            Self::InvalidSectionType(value) => write!(f, "Invalid section type: '{value}'"),
            Self::InvalidSortOrder(value) => write!(f, "Invalid sort order: '{value}'"),
            Self::UnknownPlaceholder(value) => write!(f, "Unknown placeholder: '{value}'"),
            Self::SectionIndexOutOfRange { index, len } => {
                write!(f, "Section index {index} is out of range for {len} sections")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
