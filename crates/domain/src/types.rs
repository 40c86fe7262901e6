// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// An organization that owns cases and report templates.
///
/// Branding fields are exposed to report templates as placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the organization has not been persisted yet.
    pub organization_id: Option<i64>,
    /// The organization's display name.
    pub name: String,
    /// Postal address, as a single line.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Public website.
    pub website: Option<String>,
    /// URL of the logo shown on report cover pages.
    pub logo_url: Option<String>,
    /// Prefix used when numbering cases (e.g. `CASE`).
    pub case_number_prefix: String,
}

impl Organization {
    /// Creates a new unpersisted organization with no optional branding fields.
    ///
    /// The prefix is normalized to uppercase.
    #[must_use]
    pub fn new(name: &str, case_number_prefix: &str) -> Self {
        Self {
            organization_id: None,
            name: name.trim().to_string(),
            address: None,
            phone: None,
            email: None,
            website: None,
            logo_url: None,
            case_number_prefix: case_number_prefix.trim().to_uppercase(),
        }
    }
}

/// The status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CaseStatus {
    /// Newly created, not yet worked.
    #[default]
    Open,
    /// Investigation in progress.
    Active,
    /// Paused pending external input.
    OnHold,
    /// Work finished. Only reopening is allowed.
    Closed,
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "Active" => Ok(Self::Active),
            "OnHold" => Ok(Self::OnHold),
            "Closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidCaseStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CaseStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Active => "Active",
            Self::OnHold => "OnHold",
            Self::Closed => "Closed",
        }
    }

    /// Human-readable label used in rendered reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Active => "Active",
            Self::OnHold => "On Hold",
            Self::Closed => "Closed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Any non-closed status may move to any other status.
    /// A closed case may only be reopened.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        match self {
            Self::Closed => target == Self::Open,
            Self::Open | Self::Active | Self::OnHold => *self != target,
        }
    }

    /// Returns whether the case accepts new subjects, updates and activities.
    #[must_use]
    pub const fn accepts_records(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Aggregate record counts maintained on the case row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseCounts {
    /// Number of subjects (including clients).
    pub subjects: u32,
    /// Number of case updates.
    pub updates: u32,
    /// Number of case activities.
    pub events: u32,
    /// Number of attachments.
    pub attachments: u32,
}

/// An investigation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// The canonical numeric identifier assigned by the database.
    pub case_id: Option<i64>,
    /// The owning organization.
    pub organization_id: i64,
    /// Organization-unique case number (e.g. `CASE-00042`).
    pub case_number: String,
    /// The case title.
    pub title: String,
    /// While set, designating a primary subject retitles the case.
    pub auto_title: bool,
    /// Current status.
    pub status: CaseStatus,
    /// Free-form case type (e.g. "Surveillance", "Background Check").
    pub case_type: String,
    /// Linked account (the client organization).
    pub account_name: Option<String>,
    /// Linked contact at the account.
    pub contact_name: Option<String>,
    /// The case manager's display name.
    pub manager_name: Option<String>,
    /// The date the case was opened.
    pub opened_on: Date,
    /// Optional due date.
    pub due_date: Option<Date>,
    /// Aggregate counts.
    pub counts: CaseCounts,
}

/// The kind of entity a subject represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubjectKind {
    #[default]
    Person,
    Business,
    Vehicle,
    Location,
    Other,
}

impl FromStr for SubjectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Person" => Ok(Self::Person),
            "Business" => Ok(Self::Business),
            "Vehicle" => Ok(Self::Vehicle),
            "Location" => Ok(Self::Location),
            "Other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidSubjectKind(s.to_string())),
        }
    }
}

impl SubjectKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Business => "Business",
            Self::Vehicle => "Vehicle",
            Self::Location => "Location",
            Self::Other => "Other",
        }
    }
}

/// Whether a party is investigated or is the client who ordered the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubjectRole {
    #[default]
    Subject,
    Client,
}

impl FromStr for SubjectRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Subject" => Ok(Self::Subject),
            "Client" => Ok(Self::Client),
            _ => Err(DomainError::InvalidSubjectRole(s.to_string())),
        }
    }
}

impl SubjectRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::Client => "Client",
        }
    }
}

/// A person, business, vehicle or place attached to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// The canonical numeric identifier assigned by the database.
    pub subject_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// What the subject is.
    pub kind: SubjectKind,
    /// Investigated party or client.
    pub role: SubjectRole,
    /// Whether this is the case's primary subject.
    pub is_primary: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl Subject {
    /// Creates a new unpersisted subject.
    #[must_use]
    pub fn new(name: &str, kind: SubjectKind, role: SubjectRole, is_primary: bool) -> Self {
        Self {
            subject_id: None,
            name: name.trim().to_string(),
            kind,
            role,
            is_primary,
            notes: None,
        }
    }
}

/// A narrative update entered on a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseUpdate {
    /// The canonical numeric identifier assigned by the database.
    pub update_id: Option<i64>,
    /// Update type used by template type filters (e.g. "Surveillance").
    pub update_type: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Author display name.
    pub author_name: Option<String>,
    /// When the update was written.
    pub created_at: OffsetDateTime,
}

/// A dated activity (event) on a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseActivity {
    /// The canonical numeric identifier assigned by the database.
    pub activity_id: Option<i64>,
    /// Activity type used by template type filters (e.g. "Interview").
    pub activity_type: String,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// When the activity took place.
    pub occurred_at: OffsetDateTime,
}

/// Metadata for a file attached to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The canonical numeric identifier assigned by the database.
    pub attachment_id: Option<i64>,
    /// Original file name.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Object storage key.
    pub storage_path: String,
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Formats a date for display in rendered documents (e.g. `March 5, 2026`).
#[must_use]
pub fn format_display_date(date: Date) -> String {
    date.format(format_description!(
        "[month repr:long] [day padding:none], [year]"
    ))
    .unwrap_or_default()
}
