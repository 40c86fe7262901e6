// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Placeholder vocabulary and substitution.
//!
//! Templates reference organization and case data through a fixed set of
//! `{{token_name}}` placeholders. A `VariableMap` is computed once per
//! render from the organization, the case and its subjects, and every text
//! fragment (static sections, cover page, header, footer, email bodies) is
//! filled from that same map.
//!
//! Substitution is a single left-to-right scan of the template text. Each
//! `{{name}}` is resolved once and the inserted value is never rescanned,
//! so the result does not depend on token order. Recognized tokens without
//! a value become the empty string. Text that merely looks like a
//! placeholder but is not in the vocabulary is left as is.
//!
//! Values are data, not template text: a `{{` inside a stored value is
//! broken up to `{ {` so it can never read as a placeholder in the output.

use crate::error::DomainError;
use crate::types::{Case, Organization, Subject, SubjectRole, format_display_date};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// A recognized placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderToken {
    CaseNumber,
    CaseTitle,
    CaseStatus,
    CaseType,
    CaseManager,
    CaseOpenedDate,
    CaseDueDate,
    AccountName,
    ContactName,
    PrimarySubject,
    SubjectList,
    ClientList,
    SubjectCount,
    UpdateCount,
    EventCount,
    AttachmentCount,
    OrgName,
    OrgAddress,
    OrgPhone,
    OrgEmail,
    OrgWebsite,
    OrgLogoUrl,
    ReportDate,
    ReportTitle,
}

impl PlaceholderToken {
    /// Every recognized token.
    pub const ALL: [Self; 24] = [
        Self::CaseNumber,
        Self::CaseTitle,
        Self::CaseStatus,
        Self::CaseType,
        Self::CaseManager,
        Self::CaseOpenedDate,
        Self::CaseDueDate,
        Self::AccountName,
        Self::ContactName,
        Self::PrimarySubject,
        Self::SubjectList,
        Self::ClientList,
        Self::SubjectCount,
        Self::UpdateCount,
        Self::EventCount,
        Self::AttachmentCount,
        Self::OrgName,
        Self::OrgAddress,
        Self::OrgPhone,
        Self::OrgEmail,
        Self::OrgWebsite,
        Self::OrgLogoUrl,
        Self::ReportDate,
        Self::ReportTitle,
    ];

    /// The token name as written between braces.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CaseNumber => "case_number",
            Self::CaseTitle => "case_title",
            Self::CaseStatus => "case_status",
            Self::CaseType => "case_type",
            Self::CaseManager => "case_manager",
            Self::CaseOpenedDate => "case_opened_date",
            Self::CaseDueDate => "case_due_date",
            Self::AccountName => "account_name",
            Self::ContactName => "contact_name",
            Self::PrimarySubject => "primary_subject",
            Self::SubjectList => "subject_list",
            Self::ClientList => "client_list",
            Self::SubjectCount => "subject_count",
            Self::UpdateCount => "update_count",
            Self::EventCount => "event_count",
            Self::AttachmentCount => "attachment_count",
            Self::OrgName => "org_name",
            Self::OrgAddress => "org_address",
            Self::OrgPhone => "org_phone",
            Self::OrgEmail => "org_email",
            Self::OrgWebsite => "org_website",
            Self::OrgLogoUrl => "org_logo_url",
            Self::ReportDate => "report_date",
            Self::ReportTitle => "report_title",
        }
    }

    /// The placeholder as it appears in template text, e.g. `{{case_number}}`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name())
    }

    /// Row label used by variable blocks.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CaseNumber => "Case Number",
            Self::CaseTitle => "Case Title",
            Self::CaseStatus => "Status",
            Self::CaseType => "Case Type",
            Self::CaseManager => "Case Manager",
            Self::CaseOpenedDate => "Date Opened",
            Self::CaseDueDate => "Due Date",
            Self::AccountName => "Account",
            Self::ContactName => "Contact",
            Self::PrimarySubject => "Primary Subject",
            Self::SubjectList => "Subjects",
            Self::ClientList => "Clients",
            Self::SubjectCount => "Subject Count",
            Self::UpdateCount => "Update Count",
            Self::EventCount => "Event Count",
            Self::AttachmentCount => "Attachment Count",
            Self::OrgName => "Organization",
            Self::OrgAddress => "Address",
            Self::OrgPhone => "Phone",
            Self::OrgEmail => "Email",
            Self::OrgWebsite => "Website",
            Self::OrgLogoUrl => "Logo",
            Self::ReportDate => "Report Date",
            Self::ReportTitle => "Report Title",
        }
    }
}

impl FromStr for PlaceholderToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: &str = s.trim().trim_start_matches("{{").trim_end_matches("}}");
        Self::ALL
            .iter()
            .copied()
            .find(|token| token.name() == name)
            .ok_or_else(|| DomainError::UnknownPlaceholder(s.to_string()))
    }
}

impl std::fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Precomputed values for every placeholder token available to a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    values: BTreeMap<PlaceholderToken, String>,
}

impl VariableMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value. Empty values are stored as missing.
    pub fn set(&mut self, token: PlaceholderToken, value: impl Into<String>) {
        let value: String = literal_text(&value.into());
        if value.is_empty() {
            self.values.remove(&token);
        } else {
            self.values.insert(token, value);
        }
    }

    /// Sets a value when present.
    pub fn set_opt(&mut self, token: PlaceholderToken, value: Option<&str>) {
        if let Some(v) = value {
            self.set(token, v);
        }
    }

    /// Returns the value for a token, if any.
    #[must_use]
    pub fn get(&self, token: PlaceholderToken) -> Option<&str> {
        self.values.get(&token).map(String::as_str)
    }

    /// Returns the value for a token or the empty string.
    #[must_use]
    pub fn value_or_empty(&self, token: PlaceholderToken) -> &str {
        self.get(token).unwrap_or("")
    }

    /// Returns a copy with every value transformed, e.g. escaped for HTML.
    #[must_use]
    pub fn map_values(&self, transform: impl Fn(&str) -> String) -> Self {
        let mut mapped: Self = Self::new();
        for (token, value) in &self.values {
            mapped.set(*token, transform(value));
        }
        mapped
    }
}

/// Builds the variable map for one case at one point in time.
///
/// Computed case variables:
/// - primary subject: the subject flagged primary, else the first subject-role party
/// - subject list and client list: names joined with `, ` in input order
/// - client list falls back to the linked account when no client party exists
/// - dates are formatted for display (`March 5, 2026`)
#[must_use]
pub fn build_variable_map(
    organization: &Organization,
    case: &Case,
    subjects: &[Subject],
    report_date: Date,
    report_title: &str,
) -> VariableMap {
    let mut map: VariableMap = VariableMap::new();

    map.set(PlaceholderToken::CaseNumber, case.case_number.as_str());
    map.set(PlaceholderToken::CaseTitle, case.title.as_str());
    map.set(PlaceholderToken::CaseStatus, case.status.label());
    map.set(PlaceholderToken::CaseType, case.case_type.as_str());
    map.set_opt(PlaceholderToken::CaseManager, case.manager_name.as_deref());
    map.set(
        PlaceholderToken::CaseOpenedDate,
        format_display_date(case.opened_on),
    );
    if let Some(due) = case.due_date {
        map.set(PlaceholderToken::CaseDueDate, format_display_date(due));
    }
    map.set_opt(PlaceholderToken::AccountName, case.account_name.as_deref());
    map.set_opt(PlaceholderToken::ContactName, case.contact_name.as_deref());

    let investigated: Vec<&Subject> = subjects
        .iter()
        .filter(|s| s.role == SubjectRole::Subject)
        .collect();
    let primary: Option<&Subject> = investigated
        .iter()
        .find(|s| s.is_primary)
        .or_else(|| investigated.first())
        .copied();
    map.set_opt(
        PlaceholderToken::PrimarySubject,
        primary.map(|s| s.name.as_str()),
    );
    map.set(
        PlaceholderToken::SubjectList,
        join_names(investigated.iter().copied()),
    );

    let clients: String = join_names(subjects.iter().filter(|s| s.role == SubjectRole::Client));
    if clients.is_empty() {
        map.set_opt(PlaceholderToken::ClientList, case.account_name.as_deref());
    } else {
        map.set(PlaceholderToken::ClientList, clients);
    }

    map.set(
        PlaceholderToken::SubjectCount,
        case.counts.subjects.to_string(),
    );
    map.set(PlaceholderToken::UpdateCount, case.counts.updates.to_string());
    map.set(PlaceholderToken::EventCount, case.counts.events.to_string());
    map.set(
        PlaceholderToken::AttachmentCount,
        case.counts.attachments.to_string(),
    );

    map.set(PlaceholderToken::OrgName, organization.name.as_str());
    map.set_opt(PlaceholderToken::OrgAddress, organization.address.as_deref());
    map.set_opt(PlaceholderToken::OrgPhone, organization.phone.as_deref());
    map.set_opt(PlaceholderToken::OrgEmail, organization.email.as_deref());
    map.set_opt(PlaceholderToken::OrgWebsite, organization.website.as_deref());
    map.set_opt(PlaceholderToken::OrgLogoUrl, organization.logo_url.as_deref());

    map.set(PlaceholderToken::ReportDate, format_display_date(report_date));
    map.set(PlaceholderToken::ReportTitle, report_title);

    map
}

fn join_names<'a>(subjects: impl Iterator<Item = &'a Subject>) -> String {
    subjects
        .map(|s| s.name.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Replaces every recognized placeholder in `text`.
///
/// Recognized tokens without a value are replaced with the empty string.
/// Unrecognized `{{...}}` sequences are left untouched.
#[must_use]
pub fn substitute_placeholders(text: &str, variables: &VariableMap) -> String {
    let mut output: String = String::with_capacity(text.len());
    let mut rest: &str = text;
    while let Some(start) = rest.find("{{") {
        let (before, candidate) = rest.split_at(start);
        output.push_str(before);
        let after_open: &str = &candidate[2..];
        let resolved: Option<(PlaceholderToken, usize)> = after_open
            .find("}}")
            .and_then(|end| recognized_token(&after_open[..end]).map(|token| (token, end)));
        if let Some((token, end)) = resolved {
            output.push_str(variables.value_or_empty(token));
            rest = &after_open[end + 2..];
        } else {
            // Not a placeholder here; a later `{` may still open one.
            output.push('{');
            rest = &candidate[1..];
        }
    }
    output.push_str(rest);
    output
}

/// Breaks up every `{{` in record data so it cannot read as a placeholder.
#[must_use]
pub fn literal_text(text: &str) -> String {
    let mut output: String = text.to_string();
    while output.contains("{{") {
        output = output.replace("{{", "{ {");
    }
    output
}

fn recognized_token(name: &str) -> Option<PlaceholderToken> {
    PlaceholderToken::ALL
        .iter()
        .copied()
        .find(|token| token.name() == name)
}

/// Lists the recognized tokens still present in `text`.
#[must_use]
pub fn unresolved_tokens(text: &str) -> Vec<PlaceholderToken> {
    PlaceholderToken::ALL
        .iter()
        .copied()
        .filter(|token| text.contains(&token.placeholder()))
        .collect()
}

/// Lists `{{...}}` sequences in `text` that are not recognized tokens.
///
/// Used to warn template authors about typos; such text renders verbatim.
#[must_use]
pub fn unknown_placeholders(text: &str) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    let mut rest: &str = text;
    while let Some(start) = rest.find("{{") {
        let after_open: &str = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        let name: &str = &after_open[..end];
        if name.parse::<PlaceholderToken>().is_err() && !unknown.iter().any(|u| u == name) {
            unknown.push(name.to_string());
        }
        rest = &after_open[end + 2..];
    }
    unknown
}
