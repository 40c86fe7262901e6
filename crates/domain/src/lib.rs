// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod case_number;
mod customization;
mod error;
mod reorder;
mod template;
mod types;
mod validation;
mod variables;

#[cfg(test)]
mod tests;

pub use case_number::{
    CaseNumber, SEQUENCE_WIDTH, format_case_number, next_case_number_fallback, normalize_prefix,
};
pub use customization::{
    CollectionConfigOverride, SectionOverride, TemplateCustomization, effective_sections,
    merge_customization, validate_customization,
};
pub use reorder::{DisplayOrderChange, move_section, normalize_display_order};
pub use template::{
    CollectionConfig, ReportTemplate, SectionBody, SectionType, SortOrder, TemplateSection,
    VariableBlockConfig, VariableLayout,
};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Attachment, Case, CaseActivity, CaseCounts, CaseStatus, CaseUpdate, Organization, Subject,
    SubjectKind, SubjectRole, format_display_date, format_iso_date, parse_iso_date,
};
pub use validation::{
    validate_activity, validate_attachment, validate_case_fields, validate_organization,
    validate_subject, validate_template, validate_update,
};
pub use variables::{
    PlaceholderToken, VariableMap, build_variable_map, literal_text, substitute_placeholders,
    unknown_placeholders, unresolved_tokens,
};
