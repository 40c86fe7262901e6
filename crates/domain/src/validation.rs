// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::case_number::normalize_prefix;
use crate::error::DomainError;
use crate::template::{ReportTemplate, SectionBody};
use crate::types::{Attachment, CaseActivity, CaseUpdate, Organization, Subject, SubjectRole};
use std::collections::HashSet;
use uuid::Uuid;

/// Validates an organization's required fields.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The case number prefix is not 1 to 10 alphanumeric characters
pub fn validate_organization(organization: &Organization) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if organization.name.trim().is_empty() {
        return Err(DomainError::InvalidOrganizationName(String::from(
            "Name cannot be empty",
        )));
    }

    normalize_prefix(&organization.case_number_prefix)?;

    Ok(())
}

/// Validates the fields supplied when opening a case.
///
/// # Errors
///
/// Returns an error if the title or case type is empty.
pub fn validate_case_fields(title: &str, case_type: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidCaseTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if case_type.trim().is_empty() {
        return Err(DomainError::InvalidCaseType(String::from(
            "Case type cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a subject before it is attached to a case.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - A client is flagged as primary
pub fn validate_subject(subject: &Subject) -> Result<(), DomainError> {
    if subject.name.trim().is_empty() {
        return Err(DomainError::InvalidSubject(String::from(
            "Name cannot be empty",
        )));
    }

    // Rule: only investigated parties can be primary
    if subject.is_primary && subject.role == SubjectRole::Client {
        return Err(DomainError::ClientCannotBePrimary {
            name: subject.name.clone(),
        });
    }

    Ok(())
}

/// Validates a case update.
///
/// # Errors
///
/// Returns an error if the type, title or body is empty.
pub fn validate_update(update: &CaseUpdate) -> Result<(), DomainError> {
    require_text("update_type", &update.update_type)?;
    require_text("title", &update.title)?;
    require_text("body", &update.body)
}

/// Validates a case activity.
///
/// # Errors
///
/// Returns an error if the type or title is empty.
pub fn validate_activity(activity: &CaseActivity) -> Result<(), DomainError> {
    require_text("activity_type", &activity.activity_type)?;
    require_text("title", &activity.title)
}

/// Validates attachment metadata.
///
/// # Errors
///
/// Returns an error if the file name, content type or storage path is empty.
pub fn validate_attachment(attachment: &Attachment) -> Result<(), DomainError> {
    if attachment.file_name.trim().is_empty() {
        return Err(DomainError::InvalidAttachment(String::from(
            "File name cannot be empty",
        )));
    }
    if attachment.content_type.trim().is_empty() {
        return Err(DomainError::InvalidAttachment(String::from(
            "Content type cannot be empty",
        )));
    }
    if attachment.storage_path.trim().is_empty() {
        return Err(DomainError::InvalidAttachment(String::from(
            "Storage path cannot be empty",
        )));
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidRecord {
            field,
            reason: String::from("cannot be empty"),
        });
    }
    Ok(())
}

/// Validates a report template's structure.
///
/// # Errors
///
/// Returns an error if:
/// - The template name is empty
/// - Two sections share an identifier
/// - A section title is empty
/// - A variable block lists no variables
pub fn validate_template(template: &ReportTemplate) -> Result<(), DomainError> {
    if template.name.trim().is_empty() {
        return Err(DomainError::InvalidTemplate(String::from(
            "Template name cannot be empty",
        )));
    }

    let mut seen: HashSet<Uuid> = HashSet::new();
    for section in &template.sections {
        // Rule: section ids are the customization keys, so they must be unique
        if !seen.insert(section.section_id) {
            return Err(DomainError::DuplicateSectionId(section.section_id));
        }

        if section.title.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "Section {} has an empty title",
                section.section_id
            )));
        }

        if let SectionBody::VariableBlock(config) = &section.body {
            if config.variables.is_empty() {
                return Err(DomainError::InvalidTemplate(format!(
                    "Variable block '{}' lists no variables",
                    section.title
                )));
            }
        }
    }

    Ok(())
}
