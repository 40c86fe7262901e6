// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, OpenCaseRequest};
use crate::error::CoreError;
use crate::state::{CaseChange, CaseFile, OpenCaseResult, TransitionResult};
use casebook_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use casebook_domain::{
    Case, CaseCounts, CaseStatus, DomainError, Organization, SubjectRole, validate_activity,
    validate_attachment, validate_case_fields, validate_subject, validate_update,
};
use time::Date;

/// Opens a new case for an organization.
///
/// The case number is allocated by the caller. When the request carries no
/// title the case is auto-titled: it starts with its case number as title and
/// takes the primary subject's name once one is designated.
///
/// # Arguments
///
/// * `organization` - The owning organization (must be persisted)
/// * `request` - The case fields
/// * `case_number` - The allocated case number
/// * `opened_on` - The opening date
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The organization has not been persisted
/// - The title or case type is empty
pub fn open_case(
    organization: &Organization,
    request: OpenCaseRequest,
    case_number: String,
    opened_on: Date,
    actor: Actor,
    cause: Cause,
) -> Result<OpenCaseResult, CoreError> {
    let organization_id: i64 = organization.organization_id.ok_or_else(|| {
        DomainError::InvalidOrganizationName(format!(
            "Organization '{}' has not been persisted",
            organization.name
        ))
    })?;

    let (title, auto_title): (String, bool) = match request.title {
        Some(title) if !title.trim().is_empty() => (title.trim().to_string(), false),
        _ => (case_number.clone(), true),
    };

    validate_case_fields(&title, &request.case_type)?;

    let case: Case = Case {
        case_id: None,
        organization_id,
        case_number: case_number.clone(),
        title,
        auto_title,
        status: CaseStatus::Open,
        case_type: request.case_type.trim().to_string(),
        account_name: request.account_name,
        contact_name: request.contact_name,
        manager_name: request.manager_name,
        opened_on,
        due_date: request.due_date,
        counts: CaseCounts::default(),
    };
    let case_file: CaseFile = CaseFile::new(case);

    let action: Action = Action::new(
        String::from("OpenCase"),
        Some(format!("Opened case {case_number}")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        case_file.to_snapshot(),
        AuditScope::Case { case_number },
    );

    Ok(OpenCaseResult {
        case_file,
        audit_event,
    })
}

/// Applies a command to a case, producing a new state, the row change and an audit event.
///
/// This function is pure and deterministic: the input state is not modified.
/// On success, exactly one audit event is produced.
///
/// # Arguments
///
/// * `case_file` - The current case state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The case is closed and the command is anything but reopening
/// - The record fails validation
/// - The status transition is not allowed
#[allow(clippy::too_many_lines)]
pub fn apply(
    case_file: &CaseFile,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();
    let is_status_change: bool = matches!(command, Command::ChangeStatus { .. });

    // Rule: a closed case only accepts being reopened
    if !case_file.case.status.accepts_records() && !is_status_change {
        return Err(CoreError::DomainViolation(DomainError::CaseClosed {
            case_number: case_file.case.case_number.clone(),
        }));
    }

    let mut new_state: CaseFile = case_file.clone();

    let (change, details): (CaseChange, String) = match command {
        Command::AddSubject { subject } => {
            validate_subject(&subject)?;

            if subject.is_primary {
                for existing in &mut new_state.subjects {
                    existing.is_primary = false;
                }
                // Rule: auto-titled cases follow the primary subject
                if new_state.case.auto_title && subject.role == SubjectRole::Subject {
                    new_state.case.title.clone_from(&subject.name);
                }
            }

            new_state.subjects.push(subject.clone());
            new_state.case.counts.subjects = new_state.case.counts.subjects.saturating_add(1);

            let details: String = format!(
                "Added {} '{}'{}",
                subject.role.as_str().to_lowercase(),
                subject.name,
                if subject.is_primary { " as primary" } else { "" }
            );
            (CaseChange::SubjectAdded(subject), details)
        }
        Command::RecordUpdate { update } => {
            validate_update(&update)?;

            new_state.updates.push(update.clone());
            new_state.case.counts.updates = new_state.case.counts.updates.saturating_add(1);

            let details: String = format!("Recorded {} update '{}'", update.update_type, update.title);
            (CaseChange::UpdateRecorded(update), details)
        }
        Command::RecordActivity { activity } => {
            validate_activity(&activity)?;

            new_state.activities.push(activity.clone());
            new_state.case.counts.events = new_state.case.counts.events.saturating_add(1);

            let details: String = format!(
                "Recorded {} activity '{}'",
                activity.activity_type, activity.title
            );
            (CaseChange::ActivityRecorded(activity), details)
        }
        Command::RegisterAttachment { attachment } => {
            validate_attachment(&attachment)?;

            new_state.attachments.push(attachment.clone());
            new_state.case.counts.attachments =
                new_state.case.counts.attachments.saturating_add(1);

            let details: String = format!(
                "Registered attachment '{}' ({} bytes)",
                attachment.file_name, attachment.size_bytes
            );
            (CaseChange::AttachmentRegistered(attachment), details)
        }
        Command::ChangeStatus { status } => {
            let from: CaseStatus = case_file.case.status;
            if !from.can_transition_to(status) {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition { from, to: status },
                ));
            }

            new_state.case.status = status;

            let details: String = format!("Changed status from {} to {}", from.label(), status.label());
            (CaseChange::StatusChanged { from, to: status }, details)
        }
        Command::SetTitle { title } => {
            let title: String = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::DomainViolation(DomainError::InvalidCaseTitle(
                    String::from("Title cannot be empty"),
                )));
            }

            new_state.case.title.clone_from(&title);
            new_state.case.auto_title = false;

            let details: String = format!("Set title to '{title}'");
            (CaseChange::TitleChanged(title), details)
        }
        Command::SetDueDate { due_date } => {
            new_state.case.due_date = due_date;

            let details: String = due_date.map_or_else(
                || String::from("Cleared due date"),
                |date| format!("Set due date to {}", casebook_domain::format_iso_date(date)),
            );
            (CaseChange::DueDateChanged(due_date), details)
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(action_name.to_string(), Some(details)),
        case_file.to_snapshot(),
        new_state.to_snapshot(),
        AuditScope::Case {
            case_number: case_file.case.case_number.clone(),
        },
    );

    Ok(TransitionResult {
        new_state,
        change,
        audit_event,
    })
}
