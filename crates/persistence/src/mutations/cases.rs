// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case rows, case records and case-number allocation.

use casebook::CaseChange;
use casebook_domain::{Attachment, Case, CaseActivity, CaseNumber, CaseUpdate, Subject};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::conversions::{format_date, format_timestamp, to_db_int};
use crate::data_models::CaseRowValues;
use crate::diesel_schema;
use crate::error::{PersistenceError, is_unique_violation};

fn case_row_values(case: &Case) -> CaseRowValues<'_> {
    CaseRowValues {
        organization_id: case.organization_id,
        case_number: &case.case_number,
        title: &case.title,
        auto_title: case.auto_title,
        status: case.status.as_str(),
        case_type: &case.case_type,
        account_name: case.account_name.as_deref(),
        contact_name: case.contact_name.as_deref(),
        manager_name: case.manager_name.as_deref(),
        opened_on: format_date(case.opened_on),
        due_date: case.due_date.map(format_date),
        subject_count: i64::from(case.counts.subjects),
        update_count: i64::from(case.counts.updates),
        event_count: i64::from(case.counts.events),
        attachment_count: i64::from(case.counts.attachments),
    }
}

/// Reserves the next case number for an organization.
///
/// Reads and increments the organization's sequence counter. The caller
/// runs this inside an immediate transaction so two writers cannot read
/// the same value. Sequences already taken by cases created through the
/// fallback path are skipped.
///
/// # Errors
///
/// Returns `OrganizationNotFound` for an unknown organization, or an error
/// if the stored prefix is invalid or a query fails.
pub fn allocate_case_number(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<CaseNumber, PersistenceError> {
    use diesel_schema::organizations;

    let (prefix, mut sequence): (String, i64) = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select((
            organizations::case_number_prefix,
            organizations::next_case_sequence,
        ))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::OrganizationNotFound(organization_id))?;

    let case_number: CaseNumber = loop {
        let candidate: CaseNumber = CaseNumber::new(&prefix, sequence.unsigned_abs())
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        sequence += 1;

        let taken: i64 = diesel_schema::cases::table
            .filter(diesel_schema::cases::organization_id.eq(organization_id))
            .filter(diesel_schema::cases::case_number.eq(candidate.to_string()))
            .count()
            .get_result(conn)?;
        if taken == 0 {
            break candidate;
        }
    };

    diesel::update(organizations::table.filter(organizations::organization_id.eq(organization_id)))
        .set(organizations::next_case_sequence.eq(sequence))
        .execute(conn)?;

    info!(
        organization_id,
        case_number = %case_number,
        "Allocated case number"
    );
    Ok(case_number)
}

/// Inserts a newly opened case and returns its id.
///
/// # Errors
///
/// Returns `DuplicateCaseNumber` if the organization already has a case
/// with this number, or an error if the insert fails.
pub fn insert_case(conn: &mut SqliteConnection, case: &Case) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::cases::table)
        .values(&case_row_values(case))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateCaseNumber(case.case_number.clone())
            } else {
                PersistenceError::from(e)
            }
        })?;

    let case_id: i64 = get_last_insert_rowid(conn)?;
    debug!(case_id, case_number = %case.case_number, "Inserted case");
    Ok(case_id)
}

/// Rewrites the mutable case columns (title, status, due date, counts).
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_case_row(
    conn: &mut SqliteConnection,
    case_id: i64,
    case: &Case,
) -> Result<(), PersistenceError> {
    diesel::update(diesel_schema::cases::table.filter(diesel_schema::cases::case_id.eq(case_id)))
        .set(&case_row_values(case))
        .execute(conn)?;
    Ok(())
}

/// Writes the row-level effect of a case transition.
///
/// Returns the id of the inserted record, or `None` for changes that only
/// touch the case row.
///
/// # Errors
///
/// Returns an error if an insert or update fails.
pub fn insert_case_record(
    conn: &mut SqliteConnection,
    case_id: i64,
    change: &CaseChange,
) -> Result<Option<i64>, PersistenceError> {
    let record_id: Option<i64> = match change {
        CaseChange::SubjectAdded(subject) => Some(insert_subject(conn, case_id, subject)?),
        CaseChange::UpdateRecorded(update) => Some(insert_update(conn, case_id, update)?),
        CaseChange::ActivityRecorded(activity) => Some(insert_activity(conn, case_id, activity)?),
        CaseChange::AttachmentRegistered(attachment) => {
            Some(insert_attachment(conn, case_id, attachment)?)
        }
        CaseChange::StatusChanged { .. }
        | CaseChange::TitleChanged(_)
        | CaseChange::DueDateChanged(_) => None,
    };
    Ok(record_id)
}

fn insert_subject(
    conn: &mut SqliteConnection,
    case_id: i64,
    subject: &Subject,
) -> Result<i64, PersistenceError> {
    use diesel_schema::case_subjects;

    if subject.is_primary {
        // The partial unique index allows one primary per case.
        diesel::update(
            case_subjects::table
                .filter(case_subjects::case_id.eq(case_id))
                .filter(case_subjects::is_primary.eq(true)),
        )
        .set(case_subjects::is_primary.eq(false))
        .execute(conn)?;
    }

    diesel::insert_into(case_subjects::table)
        .values((
            case_subjects::case_id.eq(case_id),
            case_subjects::name.eq(&subject.name),
            case_subjects::kind.eq(subject.kind.as_str()),
            case_subjects::role.eq(subject.role.as_str()),
            case_subjects::is_primary.eq(subject.is_primary),
            case_subjects::notes.eq(subject.notes.as_deref()),
        ))
        .execute(conn)?;

    let subject_id: i64 = get_last_insert_rowid(conn)?;
    debug!(case_id, subject_id, primary = subject.is_primary, "Inserted subject");
    Ok(subject_id)
}

fn insert_update(
    conn: &mut SqliteConnection,
    case_id: i64,
    update: &CaseUpdate,
) -> Result<i64, PersistenceError> {
    use diesel_schema::case_updates;

    diesel::insert_into(case_updates::table)
        .values((
            case_updates::case_id.eq(case_id),
            case_updates::update_type.eq(&update.update_type),
            case_updates::title.eq(&update.title),
            case_updates::body.eq(&update.body),
            case_updates::author_name.eq(update.author_name.as_deref()),
            case_updates::created_at.eq(format_timestamp(update.created_at)?),
        ))
        .execute(conn)?;

    let update_id: i64 = get_last_insert_rowid(conn)?;
    debug!(case_id, update_id, "Inserted case update");
    Ok(update_id)
}

fn insert_activity(
    conn: &mut SqliteConnection,
    case_id: i64,
    activity: &CaseActivity,
) -> Result<i64, PersistenceError> {
    use diesel_schema::case_activities;

    diesel::insert_into(case_activities::table)
        .values((
            case_activities::case_id.eq(case_id),
            case_activities::activity_type.eq(&activity.activity_type),
            case_activities::title.eq(&activity.title),
            case_activities::description.eq(activity.description.as_deref()),
            case_activities::location.eq(activity.location.as_deref()),
            case_activities::occurred_at.eq(format_timestamp(activity.occurred_at)?),
        ))
        .execute(conn)?;

    let activity_id: i64 = get_last_insert_rowid(conn)?;
    debug!(case_id, activity_id, "Inserted case activity");
    Ok(activity_id)
}

fn insert_attachment(
    conn: &mut SqliteConnection,
    case_id: i64,
    attachment: &Attachment,
) -> Result<i64, PersistenceError> {
    use diesel_schema::case_attachments;

    diesel::insert_into(case_attachments::table)
        .values((
            case_attachments::case_id.eq(case_id),
            case_attachments::file_name.eq(&attachment.file_name),
            case_attachments::content_type.eq(&attachment.content_type),
            case_attachments::size_bytes.eq(to_db_int(attachment.size_bytes, "size_bytes")?),
            case_attachments::storage_path.eq(&attachment.storage_path),
        ))
        .execute(conn)?;

    let attachment_id: i64 = get_last_insert_rowid(conn)?;
    debug!(case_id, attachment_id, "Inserted attachment");
    Ok(attachment_id)
}
