// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case reconstruction.
//!
//! Records are returned in insertion order, which is the order the
//! rendering pipeline uses to break timestamp ties.

use casebook::CaseFile;
use casebook_domain::{
    Attachment, Case, CaseActivity, CaseCounts, CaseStatus, CaseUpdate, Subject, SubjectKind,
    SubjectRole,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;

use crate::conversions::{parse_column, parse_date, parse_timestamp, to_count};
use crate::diesel_schema::{case_activities, case_attachments, case_subjects, case_updates, cases};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = cases)]
struct CaseRow {
    case_id: i64,
    organization_id: i64,
    case_number: String,
    title: String,
    auto_title: bool,
    status: String,
    case_type: String,
    account_name: Option<String>,
    contact_name: Option<String>,
    manager_name: Option<String>,
    opened_on: String,
    due_date: Option<String>,
    subject_count: i64,
    update_count: i64,
    event_count: i64,
    attachment_count: i64,
}

impl CaseRow {
    fn into_case(self) -> Result<Case, PersistenceError> {
        let status: CaseStatus = parse_column(&self.status)?;
        Ok(Case {
            case_id: Some(self.case_id),
            organization_id: self.organization_id,
            case_number: self.case_number,
            title: self.title,
            auto_title: self.auto_title,
            status,
            case_type: self.case_type,
            account_name: self.account_name,
            contact_name: self.contact_name,
            manager_name: self.manager_name,
            opened_on: parse_date(&self.opened_on)?,
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
            counts: CaseCounts {
                subjects: to_count(self.subject_count, "subject_count")?,
                updates: to_count(self.update_count, "update_count")?,
                events: to_count(self.event_count, "event_count")?,
                attachments: to_count(self.attachment_count, "attachment_count")?,
            },
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = case_subjects)]
struct SubjectRow {
    subject_id: i64,
    name: String,
    kind: String,
    role: String,
    is_primary: bool,
    notes: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = case_updates)]
struct UpdateRow {
    update_id: i64,
    update_type: String,
    title: String,
    body: String,
    author_name: Option<String>,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = case_activities)]
struct ActivityRow {
    activity_id: i64,
    activity_type: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    occurred_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = case_attachments)]
struct AttachmentRow {
    attachment_id: i64,
    file_name: String,
    content_type: String,
    size_bytes: i64,
    storage_path: String,
}

/// Looks up the row id of a case by its organization-scoped number.
///
/// # Errors
///
/// Returns `CaseNotFound` if the organization has no such case.
pub fn lookup_case_id(
    conn: &mut SqliteConnection,
    organization_id: i64,
    case_number: &str,
) -> Result<i64, PersistenceError> {
    cases::table
        .filter(cases::organization_id.eq(organization_id))
        .filter(cases::case_number.eq(case_number))
        .select(cases::case_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::CaseNotFound {
            organization_id,
            case_number: case_number.to_string(),
        })
}

/// Loads a case with all of its subjects, updates, activities and
/// attachment metadata.
///
/// # Errors
///
/// Returns `CaseNotFound` if the case does not exist, or an error if a row
/// cannot be decoded.
pub fn get_case_file(
    conn: &mut SqliteConnection,
    organization_id: i64,
    case_number: &str,
) -> Result<CaseFile, PersistenceError> {
    let case_id: i64 = lookup_case_id(conn, organization_id, case_number)?;

    let case: Case = cases::table
        .filter(cases::case_id.eq(case_id))
        .select(CaseRow::as_select())
        .first(conn)?
        .into_case()?;

    let subjects: Vec<Subject> = case_subjects::table
        .filter(case_subjects::case_id.eq(case_id))
        .order(case_subjects::subject_id.asc())
        .select(SubjectRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            let kind: SubjectKind = parse_column(&row.kind)?;
            let role: SubjectRole = parse_column(&row.role)?;
            Ok(Subject {
                subject_id: Some(row.subject_id),
                name: row.name,
                kind,
                role,
                is_primary: row.is_primary,
                notes: row.notes,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    let updates: Vec<CaseUpdate> = case_updates::table
        .filter(case_updates::case_id.eq(case_id))
        .order(case_updates::update_id.asc())
        .select(UpdateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            Ok(CaseUpdate {
                update_id: Some(row.update_id),
                update_type: row.update_type,
                title: row.title,
                body: row.body,
                author_name: row.author_name,
                created_at: parse_timestamp(&row.created_at)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    let activities: Vec<CaseActivity> = case_activities::table
        .filter(case_activities::case_id.eq(case_id))
        .order(case_activities::activity_id.asc())
        .select(ActivityRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            Ok(CaseActivity {
                activity_id: Some(row.activity_id),
                activity_type: row.activity_type,
                title: row.title,
                description: row.description,
                location: row.location,
                occurred_at: parse_timestamp(&row.occurred_at)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    let attachments: Vec<Attachment> = case_attachments::table
        .filter(case_attachments::case_id.eq(case_id))
        .order(case_attachments::attachment_id.asc())
        .select(AttachmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            let size_bytes: u64 = row.size_bytes.to_u64().ok_or_else(|| {
                PersistenceError::ReconstructionError(format!(
                    "size_bytes out of range: {}",
                    row.size_bytes
                ))
            })?;
            Ok(Attachment {
                attachment_id: Some(row.attachment_id),
                file_name: row.file_name,
                content_type: row.content_type,
                size_bytes,
                storage_path: row.storage_path,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    Ok(CaseFile {
        case,
        subjects,
        updates,
        activities,
        attachments,
    })
}

/// Lists an organization's cases, newest first.
///
/// # Errors
///
/// Returns an error if the query or decoding fails.
pub fn list_cases(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<Case>, PersistenceError> {
    cases::table
        .filter(cases::organization_id.eq(organization_id))
        .order(cases::case_id.desc())
        .select(CaseRow::as_select())
        .load(conn)?
        .into_iter()
        .map(CaseRow::into_case)
        .collect()
}

/// Lists every case number an organization has issued.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_case_numbers(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    Ok(cases::table
        .filter(cases::organization_id.eq(organization_id))
        .select(cases::case_number)
        .load::<String>(conn)?)
}
