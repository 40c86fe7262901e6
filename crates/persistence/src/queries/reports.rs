// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook::report::{Page, PageLayout};
use casebook::{ExportFormat, ReportExport, ReportInstance};
use casebook_domain::TemplateCustomization;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::conversions::{parse_column, parse_timestamp};
use crate::diesel_schema::{cases, report_exports, report_instances};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = report_instances)]
struct ReportInstanceRow {
    instance_id: i64,
    template_id: i64,
    title: String,
    html: String,
    content_hash: String,
    customization_json: String,
    layout_json: String,
    pages_json: String,
    generated_by: String,
    generated_at: String,
}

impl ReportInstanceRow {
    fn into_instance(self, case_number: String) -> Result<ReportInstance, PersistenceError> {
        let customization: TemplateCustomization = serde_json::from_str(&self.customization_json)?;
        let layout: PageLayout = serde_json::from_str(&self.layout_json)?;
        let pages: Vec<Page> = serde_json::from_str(&self.pages_json)?;

        Ok(ReportInstance {
            instance_id: Some(self.instance_id),
            case_number,
            template_id: self.template_id,
            title: self.title,
            html: self.html,
            content_hash: self.content_hash,
            customization,
            layout,
            pages,
            generated_by: self.generated_by,
            generated_at: parse_timestamp(&self.generated_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = report_exports)]
struct ReportExportRow {
    export_id: i64,
    instance_id: i64,
    format: String,
    exported_by: String,
    exported_at: String,
}

/// Loads a generated report instance.
///
/// The instance is returned exactly as stored; callers check
/// `verify_integrity` before serving it.
///
/// # Errors
///
/// Returns `ReportNotFound` if no instance has this id.
pub fn get_report_instance(
    conn: &mut SqliteConnection,
    instance_id: i64,
) -> Result<ReportInstance, PersistenceError> {
    let (row, case_number): (ReportInstanceRow, String) = report_instances::table
        .inner_join(cases::table)
        .filter(report_instances::instance_id.eq(instance_id))
        .select((ReportInstanceRow::as_select(), cases::case_number))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ReportNotFound(instance_id))?;

    row.into_instance(case_number)
}

/// Lists the instances generated for a case, oldest first.
///
/// # Errors
///
/// Returns an error if the query or decoding fails.
pub fn list_report_instances(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<ReportInstance>, PersistenceError> {
    report_instances::table
        .inner_join(cases::table)
        .filter(report_instances::case_id.eq(case_id))
        .order(report_instances::instance_id.asc())
        .select((ReportInstanceRow::as_select(), cases::case_number))
        .load::<(ReportInstanceRow, String)>(conn)?
        .into_iter()
        .map(|(row, case_number)| row.into_instance(case_number))
        .collect()
}

/// Lists the recorded exports of an instance, oldest first.
///
/// # Errors
///
/// Returns an error if the query or decoding fails.
pub fn list_report_exports(
    conn: &mut SqliteConnection,
    instance_id: i64,
) -> Result<Vec<ReportExport>, PersistenceError> {
    report_exports::table
        .filter(report_exports::instance_id.eq(instance_id))
        .order(report_exports::export_id.asc())
        .select(ReportExportRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| {
            let format: ExportFormat = parse_column(&row.format)?;
            Ok(ReportExport {
                export_id: Some(row.export_id),
                instance_id: row.instance_id,
                format,
                exported_by: row.exported_by,
                exported_at: parse_timestamp(&row.exported_at)?,
            })
        })
        .collect()
}
