// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report instance and export mutations.
//!
//! Instances are insert-only; a trigger rejects any later UPDATE.

use casebook::{ReportExport, ReportInstance};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::conversions::format_timestamp;
use crate::data_models::NewReportInstance;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Inserts a generated report instance.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_report_instance(
    conn: &mut SqliteConnection,
    case_id: i64,
    instance: &ReportInstance,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::report_instances::table)
        .values(&NewReportInstance {
            case_id,
            template_id: instance.template_id,
            title: &instance.title,
            html: &instance.html,
            content_hash: &instance.content_hash,
            customization_json: serde_json::to_string(&instance.customization)?,
            layout_json: serde_json::to_string(&instance.layout)?,
            pages_json: serde_json::to_string(&instance.pages)?,
            generated_by: &instance.generated_by,
            generated_at: format_timestamp(instance.generated_at)?,
        })
        .execute(conn)?;

    let instance_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        instance_id,
        case_id,
        content_hash = %instance.content_hash,
        pages = instance.page_count(),
        "Inserted report instance"
    );
    Ok(instance_id)
}

/// Records that an instance was exported.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_report_export(
    conn: &mut SqliteConnection,
    export: &ReportExport,
) -> Result<i64, PersistenceError> {
    use diesel_schema::report_exports;

    diesel::insert_into(report_exports::table)
        .values((
            report_exports::instance_id.eq(export.instance_id),
            report_exports::format.eq(export.format.as_str()),
            report_exports::exported_by.eq(&export.exported_by),
            report_exports::exported_at.eq(format_timestamp(export.exported_at)?),
        ))
        .execute(conn)?;

    let export_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        export_id,
        instance_id = export.instance_id,
        format = export.format.as_str(),
        "Recorded report export"
    );
    Ok(export_id)
}
