// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use casebook_audit::AuditEvent;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAuditEvent;
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Persists an audit event and returns the id the database assigned.
///
/// The case number is copied out of the scope into its own indexed column
/// so a case's history can be listed without decoding every row.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEvent<'_> = NewAuditEvent {
        case_number: event.scope.case_number(),
        scope_json: serde_json::to_string(&event.scope)?,
        actor_json: serde_json::to_string(&event.actor)?,
        cause_json: serde_json::to_string(&event.cause)?,
        action_json: serde_json::to_string(&event.action)?,
        before_snapshot_json: serde_json::to_string(&event.before)?,
        after_snapshot_json: serde_json::to_string(&event.after)?,
    };

    diesel::insert_into(diesel_schema::audit_events::table)
        .values(&row)
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;

    debug!(
        event_id,
        action = %event.action.name,
        case_number = event.scope.case_number(),
        "Persisted audit event"
    );

    Ok(event_id)
}
