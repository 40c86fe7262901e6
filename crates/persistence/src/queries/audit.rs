// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    scope_json: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let scope: AuditScope = serde_json::from_str(&self.scope_json)?;
        let actor: Actor = serde_json::from_str(&self.actor_json)?;
        let cause: Cause = serde_json::from_str(&self.cause_json)?;
        let action: Action = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshot = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshot = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent::new(actor, cause, action, before, after, scope).with_event_id(self.event_id))
    }
}

/// Retrieves a single audit event.
///
/// # Errors
///
/// Returns `EventNotFound` if no event has this id.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::EventNotFound(event_id))?
        .into_event()
}

/// Lists audit events in the order they were written, optionally limited
/// to one case's history.
///
/// # Errors
///
/// Returns an error if the query or decoding fails.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    case_number: Option<&str>,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.asc())
        .into_boxed();
    if let Some(case_number) = case_number {
        query = query.filter(audit_events::case_number.eq(case_number));
    }

    query
        .load(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}
