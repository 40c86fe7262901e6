// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    create_test_actor, create_test_cause, open_stored_case, setup_with_organization,
};
use crate::{Persistence, PersistenceError};
use casebook_audit::{Action, AuditEvent, AuditScope, StateSnapshot};

#[test]
fn test_audit_event_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let event: AuditEvent = AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(
            String::from("GenerateReport"),
            Some(String::from("Generated 'Status Report'")),
        ),
        StateSnapshot::empty(),
        StateSnapshot::new(String::from("content_hash=abc,pages=2")),
        AuditScope::Report {
            case_number: String::from("CASE-00001"),
            content_hash: String::from("abc"),
        },
    );

    let event_id: i64 = persistence.persist_audit_event(&event).unwrap();
    let loaded: AuditEvent = persistence.get_audit_event(event_id).unwrap();

    assert_eq!(loaded, event.with_event_id(event_id));
}

#[test]
fn test_audit_events_filter_by_case() {
    let (mut persistence, organization) = setup_with_organization();
    open_stored_case(&mut persistence, &organization);
    open_stored_case(&mut persistence, &organization);
    persistence
        .persist_audit_event(&AuditEvent::new(
            create_test_actor(),
            create_test_cause(),
            Action::new(String::from("Maintenance"), None),
            StateSnapshot::empty(),
            StateSnapshot::empty(),
            AuditScope::Global,
        ))
        .unwrap();

    let all: Vec<AuditEvent> = persistence.list_audit_events(None).unwrap();
    let second: Vec<AuditEvent> = persistence.list_audit_events(Some("CASE-00002")).unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(second.len(), 1);
    assert_eq!(
        second[0].scope,
        AuditScope::Case {
            case_number: String::from("CASE-00002")
        }
    );
}

#[test]
fn test_missing_event_is_reported_by_id() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert_eq!(
        persistence.get_audit_event(12),
        Err(PersistenceError::EventNotFound(12))
    );
}
