// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};

fn create_test_event(scope: AuditScope) -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("user-123"), String::from("user")),
        Cause::new(String::from("req-456"), String::from("User request")),
        Action::new(String::from("OpenCase"), None),
        StateSnapshot::empty(),
        StateSnapshot::new(String::from("case_number=CASE-00001")),
        scope,
    )
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("user-123"), String::from("user"));

    assert_eq!(actor.id, "user-123");
    assert_eq!(actor.actor_type, "user");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("RecordUpdate"),
        Some(String::from("Surveillance day 1")),
    );

    assert_eq!(action.name, "RecordUpdate");
    assert_eq!(action.details, Some(String::from("Surveillance day 1")));
}

#[test]
fn test_new_event_is_unpersisted() {
    let event: AuditEvent = create_test_event(AuditScope::Case {
        case_number: String::from("CASE-00001"),
    });

    assert_eq!(event.event_id, None);
    assert_eq!(event.before.data, "");
    assert_eq!(event.after.data, "case_number=CASE-00001");
}

#[test]
fn test_with_event_id_keeps_other_fields() {
    let event: AuditEvent = create_test_event(AuditScope::Global);
    let persisted: AuditEvent = event.clone().with_event_id(7);

    assert_eq!(persisted.event_id, Some(7));
    assert_eq!(persisted.actor, event.actor);
    assert_eq!(persisted.scope, event.scope);
}

#[test]
fn test_scope_case_number() {
    let report: AuditScope = AuditScope::Report {
        case_number: String::from("CASE-00002"),
        content_hash: String::from("abc"),
    };
    let template: AuditScope = AuditScope::Template {
        template_name: String::from("Standard"),
    };

    assert_eq!(report.case_number(), Some("CASE-00002"));
    assert_eq!(template.case_number(), None);
    assert_eq!(AuditScope::Global.case_number(), None);
}

#[test]
fn test_scope_json_is_tagged() {
    let scope: AuditScope = AuditScope::Template {
        template_name: String::from("Standard"),
    };

    let json: String = serde_json::to_string(&scope).unwrap();
    assert_eq!(json, r#"{"scope":"template","template_name":"Standard"}"#);

    let parsed: AuditScope = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, scope);
}

#[test]
fn test_audit_event_equality() {
    let scope: AuditScope = AuditScope::Case {
        case_number: String::from("CASE-00001"),
    };
    let event1: AuditEvent = create_test_event(scope.clone());
    let event2: AuditEvent = create_test_event(scope);

    assert_eq!(event1, event2);
    assert_ne!(event1, event2.with_event_id(1));
}
