// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use casebook_audit::{Actor, Cause};
use casebook_domain::{
    CollectionConfig, PlaceholderToken, SectionBody, VariableBlockConfig, VariableLayout,
};
use casebook_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    CreateCaseRequest, CreateCaseResponse, CreateOrganizationRequest, CreateTemplateRequest,
    SectionInput, SubjectInput, TemplateResponse, create_case, create_organization,
    create_template,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("manager-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-05 10:00 UTC)
}

pub fn create_organization_request(prefix: &str) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        name: String::from("Acme Investigations"),
        case_number_prefix: prefix.to_string(),
        address: Some(String::from("1 Main St")),
        phone: None,
        email: Some(String::from("office@acme.test")),
        website: None,
        logo_url: None,
    }
}

/// A fresh database holding one organization with prefix `CASE`.
pub fn setup() -> (Persistence, i64) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: i64 = create_organization(
        &mut persistence,
        &create_organization_request("CASE"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
    .organization_id;
    (persistence, organization_id)
}

pub fn subject_input(name: &str, role: &str) -> SubjectInput {
    SubjectInput {
        name: name.to_string(),
        kind: String::from("Person"),
        role: role.to_string(),
        is_primary: false,
        notes: None,
    }
}

pub fn create_case_request(organization_id: i64) -> CreateCaseRequest {
    CreateCaseRequest {
        organization_id,
        title: None,
        case_type: String::from("Surveillance"),
        account_name: Some(String::from("Globex Insurance")),
        contact_name: Some(String::from("Dana Park")),
        manager_name: Some(String::from("Sam Rivera")),
        due_date: Some(String::from("2026-05-01")),
        primary_subject: Some(subject_input("John Smith", "Subject")),
    }
}

/// Opens a case with `John Smith` as its primary subject.
pub fn create_test_case(persistence: &mut Persistence, organization_id: i64) -> CreateCaseResponse {
    create_case(
        persistence,
        &create_case_request(organization_id),
        create_test_actor(),
        create_test_cause(),
        test_now(),
    )
    .unwrap()
}

pub fn create_template_request(organization_id: i64, name: &str) -> CreateTemplateRequest {
    CreateTemplateRequest {
        organization_id,
        name: name.to_string(),
        description: Some(String::from("Default client report")),
        cover_title: Some(String::from("{{report_title}}")),
        header_text: Some(String::from("{{org_name}}")),
        footer_text: Some(String::from("{{case_number}} Confidential")),
        show_cover_page: true,
        show_header_footer: true,
        sections: vec![
            SectionInput {
                title: String::from("Introduction"),
                is_visible: true,
                body: SectionBody::StaticText {
                    content: String::from("This report concerns {{primary_subject}}."),
                },
            },
            SectionInput {
                title: String::from("Case Details"),
                is_visible: true,
                body: SectionBody::VariableBlock(VariableBlockConfig {
                    variables: vec![
                        PlaceholderToken::CaseNumber,
                        PlaceholderToken::CaseManager,
                    ],
                    layout: VariableLayout::Table,
                }),
            },
            SectionInput {
                title: String::from("Updates"),
                is_visible: true,
                body: SectionBody::UpdateCollection(CollectionConfig::default()),
            },
        ],
    }
}

pub fn create_test_template(
    persistence: &mut Persistence,
    organization_id: i64,
) -> TemplateResponse {
    create_template(
        persistence,
        &create_template_request(organization_id, "Standard Report"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}
