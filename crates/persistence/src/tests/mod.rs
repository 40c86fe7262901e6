// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod report_tests;

use crate::Persistence;
use casebook::{CaseFile, OpenCaseRequest, TemplateCreated, create_template, open_case};
use casebook_audit::{Actor, Cause};
use casebook_domain::{
    CollectionConfig, Organization, PlaceholderToken, ReportTemplate, SectionBody,
    TemplateSection, VariableBlockConfig, VariableLayout,
};
use time::macros::date;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("manager-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-123"), String::from("Test request"))
}

/// A fresh database holding one organization with prefix `CASE`.
pub fn setup_with_organization() -> (Persistence, Organization) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let mut organization: Organization = Organization::new("Acme Investigations", "CASE");
    organization.email = Some(String::from("office@acme.test"));
    let organization_id: i64 = persistence.create_organization(&organization).unwrap();
    organization.organization_id = Some(organization_id);
    (persistence, organization)
}

/// Opens and stores a case, returning it as loaded back from the database.
pub fn open_stored_case(persistence: &mut Persistence, organization: &Organization) -> CaseFile {
    let organization_id: i64 = organization.organization_id.unwrap();
    let case_number: String = persistence
        .allocate_case_number(organization_id)
        .unwrap()
        .to_string();
    let request: OpenCaseRequest = OpenCaseRequest {
        title: None,
        case_type: String::from("Surveillance"),
        account_name: Some(String::from("Globex Insurance")),
        contact_name: None,
        manager_name: Some(String::from("Sam Rivera")),
        due_date: Some(date!(2026 - 05 - 01)),
    };
    let result = open_case(
        organization,
        request,
        case_number.clone(),
        date!(2026 - 03 - 05),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_opened_case(&result).unwrap();
    persistence
        .get_case_file(organization_id, &case_number)
        .unwrap()
}

pub fn create_test_template(organization_id: i64, name: &str) -> ReportTemplate {
    let mut template: ReportTemplate = ReportTemplate::new(organization_id, name);
    template.footer_text = Some(String::from("Confidential"));
    template.sections = vec![
        TemplateSection::new(
            "Introduction",
            0,
            SectionBody::StaticText {
                content: String::from("Report on {{case_number}}."),
            },
        ),
        TemplateSection::new(
            "Case Details",
            1,
            SectionBody::VariableBlock(VariableBlockConfig {
                variables: vec![PlaceholderToken::CaseNumber, PlaceholderToken::CaseManager],
                layout: VariableLayout::Table,
            }),
        ),
        TemplateSection::new(
            "Updates",
            2,
            SectionBody::UpdateCollection(CollectionConfig::default()),
        ),
    ];
    template
}

/// Stores a template and returns it as loaded back from the database.
pub fn store_template(persistence: &mut Persistence, organization_id: i64) -> ReportTemplate {
    let created: TemplateCreated = create_template(
        create_test_template(organization_id, "Standard Report"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let template_id: i64 = persistence
        .persist_new_template(&created)
        .unwrap()
        .record_id
        .unwrap();
    persistence.get_template(template_id).unwrap()
}
