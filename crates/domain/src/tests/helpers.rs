// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Case, CaseCounts, CaseStatus, CollectionConfig, Organization, PlaceholderToken,
    ReportTemplate, SectionBody, SortOrder, Subject, SubjectKind, SubjectRole, TemplateSection,
    VariableBlockConfig, VariableLayout,
};
use time::macros::date;

pub fn create_test_organization() -> Organization {
    let mut organization: Organization = Organization::new("Acme Investigations", "case");
    organization.organization_id = Some(1);
    organization.phone = Some(String::from("555-0100"));
    organization.email = Some(String::from("office@acme.test"));
    organization
}

pub fn create_test_case() -> Case {
    Case {
        case_id: Some(10),
        organization_id: 1,
        case_number: String::from("CASE-00042"),
        title: String::from("Workers comp claim"),
        auto_title: true,
        status: CaseStatus::Active,
        case_type: String::from("Surveillance"),
        account_name: Some(String::from("Globex Insurance")),
        contact_name: Some(String::from("Pat Doe")),
        manager_name: Some(String::from("Sam Rivera")),
        opened_on: date!(2026 - 03 - 05),
        due_date: None,
        counts: CaseCounts {
            subjects: 2,
            updates: 3,
            events: 1,
            attachments: 0,
        },
    }
}

pub fn create_test_subjects() -> Vec<Subject> {
    vec![
        Subject::new("John Smith", SubjectKind::Person, SubjectRole::Subject, true),
        Subject::new("Globex Insurance", SubjectKind::Business, SubjectRole::Client, false),
    ]
}

pub fn static_section(title: &str, order: u32, content: &str) -> TemplateSection {
    TemplateSection::new(
        title,
        order,
        SectionBody::StaticText {
            content: content.to_string(),
        },
    )
}

pub fn update_section(title: &str, order: u32, types: &[&str]) -> TemplateSection {
    TemplateSection::new(
        title,
        order,
        SectionBody::UpdateCollection(CollectionConfig {
            type_filter: types.iter().map(|t| (*t).to_string()).collect(),
            sort_order: SortOrder::Descending,
            limit: Some(10),
            allow_duplicates: false,
            show_timestamps: true,
        }),
    )
}

pub fn variable_section(title: &str, order: u32) -> TemplateSection {
    TemplateSection::new(
        title,
        order,
        SectionBody::VariableBlock(VariableBlockConfig {
            variables: vec![PlaceholderToken::CaseNumber, PlaceholderToken::PrimarySubject],
            layout: VariableLayout::Table,
        }),
    )
}

/// A four-section template: intro, details, surveillance updates, summary.
pub fn create_test_template() -> ReportTemplate {
    let mut template: ReportTemplate = ReportTemplate::new(1, "Standard Report");
    template.sections = vec![
        static_section("Introduction", 0, "Report for {{case_number}}"),
        variable_section("Case Details", 1),
        update_section("Surveillance", 2, &["Surveillance"]),
        static_section("Summary", 3, "Prepared by {{org_name}}"),
    ];
    template
}
