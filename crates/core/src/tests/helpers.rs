// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseFile, OpenCaseRequest, ReportData, open_case};
use casebook_audit::{Actor, Cause};
use casebook_domain::{
    CaseActivity, CaseUpdate, CollectionConfig, Organization, PlaceholderToken, ReportTemplate,
    SectionBody, SortOrder, TemplateSection, VariableBlockConfig, VariableLayout,
};
use time::macros::{date, datetime};
use time::{Date, Duration, OffsetDateTime};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("manager-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Manager request"))
}

pub fn create_test_organization() -> Organization {
    let mut organization: Organization = Organization::new("Acme Investigations", "CASE");
    organization.organization_id = Some(1);
    organization.phone = Some(String::from("555-0100"));
    organization
}

pub const fn report_date() -> Date {
    date!(2026 - 04 - 01)
}

pub fn create_test_case_file() -> CaseFile {
    let request: OpenCaseRequest = OpenCaseRequest {
        title: None,
        case_type: String::from("Surveillance"),
        account_name: Some(String::from("Globex Insurance")),
        contact_name: None,
        manager_name: Some(String::from("Sam Rivera")),
        due_date: None,
    };
    open_case(
        &create_test_organization(),
        request,
        String::from("CASE-00001"),
        date!(2026 - 03 - 05),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
    .case_file
}

pub fn update(update_type: &str, title: &str, at: OffsetDateTime) -> CaseUpdate {
    CaseUpdate {
        update_id: None,
        update_type: update_type.to_string(),
        title: title.to_string(),
        body: format!("{title} body"),
        author_name: Some(String::from("Sam Rivera")),
        created_at: at,
    }
}

pub fn activity(activity_type: &str, title: &str, at: OffsetDateTime) -> CaseActivity {
    CaseActivity {
        activity_id: None,
        activity_type: activity_type.to_string(),
        title: title.to_string(),
        description: None,
        location: Some(String::from("Main St")),
        occurred_at: at,
    }
}

/// Three surveillance updates and one interview, out of time order.
pub fn create_test_updates() -> Vec<CaseUpdate> {
    let base: OffsetDateTime = datetime!(2026-03-06 09:00 UTC);
    vec![
        update("Surveillance", "Day 2", base + Duration::days(1)),
        update("Surveillance", "Day 1", base),
        update("Interview", "Neighbor", base + Duration::hours(3)),
        update("Surveillance", "Day 3", base + Duration::days(2)),
    ]
}

pub fn collection(types: &[&str], sort_order: SortOrder) -> CollectionConfig {
    CollectionConfig {
        type_filter: types.iter().map(|t| (*t).to_string()).collect(),
        sort_order,
        limit: None,
        allow_duplicates: false,
        show_timestamps: true,
    }
}

pub fn create_test_template() -> ReportTemplate {
    let mut template: ReportTemplate = ReportTemplate::new(1, "Standard Report");
    template.template_id = Some(3);
    template.sections = vec![
        TemplateSection::new(
            "Introduction",
            0,
            SectionBody::StaticText {
                content: String::from("This report covers {{case_number}} for {{client_list}}."),
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
            "Surveillance",
            2,
            SectionBody::UpdateCollection(collection(&["Surveillance"], SortOrder::Ascending)),
        ),
        TemplateSection::new(
            "All Updates",
            3,
            SectionBody::UpdateCollection(collection(&[], SortOrder::Ascending)),
        ),
    ];
    template
}

pub fn report_data<'a>(
    organization: &'a Organization,
    case_file: &'a CaseFile,
    title: &'a str,
) -> ReportData<'a> {
    ReportData {
        organization,
        case: &case_file.case,
        subjects: &case_file.subjects,
        updates: &case_file.updates,
        activities: &case_file.activities,
        report_date: report_date(),
        report_title: title,
    }
}
