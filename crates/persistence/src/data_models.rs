// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Insertable row shapes for the wider tables.

use diesel::prelude::*;

use crate::diesel_schema::{
    audit_events, cases, organizations, report_instances, report_templates, template_sections,
};

#[derive(Insertable)]
#[diesel(table_name = organizations)]
pub struct NewOrganization<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub case_number_prefix: &'a str,
}

/// A case row. Also used as the changeset when a transition rewrites the case.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = cases)]
#[diesel(treat_none_as_null = true)]
pub struct CaseRowValues<'a> {
    pub organization_id: i64,
    pub case_number: &'a str,
    pub title: &'a str,
    pub auto_title: bool,
    pub status: &'a str,
    pub case_type: &'a str,
    pub account_name: Option<&'a str>,
    pub contact_name: Option<&'a str>,
    pub manager_name: Option<&'a str>,
    pub opened_on: String,
    pub due_date: Option<String>,
    pub subject_count: i64,
    pub update_count: i64,
    pub event_count: i64,
    pub attachment_count: i64,
}

/// Template presentation columns. Sections are written separately.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = report_templates)]
#[diesel(treat_none_as_null = true)]
pub struct TemplateRowValues<'a> {
    pub organization_id: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub cover_title: Option<&'a str>,
    pub header_text: Option<&'a str>,
    pub footer_text: Option<&'a str>,
    pub show_cover_page: bool,
    pub show_header_footer: bool,
}

#[derive(Insertable)]
#[diesel(table_name = template_sections)]
pub struct NewTemplateSection<'a> {
    pub template_id: i64,
    pub section_uuid: String,
    pub title: &'a str,
    pub display_order: i32,
    pub is_visible: bool,
    pub section_type: &'a str,
    pub body_json: String,
}

#[derive(Insertable)]
#[diesel(table_name = report_instances)]
pub struct NewReportInstance<'a> {
    pub case_id: i64,
    pub template_id: i64,
    pub title: &'a str,
    pub html: &'a str,
    pub content_hash: &'a str,
    pub customization_json: String,
    pub layout_json: String,
    pub pages_json: String,
    pub generated_by: &'a str,
    pub generated_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent<'a> {
    pub case_number: Option<&'a str>,
    pub scope_json: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}
