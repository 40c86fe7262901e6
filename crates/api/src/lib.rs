// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Casebook.
//!
//! Handlers take plain request DTOs, run the core transitions and renderer
//! against a [`casebook_persistence::Persistence`], and return response DTOs
//! or an [`ApiError`]. Transport concerns live in the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_report_error,
};
pub use handlers::{
    add_subject, change_case_status, compose_email, create_case, create_organization,
    create_template, export_report, generate_report, get_audit_event, get_case, get_report,
    get_template, list_audit_events, list_cases, list_reports, list_templates, modify_template,
    preview_report, record_activity, record_update, register_attachment,
};
pub use request_response::{
    ActivityInfo, AddSubjectRequest, AttachmentInfo, AuditEventResponse, CaseChangeResponse,
    CaseInfo, ChangeCaseStatusRequest, ComposeEmailRequest, ComposeEmailResponse,
    CreateCaseRequest, CreateCaseResponse, CreateOrganizationRequest, CreateOrganizationResponse,
    CreateTemplateRequest, ExportReportRequest, ExportReportResponse, GenerateReportResponse,
    GetCaseResponse, GetReportResponse, ListAuditEventsResponse, ListCasesResponse,
    ListReportsResponse, ListTemplatesResponse, ModifyTemplateRequest, PreviewReportResponse,
    RecordActivityRequest, RecordUpdateRequest, RegisterAttachmentRequest, ReportExportInfo,
    ReportRequest, ReportSummary, SectionInput, SubjectInfo, SubjectInput, TemplateResponse,
    TemplateSummary, UpdateInfo,
};
