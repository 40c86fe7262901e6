// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use casebook::TemplateCommand;
use casebook_domain::{ReportTemplate, SectionBody, TemplateCustomization};

// ============================================================================
// Organizations
// ============================================================================

/// API request to create an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganizationRequest {
    /// Display name.
    pub name: String,
    /// Case number prefix (1-10 alphanumeric characters).
    pub case_number_prefix: String,
    /// Postal address.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Public website.
    pub website: Option<String>,
    /// Cover page logo URL.
    pub logo_url: Option<String>,
}

/// API response for a successful organization creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOrganizationResponse {
    /// The canonical organization identifier.
    pub organization_id: i64,
    /// The stored name.
    pub name: String,
    /// The normalized case number prefix.
    pub case_number_prefix: String,
    /// The audit event recording the creation.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Cases
// ============================================================================

/// A subject as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectInput {
    /// Display name.
    pub name: String,
    /// Subject kind (Person, Business, Vehicle, Location, Other).
    pub kind: String,
    /// Subject role (Subject, Client).
    pub role: String,
    /// Whether the subject becomes the case's primary subject.
    pub is_primary: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// API request to open a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCaseRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// Explicit title. When absent the case is titled from its primary subject.
    pub title: Option<String>,
    /// Free-form case type.
    pub case_type: String,
    /// Linked account.
    pub account_name: Option<String>,
    /// Linked contact.
    pub contact_name: Option<String>,
    /// Case manager.
    pub manager_name: Option<String>,
    /// Due date (ISO 8601).
    pub due_date: Option<String>,
    /// Primary subject added right after the case is opened.
    pub primary_subject: Option<SubjectInput>,
}

/// API response for a successful case creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateCaseResponse {
    /// The canonical case identifier.
    pub case_id: i64,
    /// The issued case number.
    pub case_number: String,
    /// The case title after the optional primary subject was applied.
    pub title: String,
    /// The audit event recording the opening.
    pub event_id: i64,
    /// Whether the number came from the fallback scan instead of the counter.
    pub used_fallback_number: bool,
    /// Follow-up steps that failed after the case itself was created.
    pub warnings: Vec<String>,
}

/// API request to attach a subject to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSubjectRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The target case.
    pub case_number: String,
    /// The subject to attach.
    pub subject: SubjectInput,
}

/// API request to record a narrative update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdateRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The target case.
    pub case_number: String,
    /// Update type (e.g. "Surveillance").
    pub update_type: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Author display name.
    pub author_name: Option<String>,
    /// When the update was written (RFC 3339). Defaults to the request time.
    pub created_at: Option<String>,
}

/// API request to record a dated activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordActivityRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The target case.
    pub case_number: String,
    /// Activity type (e.g. "Interview").
    pub activity_type: String,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// When the activity took place (RFC 3339).
    pub occurred_at: String,
}

/// API request to register attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAttachmentRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The target case.
    pub case_number: String,
    /// Original file name.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Object storage key.
    pub storage_path: String,
}

/// API request to change a case's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCaseStatusRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The target case.
    pub case_number: String,
    /// The requested status (Open, Active, OnHold, Closed).
    pub status: String,
}

/// API response for a successful case transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaseChangeResponse {
    /// The affected case.
    pub case_number: String,
    /// The audit event recording the change.
    pub event_id: i64,
    /// The row the change created, when it created one.
    pub record_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// Case summary fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaseInfo {
    pub case_id: Option<i64>,
    pub case_number: String,
    pub title: String,
    pub status: String,
    pub case_type: String,
    pub account_name: Option<String>,
    pub contact_name: Option<String>,
    pub manager_name: Option<String>,
    /// ISO 8601.
    pub opened_on: String,
    /// ISO 8601.
    pub due_date: Option<String>,
    pub subject_count: u32,
    pub update_count: u32,
    pub event_count: u32,
    pub attachment_count: u32,
}

/// Subject information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubjectInfo {
    pub subject_id: Option<i64>,
    pub name: String,
    pub kind: String,
    pub role: String,
    pub is_primary: bool,
    pub notes: Option<String>,
}

/// Update information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateInfo {
    pub update_id: Option<i64>,
    pub update_type: String,
    pub title: String,
    pub body: String,
    pub author_name: Option<String>,
    /// RFC 3339.
    pub created_at: String,
}

/// Activity information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityInfo {
    pub activity_id: Option<i64>,
    pub activity_type: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// RFC 3339.
    pub occurred_at: String,
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachmentInfo {
    pub attachment_id: Option<i64>,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub storage_path: String,
}

/// API response with a case and all of its records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetCaseResponse {
    pub case: CaseInfo,
    pub subjects: Vec<SubjectInfo>,
    pub updates: Vec<UpdateInfo>,
    pub activities: Vec<ActivityInfo>,
    pub attachments: Vec<AttachmentInfo>,
}

/// API response listing an organization's cases, newest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListCasesResponse {
    pub organization_id: i64,
    pub cases: Vec<CaseInfo>,
}

// ============================================================================
// Templates
// ============================================================================

/// A section supplied when creating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInput {
    /// Section heading.
    pub title: String,
    /// Default visibility.
    pub is_visible: bool,
    /// Type-specific content.
    pub body: SectionBody,
}

/// API request to create a report template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTemplateRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// Template name, unique within the organization.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Cover page heading.
    pub cover_title: Option<String>,
    /// Running header text.
    pub header_text: Option<String>,
    /// Running footer text.
    pub footer_text: Option<String>,
    /// Whether a cover page is generated by default.
    pub show_cover_page: bool,
    /// Whether header/footer lines are printed by default.
    pub show_header_footer: bool,
    /// Sections in display order.
    pub sections: Vec<SectionInput>,
}

/// API request to apply an authoring command to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyTemplateRequest {
    /// The target template.
    pub template_id: i64,
    /// The command to apply.
    pub command: TemplateCommand,
}

/// API response carrying a template and, for writes, the audit event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemplateResponse {
    /// The canonical template identifier.
    pub template_id: i64,
    /// The audit event recording the write, if this was one.
    pub event_id: Option<i64>,
    /// Number of sections whose stored rank changed.
    pub reordered_sections: usize,
    /// The template with its sections in display order.
    pub template: ReportTemplate,
}

/// Template summary fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemplateSummary {
    pub template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub section_count: usize,
}

/// API response listing an organization's templates by name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTemplatesResponse {
    pub organization_id: i64,
    pub templates: Vec<TemplateSummary>,
}

// ============================================================================
// Reports
// ============================================================================

/// API request to preview or generate a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The case the report is about.
    pub case_number: String,
    /// The stored template.
    pub template_id: i64,
    /// Per-report overrides on top of the template.
    pub customization: TemplateCustomization,
    /// Report title. Defaults to the template name.
    pub report_title: Option<String>,
    /// Report date (ISO 8601). Defaults to the request date.
    pub report_date: Option<String>,
}

/// API response for a report preview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreviewReportResponse {
    pub title: String,
    pub page_count: usize,
    /// Paginated HTML, one `<section class="page">` per page.
    pub html: String,
}

/// API response for a generated report instance.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateReportResponse {
    pub instance_id: i64,
    pub event_id: i64,
    pub title: String,
    pub page_count: usize,
    /// SHA-256 hex digest of the stored HTML.
    pub content_hash: String,
}

/// API request to export a stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReportRequest {
    /// The stored report instance.
    pub instance_id: i64,
    /// Requested format (pdf, doc, docx, word).
    pub format: String,
}

/// An exported file and the records written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReportResponse {
    pub export_id: i64,
    pub event_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Report instance summary fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportSummary {
    pub instance_id: Option<i64>,
    pub case_number: String,
    pub template_id: i64,
    pub title: String,
    pub page_count: usize,
    pub content_hash: String,
    pub generated_by: String,
    /// RFC 3339.
    pub generated_at: String,
}

/// API response listing a case's reports.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListReportsResponse {
    pub case_number: String,
    pub reports: Vec<ReportSummary>,
}

/// A recorded export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportExportInfo {
    pub export_id: Option<i64>,
    pub format: String,
    pub exported_by: String,
    /// RFC 3339.
    pub exported_at: String,
}

/// API response with a stored report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetReportResponse {
    pub report: ReportSummary,
    /// The customization the report was generated with.
    pub customization: TemplateCustomization,
    pub html: String,
    pub exports: Vec<ReportExportInfo>,
}

// ============================================================================
// Email
// ============================================================================

/// API request to fill an email template for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeEmailRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The case the email is about.
    pub case_number: String,
    /// Subject line template.
    pub subject_template: String,
    /// HTML body template.
    pub body_template: String,
    /// Sender signature, inserted before `</body>`.
    pub signature_html: Option<String>,
}

/// API response with a composed email.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComposeEmailResponse {
    pub subject: String,
    pub html_body: String,
    /// `{{...}}` sequences outside the recognized vocabulary, left as written.
    pub unknown_placeholders: Vec<String>,
}

// ============================================================================
// Audit
// ============================================================================

/// API response with one audit event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventResponse {
    pub event_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    /// The case the event belongs to, if any.
    pub case_number: Option<String>,
}

/// API response with an audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListAuditEventsResponse {
    /// The case the timeline was filtered to, if any.
    pub case_number: Option<String>,
    pub events: Vec<AuditEventResponse>,
}
