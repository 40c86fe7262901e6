// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use casebook::{Generation, PreviewGenerations, TemplateCommand};
use casebook_api::{
    AddSubjectRequest, ApiError, AuditEventResponse, CaseChangeResponse, ChangeCaseStatusRequest,
    ComposeEmailRequest, ComposeEmailResponse, CreateCaseRequest, CreateCaseResponse,
    CreateOrganizationRequest, CreateOrganizationResponse, CreateTemplateRequest,
    ExportReportRequest, ExportReportResponse, GenerateReportResponse, GetCaseResponse,
    GetReportResponse, ListAuditEventsResponse, ListCasesResponse, ListReportsResponse,
    ListTemplatesResponse, ModifyTemplateRequest, PreviewReportResponse, RecordActivityRequest,
    RecordUpdateRequest, RegisterAttachmentRequest, ReportRequest, SectionInput, SubjectInput,
    TemplateResponse, add_subject, change_case_status, compose_email, create_case,
    create_organization, create_template, export_report, generate_report, get_audit_event,
    get_case, get_report, get_template, list_audit_events, list_cases, list_reports,
    list_templates, modify_template, preview_report, record_activity, record_update,
    register_attachment,
};
use casebook_audit::{Actor, Cause};
use casebook_domain::{SectionBody, TemplateCustomization};
use casebook_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Casebook Server - HTTP server for case management and report generation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Delay before a report preview is rendered, in milliseconds.
    ///
    /// A newer preview request for the same draft within this window
    /// supersedes the earlier one.
    #[arg(long, default_value_t = 400)]
    preview_debounce_ms: u64,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex to allow safe concurrent
/// access. Preview generations track the newest preview per draft.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for case records, templates and audit events.
    persistence: Arc<Mutex<Persistence>>,
    /// Latest preview generation per draft.
    previews: Arc<Mutex<PreviewGenerations>>,
    /// How long a preview waits before rendering.
    preview_debounce: Duration,
}

/// Who is making a write request, and why.
///
/// Flattened into every write request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RequestEnvelope {
    /// The actor ID performing this action.
    actor_id: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

impl RequestEnvelope {
    fn actor(&self) -> Actor {
        Actor::new(self.actor_id.clone(), String::from("user"))
    }

    fn cause(&self) -> Cause {
        Cause::new(self.cause_id.clone(), self.cause_description.clone())
    }
}

/// API request for creating an organization.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateOrganizationApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    name: String,
    case_number_prefix: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    logo_url: Option<String>,
}

/// A subject as it arrives over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubjectApiInput {
    name: String,
    kind: String,
    role: String,
    #[serde(default)]
    is_primary: bool,
    #[serde(default)]
    notes: Option<String>,
}

impl From<SubjectApiInput> for SubjectInput {
    fn from(input: SubjectApiInput) -> Self {
        Self {
            name: input.name,
            kind: input.kind,
            role: input.role,
            is_primary: input.is_primary,
            notes: input.notes,
        }
    }
}

/// API request for opening a case.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateCaseApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    #[serde(default)]
    title: Option<String>,
    case_type: String,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    contact_name: Option<String>,
    #[serde(default)]
    manager_name: Option<String>,
    /// ISO 8601 calendar date.
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    primary_subject: Option<SubjectApiInput>,
}

/// API request for adding a subject to a case.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddSubjectApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    #[serde(flatten)]
    subject: SubjectApiInput,
}

/// API request for recording a case update.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RecordUpdateApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    update_type: String,
    title: String,
    body: String,
    #[serde(default)]
    author_name: Option<String>,
    /// RFC 3339 timestamp. Defaults to the time of the request.
    #[serde(default)]
    created_at: Option<String>,
}

/// API request for recording a case activity.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RecordActivityApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    activity_type: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    /// RFC 3339 timestamp.
    occurred_at: String,
}

/// API request for registering attachment metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterAttachmentApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    file_name: String,
    content_type: String,
    size_bytes: u64,
    storage_path: String,
}

/// API request for changing a case's status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ChangeStatusApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    status: String,
}

/// A template section as it arrives over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SectionApiInput {
    title: String,
    #[serde(default = "default_true")]
    is_visible: bool,
    body: SectionBody,
}

/// API request for creating a report template.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateTemplateApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    organization_id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cover_title: Option<String>,
    #[serde(default)]
    header_text: Option<String>,
    #[serde(default)]
    footer_text: Option<String>,
    #[serde(default = "default_true")]
    show_cover_page: bool,
    #[serde(default = "default_true")]
    show_header_footer: bool,
    #[serde(default)]
    sections: Vec<SectionApiInput>,
}

/// API request for a drag-and-drop section move.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct MoveSectionApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    section_id: Uuid,
    to_index: usize,
}

/// API request carrying any template command.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TemplateCommandApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    command: TemplateCommand,
}

/// Report selection shared by preview and generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReportApiRequest {
    organization_id: i64,
    case_number: String,
    template_id: i64,
    #[serde(default)]
    customization: TemplateCustomization,
    #[serde(default)]
    report_title: Option<String>,
    /// ISO 8601 calendar date. Defaults to today.
    #[serde(default)]
    report_date: Option<String>,
}

impl ReportApiRequest {
    /// Identifies the draft a preview belongs to.
    fn draft_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.organization_id, self.case_number, self.template_id
        )
    }

    fn into_request(self) -> ReportRequest {
        ReportRequest {
            organization_id: self.organization_id,
            case_number: self.case_number,
            template_id: self.template_id,
            customization: self.customization,
            report_title: self.report_title,
            report_date: self.report_date,
        }
    }
}

/// API request for generating a report instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct GenerateReportApiRequest {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    #[serde(flatten)]
    report: ReportApiRequest,
}

/// API request for previewing a case email.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ComposeEmailApiRequest {
    organization_id: i64,
    subject_template: String,
    body_template: String,
    #[serde(default)]
    signature_html: Option<String>,
}

/// Response to a debounced preview request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreviewApiResponse {
    /// A newer preview for the same draft replaced this one.
    superseded: bool,
    /// The rendered preview, absent when superseded.
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewReportResponse>,
}

/// Query parameters scoped to an organization.
#[derive(Debug, Clone, Deserialize)]
struct OrganizationQuery {
    organization_id: i64,
}

/// Query parameters for listing report instances.
#[derive(Debug, Clone, Deserialize)]
struct ListReportsQuery {
    organization_id: i64,
    case_number: String,
}

/// Query parameters for the audit timeline.
#[derive(Debug, Clone, Deserialize)]
struct TimelineQuery {
    #[serde(default)]
    case_number: Option<String>,
}

/// Query parameters for exporting a report.
#[derive(Debug, Clone, Deserialize)]
struct ExportQuery {
    format: String,
    actor_id: String,
    #[serde(default = "default_export_cause_id")]
    cause_id: String,
    #[serde(default = "default_export_cause_description")]
    cause_description: String,
}

const fn default_true() -> bool {
    true
}

fn default_export_cause_id() -> String {
    String::from("report-export")
}

fn default_export_cause_description() -> String {
    String::from("Report export")
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/organizations` endpoint.
async fn handle_create_organization(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateOrganizationApiRequest>,
) -> Result<Json<CreateOrganizationResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        name = %req.name,
        "Handling create_organization request"
    );

    let request: CreateOrganizationRequest = CreateOrganizationRequest {
        name: req.name,
        case_number_prefix: req.case_number_prefix,
        address: req.address,
        phone: req.phone,
        email: req.email,
        website: req.website,
        logo_url: req.logo_url,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateOrganizationResponse = create_organization(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    info!(
        organization_id = response.organization_id,
        event_id = response.event_id,
        "Successfully created organization"
    );

    Ok(Json(response))
}

/// Handler for POST `/cases` endpoint.
///
/// Opens a case with the next case number for the organization.
async fn handle_create_case(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCaseApiRequest>,
) -> Result<Json<CreateCaseResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        organization_id = req.organization_id,
        "Handling create_case request"
    );

    let request: CreateCaseRequest = CreateCaseRequest {
        organization_id: req.organization_id,
        title: req.title,
        case_type: req.case_type,
        account_name: req.account_name,
        contact_name: req.contact_name,
        manager_name: req.manager_name,
        due_date: req.due_date,
        primary_subject: req.primary_subject.map(SubjectInput::from),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateCaseResponse = create_case(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    for warning in &response.warnings {
        warn!(case_number = %response.case_number, warning = %warning, "Case created with warning");
    }
    info!(
        case_number = %response.case_number,
        event_id = response.event_id,
        "Successfully created case"
    );

    Ok(Json(response))
}

/// Handler for GET `/cases` endpoint.
async fn handle_list_cases(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<ListCasesResponse>, HttpError> {
    info!(
        organization_id = query.organization_id,
        "Handling list_cases request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListCasesResponse = list_cases(&mut persistence, query.organization_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/cases/{case_number}` endpoint.
async fn handle_get_case(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<GetCaseResponse>, HttpError> {
    info!(case_number = %case_number, "Handling get_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: GetCaseResponse = get_case(&mut persistence, query.organization_id, &case_number)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_number}/subjects` endpoint.
async fn handle_add_subject(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<AddSubjectApiRequest>,
) -> Result<Json<CaseChangeResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %case_number,
        "Handling add_subject request"
    );

    let request: AddSubjectRequest = AddSubjectRequest {
        organization_id: req.organization_id,
        case_number,
        subject: SubjectInput::from(req.subject),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseChangeResponse = add_subject(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_number}/updates` endpoint.
async fn handle_record_update(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<RecordUpdateApiRequest>,
) -> Result<Json<CaseChangeResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %case_number,
        update_type = %req.update_type,
        "Handling record_update request"
    );

    let request: RecordUpdateRequest = RecordUpdateRequest {
        organization_id: req.organization_id,
        case_number,
        update_type: req.update_type,
        title: req.title,
        body: req.body,
        author_name: req.author_name,
        created_at: req.created_at,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseChangeResponse = record_update(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_number}/activities` endpoint.
async fn handle_record_activity(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<RecordActivityApiRequest>,
) -> Result<Json<CaseChangeResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %case_number,
        activity_type = %req.activity_type,
        "Handling record_activity request"
    );

    let request: RecordActivityRequest = RecordActivityRequest {
        organization_id: req.organization_id,
        case_number,
        activity_type: req.activity_type,
        title: req.title,
        description: req.description,
        location: req.location,
        occurred_at: req.occurred_at,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseChangeResponse = record_activity(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_number}/attachments` endpoint.
///
/// Only metadata is recorded; file bytes live in external storage.
async fn handle_register_attachment(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<RegisterAttachmentApiRequest>,
) -> Result<Json<CaseChangeResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %case_number,
        file_name = %req.file_name,
        "Handling register_attachment request"
    );

    let request: RegisterAttachmentRequest = RegisterAttachmentRequest {
        organization_id: req.organization_id,
        case_number,
        file_name: req.file_name,
        content_type: req.content_type,
        size_bytes: req.size_bytes,
        storage_path: req.storage_path,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseChangeResponse = register_attachment(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_number}/status` endpoint.
async fn handle_change_status(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<ChangeStatusApiRequest>,
) -> Result<Json<CaseChangeResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %case_number,
        status = %req.status,
        "Handling change_status request"
    );

    let request: ChangeCaseStatusRequest = ChangeCaseStatusRequest {
        organization_id: req.organization_id,
        case_number,
        status: req.status,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseChangeResponse = change_case_status(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/templates` endpoint.
async fn handle_create_template(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateTemplateApiRequest>,
) -> Result<Json<TemplateResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        organization_id = req.organization_id,
        name = %req.name,
        "Handling create_template request"
    );

    let request: CreateTemplateRequest = CreateTemplateRequest {
        organization_id: req.organization_id,
        name: req.name,
        description: req.description,
        cover_title: req.cover_title,
        header_text: req.header_text,
        footer_text: req.footer_text,
        show_cover_page: req.show_cover_page,
        show_header_footer: req.show_header_footer,
        sections: req
            .sections
            .into_iter()
            .map(|section| SectionInput {
                title: section.title,
                is_visible: section.is_visible,
                body: section.body,
            })
            .collect(),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: TemplateResponse = create_template(
        &mut persistence,
        &request,
        req.envelope.actor(),
        req.envelope.cause(),
    )?;
    drop(persistence);

    info!(
        template_id = response.template_id,
        "Successfully created template"
    );

    Ok(Json(response))
}

/// Handler for GET `/templates` endpoint.
async fn handle_list_templates(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<ListTemplatesResponse>, HttpError> {
    info!(
        organization_id = query.organization_id,
        "Handling list_templates request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTemplatesResponse = list_templates(&mut persistence, query.organization_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/templates/{template_id}` endpoint.
async fn handle_get_template(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
) -> Result<Json<TemplateResponse>, HttpError> {
    info!(template_id = template_id, "Handling get_template request");

    let mut persistence = app_state.persistence.lock().await;
    let response: TemplateResponse = get_template(&mut persistence, template_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Runs a template command and persists the outcome.
async fn run_template_command(
    app_state: &AppState,
    template_id: i64,
    command: TemplateCommand,
    envelope: &RequestEnvelope,
) -> Result<Json<TemplateResponse>, HttpError> {
    let request: ModifyTemplateRequest = ModifyTemplateRequest {
        template_id,
        command,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: TemplateResponse = modify_template(
        &mut persistence,
        &request,
        envelope.actor(),
        envelope.cause(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/templates/{template_id}/sections/move` endpoint.
///
/// Drag-and-drop reorder. Only sections whose rank changed are rewritten.
async fn handle_move_section(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Json(req): Json<MoveSectionApiRequest>,
) -> Result<Json<TemplateResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        template_id = template_id,
        section_id = %req.section_id,
        to_index = req.to_index,
        "Handling move_section request"
    );

    let command: TemplateCommand = TemplateCommand::MoveSection {
        section_id: req.section_id,
        to_index: req.to_index,
    };
    run_template_command(&app_state, template_id, command, &req.envelope).await
}

/// Handler for POST `/templates/{template_id}/commands` endpoint.
async fn handle_template_command(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Json(req): Json<TemplateCommandApiRequest>,
) -> Result<Json<TemplateResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        template_id = template_id,
        "Handling template_command request"
    );

    run_template_command(&app_state, template_id, req.command, &req.envelope).await
}

/// Releases a preview generation when its request is dropped before publishing,
/// e.g. when the client disconnects during the debounce window.
struct PreviewGuard {
    previews: Arc<Mutex<PreviewGenerations>>,
    draft_key: String,
    generation: Generation,
    armed: bool,
}

impl PreviewGuard {
    fn new(
        previews: &Arc<Mutex<PreviewGenerations>>,
        draft_key: &str,
        generation: Generation,
    ) -> Self {
        Self {
            previews: Arc::clone(previews),
            draft_key: draft_key.to_string(),
            generation,
            armed: true,
        }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let previews: Arc<Mutex<PreviewGenerations>> = Arc::clone(&self.previews);
        let draft_key: String = std::mem::take(&mut self.draft_key);
        let generation: Generation = self.generation;
        handle.spawn(async move {
            if previews.lock().await.release(&draft_key, generation) {
                debug!(draft = %draft_key, generation = ?generation, "Abandoned preview released");
            }
        });
    }
}

/// Handler for POST `/reports/preview` endpoint.
///
/// Waits for the debounce window, then renders only if no newer preview
/// for the same draft arrived in the meantime. A stale result is never
/// returned in place of a newer one.
async fn handle_preview_report(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReportApiRequest>,
) -> Result<Json<PreviewApiResponse>, HttpError> {
    let draft_key: String = req.draft_key();
    let generation: Generation = app_state.previews.lock().await.begin(&draft_key);
    let mut guard: PreviewGuard = PreviewGuard::new(&app_state.previews, &draft_key, generation);
    debug!(draft = %draft_key, generation = ?generation, "Preview requested");

    tokio::time::sleep(app_state.preview_debounce).await;

    let superseded = Json(PreviewApiResponse {
        superseded: true,
        preview: None,
    });

    if !app_state
        .previews
        .lock()
        .await
        .is_current(&draft_key, generation)
    {
        guard.disarm();
        debug!(draft = %draft_key, generation = ?generation, "Preview superseded before rendering");
        return Ok(superseded);
    }

    let request: ReportRequest = req.into_request();
    let mut persistence = app_state.persistence.lock().await;
    let result = preview_report(
        &mut persistence,
        &request,
        OffsetDateTime::now_utc().date(),
    );
    drop(persistence);

    let published = app_state
        .previews
        .lock()
        .await
        .publish(&draft_key, generation, result);
    guard.disarm();

    match published {
        Some(result) => Ok(Json(PreviewApiResponse {
            superseded: false,
            preview: Some(result?),
        })),
        None => {
            debug!(draft = %draft_key, generation = ?generation, "Preview superseded while rendering");
            Ok(superseded)
        }
    }
}

/// Handler for POST `/reports` endpoint.
///
/// Renders the report and stores it as an immutable instance.
async fn handle_generate_report(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<GenerateReportApiRequest>,
) -> Result<Json<GenerateReportResponse>, HttpError> {
    info!(
        actor_id = %req.envelope.actor_id,
        case_number = %req.report.case_number,
        template_id = req.report.template_id,
        "Handling generate_report request"
    );

    let actor: Actor = req.envelope.actor();
    let cause: Cause = req.envelope.cause();
    let request: ReportRequest = req.report.into_request();

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateReportResponse = generate_report(
        &mut persistence,
        &request,
        actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        instance_id = response.instance_id,
        page_count = response.page_count,
        "Successfully generated report"
    );

    Ok(Json(response))
}

/// Handler for GET `/reports` endpoint.
async fn handle_list_reports(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ListReportsResponse>, HttpError> {
    info!(
        organization_id = query.organization_id,
        case_number = %query.case_number,
        "Handling list_reports request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListReportsResponse =
        list_reports(&mut persistence, query.organization_id, &query.case_number)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/reports/{instance_id}` endpoint.
async fn handle_get_report(
    AxumState(app_state): AxumState<AppState>,
    Path(instance_id): Path<i64>,
) -> Result<Json<GetReportResponse>, HttpError> {
    info!(instance_id = instance_id, "Handling get_report request");

    let mut persistence = app_state.persistence.lock().await;
    let response: GetReportResponse = get_report(&mut persistence, instance_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/reports/{instance_id}/export` endpoint.
///
/// Returns the exported document as an attachment download.
async fn handle_export_report(
    AxumState(app_state): AxumState<AppState>,
    Path(instance_id): Path<i64>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    info!(
        actor_id = %query.actor_id,
        instance_id = instance_id,
        format = %query.format,
        "Handling export_report request"
    );

    let request: ExportReportRequest = ExportReportRequest {
        instance_id,
        format: query.format,
    };

    let mut persistence = app_state.persistence.lock().await;
    let exported: ExportReportResponse = export_report(
        &mut persistence,
        &request,
        Actor::new(query.actor_id, String::from("user")),
        Cause::new(query.cause_id, query.cause_description),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        export_id = exported.export_id,
        file_name = %exported.file_name,
        "Successfully exported report"
    );

    let disposition: String = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, exported.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response())
}

/// Handler for POST `/cases/{case_number}/email/preview` endpoint.
async fn handle_compose_email(
    AxumState(app_state): AxumState<AppState>,
    Path(case_number): Path<String>,
    Json(req): Json<ComposeEmailApiRequest>,
) -> Result<Json<ComposeEmailResponse>, HttpError> {
    info!(case_number = %case_number, "Handling compose_email request");

    let request: ComposeEmailRequest = ComposeEmailRequest {
        organization_id: req.organization_id,
        case_number,
        subject_template: req.subject_template,
        body_template: req.body_template,
        signature_html: req.signature_html,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ComposeEmailResponse =
        compose_email(&mut persistence, &request, OffsetDateTime::now_utc().date())?;
    drop(persistence);

    if !response.unknown_placeholders.is_empty() {
        warn!(
            unknown = ?response.unknown_placeholders,
            "Email template references unknown placeholders"
        );
    }

    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
///
/// Returns a specific audit event by its ID.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    info!(event_id = event_id, "Handling get_audit_event request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AuditEventResponse = get_audit_event(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/audit/timeline` endpoint.
///
/// Returns audit events in order, optionally for one case.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<ListAuditEventsResponse>, HttpError> {
    info!(case_number = ?query.case_number, "Handling get_audit_timeline request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListAuditEventsResponse =
        list_audit_events(&mut persistence, query.case_number.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/organizations", post(handle_create_organization))
        .route("/cases", post(handle_create_case))
        .route("/cases", get(handle_list_cases))
        .route("/cases/{case_number}", get(handle_get_case))
        .route("/cases/{case_number}/subjects", post(handle_add_subject))
        .route("/cases/{case_number}/updates", post(handle_record_update))
        .route(
            "/cases/{case_number}/activities",
            post(handle_record_activity),
        )
        .route(
            "/cases/{case_number}/attachments",
            post(handle_register_attachment),
        )
        .route("/cases/{case_number}/status", post(handle_change_status))
        .route(
            "/cases/{case_number}/email/preview",
            post(handle_compose_email),
        )
        .route("/templates", post(handle_create_template))
        .route("/templates", get(handle_list_templates))
        .route("/templates/{template_id}", get(handle_get_template))
        .route(
            "/templates/{template_id}/sections/move",
            post(handle_move_section),
        )
        .route(
            "/templates/{template_id}/commands",
            post(handle_template_command),
        )
        .route("/reports/preview", post(handle_preview_report))
        .route("/reports", post(handle_generate_report))
        .route("/reports", get(handle_list_reports))
        .route("/reports/{instance_id}", get(handle_get_report))
        .route("/reports/{instance_id}/export", get(handle_export_report))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Casebook Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        previews: Arc::new(Mutex::new(PreviewGenerations::new())),
        preview_debounce: Duration::from_millis(args.preview_debounce_ms),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use casebook_domain::CollectionConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state(preview_debounce: Duration) -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            previews: Arc::new(Mutex::new(PreviewGenerations::new())),
            preview_debounce,
        }
    }

    fn envelope() -> Value {
        json!({
            "actor_id": "manager-1",
            "cause_id": "test-cause",
            "cause_description": "Test request",
        })
    }

    /// Merges the request envelope into a JSON body.
    fn with_envelope(mut body: Value) -> Value {
        if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), envelope()) {
            target.extend(fields);
        }
        body
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let request_body: Body = body.map_or_else(Body::empty, |value| {
            Body::from(serde_json::to_string(&value).unwrap())
        });
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(request_body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    /// Creates an organization, a case and a template. Returns the
    /// organization and template ids.
    async fn bootstrap(app: &Router) -> (i64, i64) {
        let response = send(
            app,
            "POST",
            "/organizations",
            Some(with_envelope(json!({
                "name": "Acme Investigations",
                "case_number_prefix": "case",
            }))),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let organization_id: i64 = body_json(response).await["organization_id"]
            .as_i64()
            .unwrap();

        let response = send(
            app,
            "POST",
            "/cases",
            Some(with_envelope(json!({
                "organization_id": organization_id,
                "case_type": "Surveillance",
                "contact_name": "Dana Park",
                "primary_subject": {
                    "name": "John Smith",
                    "kind": "Person",
                    "role": "Subject",
                },
            }))),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let updates = serde_json::to_value(SectionBody::UpdateCollection(
            CollectionConfig::default(),
        ))
        .unwrap();
        let response = send(
            app,
            "POST",
            "/templates",
            Some(with_envelope(json!({
                "organization_id": organization_id,
                "name": "Standard Report",
                "footer_text": "{{case_number}} Confidential",
                "sections": [
                    {
                        "title": "Introduction",
                        "body": { "type": "static_text", "content": "This report concerns {{primary_subject}}." },
                    },
                    { "title": "Updates", "body": updates },
                ],
            }))),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let template_id: i64 = body_json(response).await["template_id"].as_i64().unwrap();

        (organization_id, template_id)
    }

    fn report_body(organization_id: i64, template_id: i64) -> Value {
        json!({
            "organization_id": organization_id,
            "case_number": "CASE-00001",
            "template_id": template_id,
            "report_title": "Surveillance Report",
        })
    }

    #[tokio::test]
    async fn test_create_case_returns_case_number() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let response = send(
            &app,
            "GET",
            &format!("/cases/CASE-00001?organization_id={organization_id}"),
            None,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let case: Value = body_json(response).await;
        assert_eq!(case["case"]["title"], "John Smith");
        assert_eq!(case["case"]["status"], "Open");
        assert_eq!(case["subjects"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_prefix_is_bad_request() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));

        let response = send(
            &app,
            "POST",
            "/organizations",
            Some(with_envelope(json!({
                "name": "Acme Investigations",
                "case_number_prefix": "CA-SE",
            }))),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(error.error);
    }

    #[tokio::test]
    async fn test_unknown_case_is_not_found() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let response = send(
            &app,
            "GET",
            &format!("/cases/CASE-00099?organization_id={organization_id}"),
            None,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_case_rejects_updates() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let response = send(
            &app,
            "POST",
            "/cases/CASE-00001/status",
            Some(with_envelope(json!({
                "organization_id": organization_id,
                "status": "Closed",
            }))),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = send(
            &app,
            "POST",
            "/cases/CASE-00001/updates",
            Some(with_envelope(json!({
                "organization_id": organization_id,
                "update_type": "Surveillance",
                "title": "Day 1",
                "body": "Subject left the residence.",
            }))),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_duplicate_template_name_is_conflict() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let response = send(
            &app,
            "POST",
            "/templates",
            Some(with_envelope(json!({
                "organization_id": organization_id,
                "name": "Standard Report",
            }))),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_move_section_reorders_template() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (_, template_id) = bootstrap(&app).await;

        let template: Value = body_json(
            send(&app, "GET", &format!("/templates/{template_id}"), None).await,
        )
        .await;
        let updates_id: Value = template["template"]["sections"][1]["section_id"].clone();

        let response = send(
            &app,
            "POST",
            &format!("/templates/{template_id}/sections/move"),
            Some(with_envelope(json!({
                "section_id": updates_id,
                "to_index": 0,
            }))),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let moved: Value = body_json(response).await;
        assert_eq!(moved["template"]["sections"][0]["title"], "Updates");
        assert_eq!(moved["template"]["sections"][1]["display_order"], 1);
    }

    #[tokio::test]
    async fn test_preview_renders_pages() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, template_id) = bootstrap(&app).await;

        let response = send(
            &app,
            "POST",
            "/reports/preview",
            Some(report_body(organization_id, template_id)),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let preview: PreviewApiResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert!(!preview.superseded);
        let preview: PreviewReportResponse = preview.preview.unwrap();
        assert!(preview.html.contains("This report concerns John Smith."));
        assert!(preview.html.contains("CASE-00001 Confidential"));
    }

    #[tokio::test]
    async fn test_newer_preview_supersedes_older() {
        let app_state: AppState = create_test_app_state(Duration::from_millis(50));
        let app: Router = build_router(app_state.clone());
        let (organization_id, template_id) = bootstrap(&app).await;

        let first = send(
            &app,
            "POST",
            "/reports/preview",
            Some(report_body(organization_id, template_id)),
        );
        let second = send(
            &app,
            "POST",
            "/reports/preview",
            Some(report_body(organization_id, template_id)),
        );
        let (first, second) = tokio::join!(first, second);

        let first: PreviewApiResponse = serde_json::from_value(body_json(first).await).unwrap();
        let second: PreviewApiResponse = serde_json::from_value(body_json(second).await).unwrap();

        assert!(first.superseded);
        assert!(first.preview.is_none());
        assert!(!second.superseded);
        assert!(second.preview.is_some());
        assert_eq!(app_state.previews.lock().await.pending(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_preview_releases_draft() {
        let app_state: AppState = create_test_app_state(Duration::from_secs(5));
        let app: Router = build_router(app_state.clone());
        let (organization_id, template_id) = bootstrap(&app).await;

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            send(
                &app,
                "POST",
                "/reports/preview",
                Some(report_body(organization_id, template_id)),
            ),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(app_state.previews.lock().await.pending(), 0);
    }

    #[tokio::test]
    async fn test_generate_and_export_pdf() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, template_id) = bootstrap(&app).await;

        let response = send(
            &app,
            "POST",
            "/reports",
            Some(with_envelope(report_body(organization_id, template_id))),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let generated: GenerateReportResponse =
            serde_json::from_value(body_json(response).await).unwrap();

        let response = send(
            &app,
            "GET",
            &format!(
                "/reports/{}/export?format=pdf&actor_id=manager-1",
                generated.instance_id
            ),
            None,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"case-00001-surveillance-report.pdf\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let listed: ListReportsResponse = serde_json::from_value(
            body_json(
                send(
                    &app,
                    "GET",
                    &format!(
                        "/reports?organization_id={organization_id}&case_number=CASE-00001"
                    ),
                    None,
                )
                .await,
            )
            .await,
        )
        .unwrap();
        assert_eq!(listed.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_export_unknown_format_is_bad_request() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, template_id) = bootstrap(&app).await;

        let generated: GenerateReportResponse = serde_json::from_value(
            body_json(
                send(
                    &app,
                    "POST",
                    "/reports",
                    Some(with_envelope(report_body(organization_id, template_id))),
                )
                .await,
            )
            .await,
        )
        .unwrap();

        let response = send(
            &app,
            "GET",
            &format!(
                "/reports/{}/export?format=xlsx&actor_id=manager-1",
                generated.instance_id
            ),
            None,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_email_preview_fills_placeholders() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let response = send(
            &app,
            "POST",
            "/cases/CASE-00001/email/preview",
            Some(json!({
                "organization_id": organization_id,
                "subject_template": "Update on {{case_number}}",
                "body_template": "<p>Hello {{contact_name}}</p>",
            })),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let composed: ComposeEmailResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(composed.subject, "Update on CASE-00001");
        assert!(composed.html_body.contains("Hello Dana Park"));
    }

    #[tokio::test]
    async fn test_get_audit_event_for_case_creation() {
        let app: Router = build_router(create_test_app_state(Duration::ZERO));
        let (organization_id, _) = bootstrap(&app).await;

        let case: Value = body_json(
            send(
                &app,
                "GET",
                &format!("/cases?organization_id={organization_id}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(case["cases"].as_array().unwrap().len(), 1);

        let response = send(&app, "GET", "/audit/event/1", None).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let event: AuditEventResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(event.actor_id, "manager-1");

        let response = send(&app, "GET", "/audit/event/999", None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);

        let timeline: ListAuditEventsResponse = serde_json::from_value(
            body_json(send(&app, "GET", "/audit/timeline?case_number=CASE-00001", None).await)
                .await,
        )
        .unwrap();
        assert_eq!(timeline.events[0].action, "OpenCase");
        assert!(
            timeline
                .events
                .iter()
                .all(|e| e.case_number.as_deref() == Some("CASE-00001"))
        );
    }
}
