// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Each handler loads what it needs from persistence, runs the core
//! transition or renderer, writes the result and maps every failure to an
//! [`ApiError`].

use std::str::FromStr;

use casebook::{
    CaseFile, Command, ComposedEmail, ExportFormat, OpenCaseRequest, OpenCaseResult, PageLayout,
    RenderedReport, ReportData, ReportError, ReportExport, ReportExported, ReportGenerated,
    ReportInstance, TemplateCreated, TemplateTransition, TransitionResult, apply, apply_template,
    compose_case_email, export_instance, generate_instance, open_case, render_report,
};
use casebook_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use casebook_domain::{
    Attachment, Case, CaseActivity, CaseNumber, CaseStatus, CaseUpdate, Organization,
    ReportTemplate, Subject, SubjectKind, SubjectRole, TemplateSection, VariableMap,
    build_variable_map, format_iso_date, next_case_number_fallback, normalize_prefix,
    parse_iso_date, unknown_placeholders, validate_organization,
};
use casebook_persistence::{PersistedChange, Persistence, PersistenceError};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_report_error,
};
use crate::request_response::{
    ActivityInfo, AddSubjectRequest, AttachmentInfo, AuditEventResponse, CaseChangeResponse,
    CaseInfo, ChangeCaseStatusRequest, ComposeEmailRequest, ComposeEmailResponse,
    CreateCaseRequest, CreateCaseResponse, CreateOrganizationRequest, CreateOrganizationResponse,
    CreateTemplateRequest, ExportReportRequest, ExportReportResponse, GenerateReportResponse,
    GetCaseResponse, GetReportResponse, ListAuditEventsResponse, ListCasesResponse,
    ListReportsResponse, ListTemplatesResponse, ModifyTemplateRequest, PreviewReportResponse,
    RecordActivityRequest, RecordUpdateRequest, RegisterAttachmentRequest, ReportExportInfo,
    ReportRequest, ReportSummary, SubjectInfo, SubjectInput, TemplateResponse, TemplateSummary,
    UpdateInfo,
};

// ============================================================================
// Conversions
// ============================================================================

fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("'{value}' is not an RFC 3339 timestamp: {e}"),
    })
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_iso_date)
        .transpose()
        .map_err(translate_domain_error)
}

fn build_subject(input: &SubjectInput) -> Result<Subject, ApiError> {
    let kind: SubjectKind = SubjectKind::from_str(&input.kind).map_err(translate_domain_error)?;
    let role: SubjectRole = SubjectRole::from_str(&input.role).map_err(translate_domain_error)?;
    let mut subject: Subject = Subject::new(&input.name, kind, role, input.is_primary);
    subject.notes.clone_from(&input.notes);
    Ok(subject)
}

fn case_info(case: &Case) -> CaseInfo {
    CaseInfo {
        case_id: case.case_id,
        case_number: case.case_number.clone(),
        title: case.title.clone(),
        status: case.status.as_str().to_string(),
        case_type: case.case_type.clone(),
        account_name: case.account_name.clone(),
        contact_name: case.contact_name.clone(),
        manager_name: case.manager_name.clone(),
        opened_on: format_iso_date(case.opened_on),
        due_date: case.due_date.map(format_iso_date),
        subject_count: case.counts.subjects,
        update_count: case.counts.updates,
        event_count: case.counts.events,
        attachment_count: case.counts.attachments,
    }
}

fn report_summary(instance: &ReportInstance) -> Result<ReportSummary, ApiError> {
    Ok(ReportSummary {
        instance_id: instance.instance_id,
        case_number: instance.case_number.clone(),
        template_id: instance.template_id,
        title: instance.title.clone(),
        page_count: instance.page_count(),
        content_hash: instance.content_hash.clone(),
        generated_by: instance.generated_by.clone(),
        generated_at: format_timestamp(instance.generated_at)?,
    })
}

// ============================================================================
// Organizations
// ============================================================================

/// Creates an organization.
///
/// The creation is recorded as a global audit event.
///
/// # Errors
///
/// Returns an error if the name is empty, the prefix is invalid, or the
/// database write fails.
pub fn create_organization(
    persistence: &mut Persistence,
    request: &CreateOrganizationRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CreateOrganizationResponse, ApiError> {
    let mut organization: Organization =
        Organization::new(&request.name, &request.case_number_prefix);
    organization.address.clone_from(&request.address);
    organization.phone.clone_from(&request.phone);
    organization.email.clone_from(&request.email);
    organization.website.clone_from(&request.website);
    organization.logo_url.clone_from(&request.logo_url);

    validate_organization(&organization).map_err(translate_domain_error)?;
    organization.case_number_prefix =
        normalize_prefix(&organization.case_number_prefix).map_err(translate_domain_error)?;

    let organization_id: i64 = persistence.create_organization(&organization)?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("CreateOrganization"),
            Some(format!("Created organization '{}'", organization.name)),
        ),
        StateSnapshot::empty(),
        StateSnapshot::new(format!(
            "organization_id={organization_id},name={},prefix={}",
            organization.name, organization.case_number_prefix
        )),
        AuditScope::Global,
    );
    let event_id: i64 = persistence.persist_audit_event(&audit_event)?;

    info!(organization_id, event_id, name = %organization.name, "Created organization");

    Ok(CreateOrganizationResponse {
        organization_id,
        name: organization.name.clone(),
        case_number_prefix: organization.case_number_prefix.clone(),
        event_id,
        message: format!("Created organization '{}'", organization.name),
    })
}

// ============================================================================
// Cases
// ============================================================================

/// Reserves a case number, falling back to scanning issued numbers when the
/// counter cannot be used.
///
/// The fallback is not atomic: two concurrent callers can compute the same
/// number. The unique index on case numbers turns that race into a failed
/// insert instead of a duplicate.
fn reserve_case_number(
    persistence: &mut Persistence,
    organization: &Organization,
    organization_id: i64,
) -> Result<(CaseNumber, bool), ApiError> {
    match persistence.allocate_case_number(organization_id) {
        Ok(case_number) => Ok((case_number, false)),
        Err(err @ PersistenceError::OrganizationNotFound(_)) => Err(ApiError::from(err)),
        Err(err) => {
            warn!(
                organization_id,
                error = %err,
                "Case number counter unavailable, falling back to scanning issued numbers"
            );
            let existing: Vec<String> = persistence.list_case_numbers(organization_id)?;
            let case_number: CaseNumber =
                next_case_number_fallback(&organization.case_number_prefix, &existing)
                    .map_err(translate_domain_error)?;
            Ok((case_number, true))
        }
    }
}

/// Opens a case, optionally attaching its primary subject.
///
/// This function:
/// - Reserves the next case number for the organization
/// - Opens and stores the case with its audit event
/// - Adds the primary subject, if one was supplied
///
/// The primary subject is written in a second step. If that step fails the
/// case is kept and the failure is reported in `warnings`.
///
/// # Errors
///
/// Returns an error if:
/// - The organization does not exist
/// - The case fields or due date are invalid
/// - The case number is already taken
/// - The database write fails
pub fn create_case(
    persistence: &mut Persistence,
    request: &CreateCaseRequest,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreateCaseResponse, ApiError> {
    let organization: Organization = persistence.get_organization(request.organization_id)?;
    let due_date: Option<Date> = parse_optional_date(request.due_date.as_deref())?;

    let (case_number, used_fallback_number): (CaseNumber, bool) =
        reserve_case_number(persistence, &organization, request.organization_id)?;

    let opened: OpenCaseResult = open_case(
        &organization,
        OpenCaseRequest {
            title: request.title.clone().filter(|t| !t.trim().is_empty()),
            case_type: request.case_type.clone(),
            account_name: request.account_name.clone(),
            contact_name: request.contact_name.clone(),
            manager_name: request.manager_name.clone(),
            due_date,
        },
        case_number.to_string(),
        now.date(),
        actor.clone(),
        cause.clone(),
    )
    .map_err(translate_core_error)?;

    let change: PersistedChange = persistence.persist_opened_case(&opened)?;
    let case_id: i64 = change.record_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Opened case was stored without an id"),
    })?;

    let mut case_file: CaseFile = opened.case_file;
    case_file.case.case_id = Some(case_id);

    let mut warnings: Vec<String> = Vec::new();
    if let Some(input) = &request.primary_subject {
        let mut input: SubjectInput = input.clone();
        input.is_primary = true;
        match add_subject_to(persistence, &case_file, &input, actor, cause) {
            Ok(result) => case_file = result.new_state,
            Err(err) => {
                warn!(
                    case_number = %case_file.case.case_number,
                    error = %err,
                    "Case opened but the primary subject could not be added"
                );
                warnings.push(format!(
                    "Case {} was created, but the primary subject was not added: {err}",
                    case_file.case.case_number
                ));
            }
        }
    }

    info!(
        case_id,
        case_number = %case_file.case.case_number,
        used_fallback_number,
        "Created case"
    );

    Ok(CreateCaseResponse {
        case_id,
        case_number: case_file.case.case_number.clone(),
        title: case_file.case.title.clone(),
        event_id: change.event_id,
        used_fallback_number,
        warnings,
    })
}

fn add_subject_to(
    persistence: &mut Persistence,
    case_file: &CaseFile,
    input: &SubjectInput,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, ApiError> {
    let subject: Subject = build_subject(input)?;
    let result: TransitionResult = apply(case_file, Command::AddSubject { subject }, actor, cause)
        .map_err(translate_core_error)?;
    persistence.persist_case_transition(&result)?;
    Ok(result)
}

/// Loads a case, applies one command and stores the result.
fn apply_case_command(
    persistence: &mut Persistence,
    organization_id: i64,
    case_number: &str,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<CaseChangeResponse, ApiError> {
    let case_file: CaseFile = persistence.get_case_file(organization_id, case_number)?;
    let action_name: &'static str = command.action_name();

    let result: TransitionResult =
        apply(&case_file, command, actor, cause).map_err(translate_core_error)?;
    let change: PersistedChange = persistence.persist_case_transition(&result)?;

    debug!(
        case_number,
        action = action_name,
        event_id = change.event_id,
        "Applied case command"
    );

    Ok(CaseChangeResponse {
        case_number: case_number.to_string(),
        event_id: change.event_id,
        record_id: change.record_id,
        message: result
            .audit_event
            .action
            .details
            .unwrap_or_else(|| action_name.to_string()),
    })
}

/// Attaches a subject or client to a case.
///
/// A new primary subject demotes the previous one and, while the case is
/// auto-titled, retitles the case.
///
/// # Errors
///
/// Returns an error if the case does not exist or is closed, the subject is
/// invalid, or a client is marked primary.
pub fn add_subject(
    persistence: &mut Persistence,
    request: &AddSubjectRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CaseChangeResponse, ApiError> {
    let subject: Subject = build_subject(&request.subject)?;
    apply_case_command(
        persistence,
        request.organization_id,
        &request.case_number,
        Command::AddSubject { subject },
        actor,
        cause,
    )
}

/// Records a narrative update on a case.
///
/// # Errors
///
/// Returns an error if the case does not exist or is closed, or the update
/// is invalid.
pub fn record_update(
    persistence: &mut Persistence,
    request: &RecordUpdateRequest,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CaseChangeResponse, ApiError> {
    let created_at: OffsetDateTime = match request.created_at.as_deref() {
        Some(value) => parse_timestamp("created_at", value)?,
        None => now,
    };
    let update: CaseUpdate = CaseUpdate {
        update_id: None,
        update_type: request.update_type.clone(),
        title: request.title.clone(),
        body: request.body.clone(),
        author_name: request.author_name.clone(),
        created_at,
    };
    apply_case_command(
        persistence,
        request.organization_id,
        &request.case_number,
        Command::RecordUpdate { update },
        actor,
        cause,
    )
}

/// Records a dated activity on a case.
///
/// # Errors
///
/// Returns an error if the case does not exist or is closed, or the
/// activity is invalid.
pub fn record_activity(
    persistence: &mut Persistence,
    request: &RecordActivityRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CaseChangeResponse, ApiError> {
    let activity: CaseActivity = CaseActivity {
        activity_id: None,
        activity_type: request.activity_type.clone(),
        title: request.title.clone(),
        description: request.description.clone(),
        location: request.location.clone(),
        occurred_at: parse_timestamp("occurred_at", &request.occurred_at)?,
    };
    apply_case_command(
        persistence,
        request.organization_id,
        &request.case_number,
        Command::RecordActivity { activity },
        actor,
        cause,
    )
}

/// Registers attachment metadata on a case.
///
/// # Errors
///
/// Returns an error if the case does not exist or is closed, or the
/// metadata is invalid.
pub fn register_attachment(
    persistence: &mut Persistence,
    request: &RegisterAttachmentRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CaseChangeResponse, ApiError> {
    let attachment: Attachment = Attachment {
        attachment_id: None,
        file_name: request.file_name.clone(),
        content_type: request.content_type.clone(),
        size_bytes: request.size_bytes,
        storage_path: request.storage_path.clone(),
    };
    apply_case_command(
        persistence,
        request.organization_id,
        &request.case_number,
        Command::RegisterAttachment { attachment },
        actor,
        cause,
    )
}

/// Moves a case to another status.
///
/// # Errors
///
/// Returns an error if the case does not exist, the status is unknown, or
/// the transition is not permitted.
pub fn change_case_status(
    persistence: &mut Persistence,
    request: &ChangeCaseStatusRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CaseChangeResponse, ApiError> {
    let status: CaseStatus = CaseStatus::from_str(&request.status).map_err(translate_domain_error)?;
    apply_case_command(
        persistence,
        request.organization_id,
        &request.case_number,
        Command::ChangeStatus { status },
        actor,
        cause,
    )
}

/// Returns a case with all of its records.
///
/// # Errors
///
/// Returns an error if the case does not exist.
pub fn get_case(
    persistence: &mut Persistence,
    organization_id: i64,
    case_number: &str,
) -> Result<GetCaseResponse, ApiError> {
    let case_file: CaseFile = persistence.get_case_file(organization_id, case_number)?;

    let updates: Vec<UpdateInfo> = case_file
        .updates
        .iter()
        .map(|u| {
            Ok(UpdateInfo {
                update_id: u.update_id,
                update_type: u.update_type.clone(),
                title: u.title.clone(),
                body: u.body.clone(),
                author_name: u.author_name.clone(),
                created_at: format_timestamp(u.created_at)?,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    let activities: Vec<ActivityInfo> = case_file
        .activities
        .iter()
        .map(|a| {
            Ok(ActivityInfo {
                activity_id: a.activity_id,
                activity_type: a.activity_type.clone(),
                title: a.title.clone(),
                description: a.description.clone(),
                location: a.location.clone(),
                occurred_at: format_timestamp(a.occurred_at)?,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(GetCaseResponse {
        case: case_info(&case_file.case),
        subjects: case_file
            .subjects
            .iter()
            .map(|s| SubjectInfo {
                subject_id: s.subject_id,
                name: s.name.clone(),
                kind: s.kind.as_str().to_string(),
                role: s.role.as_str().to_string(),
                is_primary: s.is_primary,
                notes: s.notes.clone(),
            })
            .collect(),
        updates,
        activities,
        attachments: case_file
            .attachments
            .iter()
            .map(|a| AttachmentInfo {
                attachment_id: a.attachment_id,
                file_name: a.file_name.clone(),
                content_type: a.content_type.clone(),
                size_bytes: a.size_bytes,
                storage_path: a.storage_path.clone(),
            })
            .collect(),
    })
}

/// Lists an organization's cases, newest first.
///
/// # Errors
///
/// Returns an error if the organization does not exist.
pub fn list_cases(
    persistence: &mut Persistence,
    organization_id: i64,
) -> Result<ListCasesResponse, ApiError> {
    persistence.get_organization(organization_id)?;
    let cases: Vec<Case> = persistence.list_cases(organization_id)?;

    Ok(ListCasesResponse {
        organization_id,
        cases: cases.iter().map(case_info).collect(),
    })
}

// ============================================================================
// Templates
// ============================================================================

/// Creates a report template.
///
/// Sections are stored in the order given; display orders are assigned
/// `0..n`.
///
/// # Errors
///
/// Returns an error if the organization does not exist, the template fails
/// validation, or the name is already used in the organization.
pub fn create_template(
    persistence: &mut Persistence,
    request: &CreateTemplateRequest,
    actor: Actor,
    cause: Cause,
) -> Result<TemplateResponse, ApiError> {
    persistence.get_organization(request.organization_id)?;

    let mut template: ReportTemplate = ReportTemplate::new(request.organization_id, &request.name);
    template.description.clone_from(&request.description);
    template.cover_title.clone_from(&request.cover_title);
    template.header_text.clone_from(&request.header_text);
    template.footer_text.clone_from(&request.footer_text);
    template.show_cover_page = request.show_cover_page;
    template.show_header_footer = request.show_header_footer;
    template.sections = request
        .sections
        .iter()
        .zip(0_u32..)
        .map(|(input, display_order)| {
            let mut section: TemplateSection =
                TemplateSection::new(&input.title, display_order, input.body.clone());
            section.is_visible = input.is_visible;
            section
        })
        .collect();

    let created: TemplateCreated =
        casebook::create_template(template, actor, cause).map_err(translate_core_error)?;
    let change: PersistedChange = persistence.persist_new_template(&created)?;
    let template_id: i64 = change.record_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Template was stored without an id"),
    })?;

    let mut template: ReportTemplate = created.template;
    template.template_id = Some(template_id);

    Ok(TemplateResponse {
        template_id,
        event_id: Some(change.event_id),
        reordered_sections: 0,
        template,
    })
}

/// Returns a stored template with its sections in display order.
///
/// # Errors
///
/// Returns an error if the template does not exist.
pub fn get_template(
    persistence: &mut Persistence,
    template_id: i64,
) -> Result<TemplateResponse, ApiError> {
    let template: ReportTemplate = persistence.get_template(template_id)?;
    Ok(TemplateResponse {
        template_id,
        event_id: None,
        reordered_sections: 0,
        template,
    })
}

/// Lists an organization's templates by name.
///
/// # Errors
///
/// Returns an error if the organization does not exist.
pub fn list_templates(
    persistence: &mut Persistence,
    organization_id: i64,
) -> Result<ListTemplatesResponse, ApiError> {
    persistence.get_organization(organization_id)?;
    let templates: Vec<ReportTemplate> = persistence.list_templates(organization_id)?;

    Ok(ListTemplatesResponse {
        organization_id,
        templates: templates
            .into_iter()
            .map(|t| TemplateSummary {
                template_id: t.template_id,
                section_count: t.sections.len(),
                name: t.name,
                description: t.description,
            })
            .collect(),
    })
}

/// Applies an authoring command to a stored template.
///
/// Moves renumber every section so stored ranks stay contiguous.
///
/// # Errors
///
/// Returns an error if the template does not exist, the command names an
/// unknown section or position, or the result fails validation.
pub fn modify_template(
    persistence: &mut Persistence,
    request: &ModifyTemplateRequest,
    actor: Actor,
    cause: Cause,
) -> Result<TemplateResponse, ApiError> {
    let template: ReportTemplate = persistence.get_template(request.template_id)?;

    let transition: TemplateTransition =
        apply_template(&template, request.command.clone(), actor, cause)
            .map_err(translate_core_error)?;
    let change: PersistedChange = persistence.persist_template_transition(&transition)?;

    Ok(TemplateResponse {
        template_id: request.template_id,
        event_id: Some(change.event_id),
        reordered_sections: transition.order_changes.len(),
        template: transition.new_template,
    })
}

// ============================================================================
// Reports
// ============================================================================

fn render_for_request(
    persistence: &mut Persistence,
    request: &ReportRequest,
    today: Date,
) -> Result<RenderedReport, ApiError> {
    let organization: Organization = persistence.get_organization(request.organization_id)?;
    let case_file: CaseFile =
        persistence.get_case_file(request.organization_id, &request.case_number)?;
    let template: ReportTemplate = persistence.get_template(request.template_id)?;
    if template.organization_id != request.organization_id {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Template"),
            message: format!(
                "Template {} does not belong to organization {}",
                request.template_id, request.organization_id
            ),
        });
    }

    let report_date: Date = parse_optional_date(request.report_date.as_deref())?.unwrap_or(today);
    let report_title: String = request
        .report_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| template.name.clone());

    let data: ReportData<'_> = ReportData {
        organization: &organization,
        case: &case_file.case,
        subjects: &case_file.subjects,
        updates: &case_file.updates,
        activities: &case_file.activities,
        report_date,
        report_title: &report_title,
    };

    render_report(
        &template,
        &request.customization,
        &data,
        &PageLayout::letter(),
    )
    .map_err(translate_report_error)
}

/// Renders a paginated HTML preview without storing anything.
///
/// # Errors
///
/// Returns an error if the case or template does not exist, or the
/// customization references sections outside the template.
pub fn preview_report(
    persistence: &mut Persistence,
    request: &ReportRequest,
    today: Date,
) -> Result<PreviewReportResponse, ApiError> {
    let rendered: RenderedReport = render_for_request(persistence, request, today)?;
    debug!(
        case_number = %request.case_number,
        template_id = request.template_id,
        pages = rendered.page_count(),
        "Rendered report preview"
    );

    Ok(PreviewReportResponse {
        page_count: rendered.page_count(),
        title: rendered.title,
        html: rendered.html,
    })
}

/// Renders a report and stores it as an immutable instance.
///
/// # Errors
///
/// Returns an error if rendering fails or the instance cannot be stored.
pub fn generate_report(
    persistence: &mut Persistence,
    request: &ReportRequest,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<GenerateReportResponse, ApiError> {
    let rendered: RenderedReport = render_for_request(persistence, request, now.date())?;
    let generated: ReportGenerated = generate_instance(
        rendered,
        &request.case_number,
        request.template_id,
        request.customization.clone(),
        now,
        actor,
        cause,
    );
    let change: PersistedChange =
        persistence.insert_report_instance(request.organization_id, &generated)?;
    let instance_id: i64 = change.record_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Report instance was stored without an id"),
    })?;

    info!(
        instance_id,
        case_number = %request.case_number,
        content_hash = %generated.instance.content_hash,
        "Generated report"
    );

    Ok(GenerateReportResponse {
        instance_id,
        event_id: change.event_id,
        page_count: generated.instance.page_count(),
        title: generated.instance.title,
        content_hash: generated.instance.content_hash,
    })
}

/// Exports a stored report and records the export.
///
/// The stored content hash is verified before any bytes are produced.
///
/// # Errors
///
/// Returns an error if the format is unsupported, the report does not
/// exist, or its content no longer matches its hash.
pub fn export_report(
    persistence: &mut Persistence,
    request: &ExportReportRequest,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ExportReportResponse, ApiError> {
    let format: ExportFormat =
        ExportFormat::from_str(&request.format).map_err(translate_report_error)?;
    let instance: ReportInstance = persistence.get_report_instance(request.instance_id)?;

    let exported: ReportExported = match export_instance(&instance, format, now, actor, cause) {
        Ok(exported) => exported,
        Err(err @ ReportError::IntegrityMismatch { .. }) => {
            error!(
                instance_id = request.instance_id,
                error = %err,
                "Stored report failed its integrity check"
            );
            return Err(translate_report_error(err));
        }
        Err(err) => return Err(translate_report_error(err)),
    };
    let change: PersistedChange = persistence.record_report_export(&exported)?;
    let export_id: i64 = change.record_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Report export was stored without an id"),
    })?;

    Ok(ExportReportResponse {
        export_id,
        event_id: change.event_id,
        file_name: exported.document.file_name,
        content_type: exported.document.content_type.to_string(),
        bytes: exported.document.bytes,
    })
}

/// Lists the reports generated for a case.
///
/// # Errors
///
/// Returns an error if the case does not exist.
pub fn list_reports(
    persistence: &mut Persistence,
    organization_id: i64,
    case_number: &str,
) -> Result<ListReportsResponse, ApiError> {
    let instances: Vec<ReportInstance> =
        persistence.list_report_instances(organization_id, case_number)?;

    Ok(ListReportsResponse {
        case_number: case_number.to_string(),
        reports: instances
            .iter()
            .map(report_summary)
            .collect::<Result<_, ApiError>>()?,
    })
}

/// Returns a stored report with its export history.
///
/// # Errors
///
/// Returns an error if the report does not exist.
pub fn get_report(
    persistence: &mut Persistence,
    instance_id: i64,
) -> Result<GetReportResponse, ApiError> {
    let instance: ReportInstance = persistence.get_report_instance(instance_id)?;
    let exports: Vec<ReportExport> = persistence.list_report_exports(instance_id)?;

    Ok(GetReportResponse {
        report: report_summary(&instance)?,
        exports: exports
            .iter()
            .map(|e| {
                Ok(ReportExportInfo {
                    export_id: e.export_id,
                    format: e.format.as_str().to_string(),
                    exported_by: e.exported_by.clone(),
                    exported_at: format_timestamp(e.exported_at)?,
                })
            })
            .collect::<Result<_, ApiError>>()?,
        customization: instance.customization,
        html: instance.html,
    })
}

// ============================================================================
// Email
// ============================================================================

/// Fills an email template with a case's variables.
///
/// Nothing is sent. Placeholders outside the recognized vocabulary are left
/// in the text and listed in the response.
///
/// # Errors
///
/// Returns an error if the organization or case does not exist.
pub fn compose_email(
    persistence: &mut Persistence,
    request: &ComposeEmailRequest,
    today: Date,
) -> Result<ComposeEmailResponse, ApiError> {
    let organization: Organization = persistence.get_organization(request.organization_id)?;
    let case_file: CaseFile =
        persistence.get_case_file(request.organization_id, &request.case_number)?;

    let variables: VariableMap = build_variable_map(
        &organization,
        &case_file.case,
        &case_file.subjects,
        today,
        &case_file.case.title,
    );

    let mut unknown: Vec<String> = unknown_placeholders(&request.subject_template);
    for name in unknown_placeholders(&request.body_template) {
        if !unknown.contains(&name) {
            unknown.push(name);
        }
    }
    if !unknown.is_empty() {
        debug!(
            case_number = %request.case_number,
            unknown = ?unknown,
            "Email template contains unknown placeholders"
        );
    }

    let composed: ComposedEmail = compose_case_email(
        &request.subject_template,
        &request.body_template,
        &variables,
        request.signature_html.as_deref(),
    );

    Ok(ComposeEmailResponse {
        subject: composed.subject,
        html_body: composed.html_body,
        unknown_placeholders: unknown,
    })
}

// ============================================================================
// Audit
// ============================================================================

fn audit_event_response(event: AuditEvent, fallback_id: i64) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id.unwrap_or(fallback_id),
        case_number: event.scope.case_number().map(str::to_string),
        actor_id: event.actor.id,
        actor_type: event.actor.actor_type,
        cause_id: event.cause.id,
        cause_description: event.cause.description,
        action: event.action.name,
        details: event.action.details,
        before: event.before.data,
        after: event.after.data,
    }
}

/// Returns one audit event.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn get_audit_event(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<AuditEventResponse, ApiError> {
    let event: AuditEvent = persistence.get_audit_event(event_id)?;
    Ok(audit_event_response(event, event_id))
}

/// Returns the audit timeline in event order, optionally for one case.
///
/// # Errors
///
/// Returns an error if the events cannot be read.
pub fn list_audit_events(
    persistence: &mut Persistence,
    case_number: Option<&str>,
) -> Result<ListAuditEventsResponse, ApiError> {
    let events: Vec<AuditEvent> = persistence.list_audit_events(case_number)?;

    Ok(ListAuditEventsResponse {
        case_number: case_number.map(str::to_string),
        events: events
            .into_iter()
            .map(|event| audit_event_response(event, 0))
            .collect(),
    })
}
