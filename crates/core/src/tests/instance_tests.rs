// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_actor, create_test_case_file, create_test_cause, create_test_organization,
    create_test_template, create_test_updates, report_data,
};
use crate::report::{ExportFormat, PageLayout, RenderedReport, ReportError, content_hash};
use crate::{
    CaseFile, ReportExported, ReportGenerated, export_instance, generate_instance, render_report,
};
use casebook_audit::AuditScope;
use casebook_domain::{Organization, TemplateCustomization};
use time::macros::datetime;

fn rendered() -> RenderedReport {
    let organization: Organization = create_test_organization();
    let mut case_file: CaseFile = create_test_case_file();
    case_file.updates = create_test_updates();
    render_report(
        &create_test_template(),
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    )
    .unwrap()
}

fn generated() -> ReportGenerated {
    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.show_cover_page = Some(true);
    generate_instance(
        rendered(),
        "CASE-00001",
        3,
        customization,
        datetime!(2026-04-01 12:00 UTC),
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_content_hash_is_sha256_hex() {
    let report: RenderedReport = rendered();
    let hash: String = content_hash(&report.html, &report.layout, &report.pages);

    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        hash,
        content_hash(&report.html, &report.layout, &report.pages)
    );
}

#[test]
fn test_generate_instance_freezes_report() {
    let report: RenderedReport = rendered();
    let generated: ReportGenerated = generated();
    let instance = &generated.instance;

    assert_eq!(instance.instance_id, None);
    assert_eq!(instance.html, report.html);
    assert_eq!(
        instance.content_hash,
        content_hash(&report.html, &report.layout, &report.pages)
    );
    assert_eq!(instance.page_count(), report.page_count());
    assert_eq!(instance.generated_by, "manager-1");
    assert_eq!(instance.customization.show_cover_page, Some(true));
    assert!(instance.verify_integrity().is_ok());

    assert_eq!(generated.audit_event.action.name, "GenerateReport");
    assert_eq!(
        generated.audit_event.scope,
        AuditScope::Report {
            case_number: String::from("CASE-00001"),
            content_hash: instance.content_hash.clone(),
        }
    );
}

#[test]
fn test_tampered_html_fails_integrity() {
    let mut instance = generated().instance;
    let stored: String = instance.content_hash.clone();
    instance.html.push_str("<!-- edited -->");

    assert_eq!(
        instance.verify_integrity(),
        Err(ReportError::IntegrityMismatch {
            stored,
            computed: content_hash(&instance.html, &instance.layout, &instance.pages),
        })
    );
    assert!(instance.export(ExportFormat::Pdf).is_err());
}

#[test]
fn test_tampered_pages_fail_integrity() {
    let mut instance = generated().instance;
    let stored: String = instance.content_hash.clone();
    instance.pages[1].lines[0].text = String::from("TAMPERED");

    assert_eq!(
        instance.verify_integrity(),
        Err(ReportError::IntegrityMismatch {
            stored,
            computed: content_hash(&instance.html, &instance.layout, &instance.pages),
        })
    );
    assert!(instance.export(ExportFormat::Doc).is_err());
}

#[test]
fn test_tampered_layout_fails_integrity() {
    let mut instance = generated().instance;
    instance.layout.margin_pt = 0;

    assert!(matches!(
        instance.verify_integrity(),
        Err(ReportError::IntegrityMismatch { .. })
    ));
}

#[test]
fn test_export_requires_saved_instance() {
    let instance = generated().instance;

    let result = export_instance(
        &instance,
        ExportFormat::Pdf,
        datetime!(2026-04-02 08:00 UTC),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(result, Err(ReportError::NotPersisted));
}

#[test]
fn test_export_reproduces_generated_pages() {
    let report: RenderedReport = rendered();
    let mut instance = generated().instance;
    instance.instance_id = Some(11);

    let exported: ReportExported = export_instance(
        &instance,
        ExportFormat::Doc,
        datetime!(2026-04-02 08:00 UTC),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(
        exported.document.bytes,
        report.export("CASE-00001", ExportFormat::Doc).bytes
    );
    assert_eq!(exported.export.instance_id, 11);
    assert_eq!(exported.export.format, ExportFormat::Doc);
    assert_eq!(exported.export.exported_by, "manager-1");
    assert_eq!(exported.audit_event.action.name, "ExportReport");
    assert_eq!(
        exported.audit_event.scope.case_number(),
        Some("CASE-00001")
    );
}
