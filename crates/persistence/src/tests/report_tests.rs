// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    create_test_actor, create_test_cause, open_stored_case, setup_with_organization,
    store_template,
};
use crate::{PersistedChange, Persistence, PersistenceError};
use casebook::{
    CaseFile, ExportFormat, PageLayout, RenderedReport, ReportData, ReportExport, ReportExported,
    ReportGenerated, ReportInstance, export_instance, generate_instance, render_report,
};
use casebook_domain::{Organization, ReportTemplate, TemplateCustomization};
use diesel::RunQueryDsl;
use time::macros::{date, datetime};

/// Renders, generates and stores a report for a fresh case.
fn stored_report() -> (Persistence, Organization, ReportGenerated, i64) {
    let (mut persistence, organization) = setup_with_organization();
    let organization_id: i64 = organization.organization_id.unwrap();
    let case_file: CaseFile = open_stored_case(&mut persistence, &organization);
    let template: ReportTemplate = store_template(&mut persistence, organization_id);

    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.show_cover_page = Some(false);

    let data: ReportData<'_> = ReportData {
        organization: &organization,
        case: &case_file.case,
        subjects: &case_file.subjects,
        updates: &case_file.updates,
        activities: &case_file.activities,
        report_date: date!(2026 - 04 - 01),
        report_title: "Status Report",
    };
    let rendered: RenderedReport =
        render_report(&template, &customization, &data, &PageLayout::letter()).unwrap();
    let generated: ReportGenerated = generate_instance(
        rendered,
        &case_file.case.case_number,
        template.template_id.unwrap(),
        customization,
        datetime!(2026-04-01 12:00 UTC),
        create_test_actor(),
        create_test_cause(),
    );

    let change: PersistedChange = persistence
        .insert_report_instance(organization_id, &generated)
        .unwrap();
    let instance_id: i64 = change.record_id.unwrap();
    (persistence, organization, generated, instance_id)
}

#[test]
fn test_report_instance_round_trip() {
    let (mut persistence, _, generated, instance_id) = stored_report();

    let loaded: ReportInstance = persistence.get_report_instance(instance_id).unwrap();

    assert_eq!(loaded.instance_id, Some(instance_id));
    assert_eq!(loaded.case_number, "CASE-00001");
    assert_eq!(loaded.html, generated.instance.html);
    assert_eq!(loaded.pages, generated.instance.pages);
    assert_eq!(loaded.customization, generated.instance.customization);
    assert_eq!(loaded.generated_at, generated.instance.generated_at);
    assert!(loaded.verify_integrity().is_ok());
}

#[test]
fn test_report_instances_cannot_be_updated() {
    let (mut persistence, _, _, instance_id) = stored_report();

    let result = diesel::sql_query(format!(
        "UPDATE report_instances SET html = 'tampered' WHERE instance_id = {instance_id}"
    ))
    .execute(&mut persistence.conn);

    assert!(result.is_err());
    assert!(
        persistence
            .get_report_instance(instance_id)
            .unwrap()
            .verify_integrity()
            .is_ok()
    );
}

#[test]
fn test_exports_are_recorded_separately() {
    let (mut persistence, _, generated, instance_id) = stored_report();
    let instance: ReportInstance = persistence.get_report_instance(instance_id).unwrap();

    for format in [ExportFormat::Pdf, ExportFormat::Doc] {
        let exported: ReportExported = export_instance(
            &instance,
            format,
            datetime!(2026-04-02 08:00 UTC),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
        persistence.record_report_export(&exported).unwrap();
    }

    let exports: Vec<ReportExport> = persistence.list_report_exports(instance_id).unwrap();
    let formats: Vec<ExportFormat> = exports.iter().map(|e| e.format).collect();
    assert_eq!(formats, vec![ExportFormat::Pdf, ExportFormat::Doc]);
    assert_eq!(exports[0].exported_by, "manager-1");

    // Exporting left the instance untouched.
    let reloaded: ReportInstance = persistence.get_report_instance(instance_id).unwrap();
    assert_eq!(reloaded.content_hash, generated.instance.content_hash);
}

#[test]
fn test_list_reports_for_case() {
    let (mut persistence, organization, _, instance_id) = stored_report();
    let organization_id: i64 = organization.organization_id.unwrap();

    let instances: Vec<ReportInstance> = persistence
        .list_report_instances(organization_id, "CASE-00001")
        .unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id, Some(instance_id));
}

#[test]
fn test_unknown_report_is_not_found() {
    let (mut persistence, _, _, instance_id) = stored_report();

    assert_eq!(
        persistence.get_report_instance(instance_id + 1),
        Err(PersistenceError::ReportNotFound(instance_id + 1))
    );
}
