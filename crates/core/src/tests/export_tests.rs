// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_case_file, create_test_organization, create_test_template, report_data, update,
};
use crate::CaseFile;
use crate::report::{
    ExportFormat, ExportedDocument, PageLayout, RenderedReport, ReportError, export_doc, file_stem,
    render_report,
};
use casebook_domain::{Organization, TemplateCustomization};
use time::Duration;
use time::macros::datetime;

/// A report with enough updates to span several body pages.
fn render_long_report(title: &str) -> RenderedReport {
    let organization: Organization = create_test_organization();
    let mut case_file: CaseFile = create_test_case_file();
    case_file.updates = (0..30)
        .map(|day| {
            update(
                "Surveillance",
                &format!("Day {}", day + 1),
                datetime!(2026-03-06 09:00 UTC) + Duration::days(day),
            )
        })
        .collect();

    render_report(
        &create_test_template(),
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, title),
        &PageLayout::letter(),
    )
    .unwrap()
}

#[test]
fn test_export_format_parsing() {
    assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
    assert_eq!("docx".parse::<ExportFormat>(), Ok(ExportFormat::Doc));
    assert_eq!(
        "odt".parse::<ExportFormat>(),
        Err(ReportError::UnsupportedFormat(String::from("odt")))
    );
    assert_eq!(ExportFormat::Doc.content_type(), "application/msword");
}

#[test]
fn test_file_stem() {
    assert_eq!(
        file_stem("CASE-00001", "Surveillance Report"),
        "case-00001-surveillance-report"
    );
    assert_eq!(file_stem("", "***"), "report");
}

#[test]
fn test_pdf_has_one_page_per_preview_page() {
    let rendered: RenderedReport = render_long_report("Surveillance Report");
    assert!(rendered.page_count() > 2);

    let document: ExportedDocument = rendered.export("CASE-00001", ExportFormat::Pdf);
    let pdf: String = String::from_utf8_lossy(&document.bytes).into_owned();

    assert_eq!(document.file_name, "case-00001-surveillance-report.pdf");
    assert_eq!(document.content_type, "application/pdf");
    assert!(document.bytes.starts_with(b"%PDF-1.4\n"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
    assert!(pdf.contains(&format!("/Count {}", rendered.page_count())));
    assert_eq!(
        pdf.matches("/Type /Page /Parent").count(),
        rendered.page_count()
    );
}

#[test]
fn test_pdf_draws_preview_lines() {
    let rendered: RenderedReport = render_long_report("Smith (2026)");
    let pdf: String =
        String::from_utf8_lossy(&rendered.export("CASE-00001", ExportFormat::Pdf).bytes)
            .into_owned();

    assert!(pdf.contains("/Title (Smith \\(2026\\))"));
    assert!(pdf.contains("(Day 30 \\(Surveillance\\)) Tj"));
    // Table labels in the bold face at the margin, values after the label column.
    assert!(pdf.contains("/F2 10 Tf 54 "));
    assert!(pdf.contains("Tf 174 "));
    assert!(pdf.contains("/BaseFont /Courier "));
    assert!(!pdf.contains("Helvetica"));

    let last = rendered.pages.last().unwrap();
    let footer: &str = last.footer.as_deref().unwrap();
    assert!(pdf.contains(&format!("({footer}) Tj")));
}

#[test]
fn test_doc_separates_pages_with_form_feeds() {
    let rendered: RenderedReport = render_long_report("Surveillance Report");
    let document: ExportedDocument = rendered.export("CASE-00001", ExportFormat::Doc);
    let text: String = String::from_utf8(document.bytes).unwrap();

    assert_eq!(document.file_name, "case-00001-surveillance-report.doc");
    assert_eq!(
        text.matches('\x0c').count(),
        rendered.page_count() - 1
    );
    assert!(text.contains("Case Number: CASE-00001"));
    assert!(text.contains("Case Manager: Sam Rivera"));
}

#[test]
fn test_doc_matches_page_text() {
    let rendered: RenderedReport = render_long_report("Surveillance Report");
    let text: String = String::from_utf8(export_doc(&rendered.pages)).unwrap();

    for (page, chunk) in rendered.pages.iter().zip(text.split('\x0c')) {
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            assert!(chunk.contains(&line.text), "missing '{}'", line.text);
        }
    }
}
