// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Immutable report instances.
//!
//! A generated report is frozen together with the customization that
//! produced it and a SHA-256 digest over its HTML, its page geometry and
//! its laid-out pages. Exports are drawn from the pages, so the digest
//! seals exactly what an export reproduces. Exports are recorded as
//! separate rows and never modify the instance.

use crate::report::RenderedReport;
use crate::report::error::ReportError;
use crate::report::export::{ExportFormat, ExportedDocument, export_pages, file_stem};
use crate::report::layout::{Page, PageLayout};
use casebook_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use casebook_domain::TemplateCustomization;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Computes the hex SHA-256 digest sealing a generated report.
///
/// Every field is length-prefixed so that no two distinct reports share an
/// encoding.
#[must_use]
pub fn content_hash(html: &str, layout: &PageLayout, pages: &[Page]) -> String {
    let mut hasher = Sha256::new();
    hash_str(&mut hasher, html);

    for value in [
        layout.page_width_pt,
        layout.page_height_pt,
        layout.margin_pt,
        layout.font_size_pt,
        layout.line_height_pt,
        pages.len(),
    ] {
        hash_usize(&mut hasher, value);
    }

    for page in pages {
        hash_usize(&mut hasher, page.number);
        hasher.update([u8::from(page.is_cover)]);
        hash_opt_str(&mut hasher, page.header.as_deref());
        hash_opt_str(&mut hasher, page.footer.as_deref());
        hash_usize(&mut hasher, page.lines.len());
        for line in &page.lines {
            hash_str(&mut hasher, line.style.css_class());
            hash_str(&mut hasher, &line.text);
            hash_opt_str(&mut hasher, line.label.as_deref());
        }
    }

    hex::encode(hasher.finalize())
}

fn hash_usize(hasher: &mut Sha256, value: usize) {
    hasher.update(u64::try_from(value).unwrap_or(u64::MAX).to_le_bytes());
}

fn hash_str(hasher: &mut Sha256, value: &str) {
    hash_usize(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn hash_opt_str(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(text) => {
            hasher.update([1_u8]);
            hash_str(hasher, text);
        }
        None => hasher.update([0_u8]),
    }
}

/// A generated, immutable report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInstance {
    /// The canonical identifier assigned by the database.
    pub instance_id: Option<i64>,
    pub case_number: String,
    pub template_id: i64,
    pub title: String,
    pub html: String,
    pub content_hash: String,
    /// The customization the report was generated with.
    pub customization: TemplateCustomization,
    pub layout: PageLayout,
    /// The laid-out pages, so exports reproduce the generated document.
    pub pages: Vec<Page>,
    pub generated_by: String,
    pub generated_at: OffsetDateTime,
}

impl ReportInstance {
    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Recomputes the content hash and compares it with the stored one.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::IntegrityMismatch` if the HTML, the layout or
    /// any page was altered.
    pub fn verify_integrity(&self) -> Result<(), ReportError> {
        let computed: String = content_hash(&self.html, &self.layout, &self.pages);
        if computed == self.content_hash {
            Ok(())
        } else {
            Err(ReportError::IntegrityMismatch {
                stored: self.content_hash.clone(),
                computed,
            })
        }
    }

    /// Exports the stored pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance fails its integrity check.
    pub fn export(&self, format: ExportFormat) -> Result<ExportedDocument, ReportError> {
        self.verify_integrity()?;
        Ok(export_pages(
            &self.title,
            &file_stem(&self.case_number, &self.title),
            &self.pages,
            &self.layout,
            format,
        ))
    }

    fn scope(&self) -> AuditScope {
        AuditScope::Report {
            case_number: self.case_number.clone(),
            content_hash: self.content_hash.clone(),
        }
    }
}

/// A recorded export of a report instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub export_id: Option<i64>,
    pub instance_id: i64,
    pub format: ExportFormat,
    pub exported_by: String,
    pub exported_at: OffsetDateTime,
}

/// The result of freezing a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGenerated {
    pub instance: ReportInstance,
    pub audit_event: AuditEvent,
}

/// The result of exporting a report instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExported {
    pub document: ExportedDocument,
    pub export: ReportExport,
    pub audit_event: AuditEvent,
}

/// Freezes a rendered report into an immutable instance.
#[must_use]
pub fn generate_instance(
    rendered: RenderedReport,
    case_number: &str,
    template_id: i64,
    customization: TemplateCustomization,
    generated_at: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> ReportGenerated {
    let hash: String = content_hash(&rendered.html, &rendered.layout, &rendered.pages);
    let instance: ReportInstance = ReportInstance {
        instance_id: None,
        case_number: case_number.to_string(),
        template_id,
        title: rendered.title,
        html: rendered.html,
        content_hash: hash,
        customization,
        layout: rendered.layout,
        pages: rendered.pages,
        generated_by: actor.id.clone(),
        generated_at,
    };

    let action: Action = Action::new(
        String::from("GenerateReport"),
        Some(format!(
            "Generated '{}' ({} pages) from template {template_id}",
            instance.title,
            instance.page_count()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        StateSnapshot::new(format!(
            "content_hash={},pages={}",
            instance.content_hash,
            instance.page_count()
        )),
        instance.scope(),
    );

    ReportGenerated {
        instance,
        audit_event,
    }
}

/// Exports a persisted instance and records the export.
///
/// # Errors
///
/// Returns an error if the instance is unpersisted or fails its integrity check.
pub fn export_instance(
    instance: &ReportInstance,
    format: ExportFormat,
    exported_at: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<ReportExported, ReportError> {
    let instance_id: i64 = instance.instance_id.ok_or(ReportError::NotPersisted)?;
    let document: ExportedDocument = instance.export(format)?;

    let export: ReportExport = ReportExport {
        export_id: None,
        instance_id,
        format,
        exported_by: actor.id.clone(),
        exported_at,
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("ExportReport"),
            Some(format!("Exported {} as {format}", document.file_name)),
        ),
        StateSnapshot::new(format!("content_hash={}", instance.content_hash)),
        StateSnapshot::new(format!("content_hash={}", instance.content_hash)),
        instance.scope(),
    );

    Ok(ReportExported {
        document,
        export,
        audit_event,
    })
}
