// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report rendering pipeline.
//!
//! template + customization → merged template → blocks → pages → HTML / PDF / DOC

mod blocks;
mod error;
mod export;
mod html;
mod instance;
mod layout;

pub use blocks::{
    Block, CoverPage, ReportData, RunningText, build_blocks, build_cover, build_running_text,
};
pub use error::ReportError;
pub use export::{
    ExportFormat, ExportedDocument, export_doc, export_pages, export_pdf, file_stem,
};
pub use html::{escape_html, render_html};
pub use instance::{
    ReportExport, ReportExported, ReportGenerated, ReportInstance, content_hash, export_instance,
    generate_instance,
};
pub use layout::{
    GLYPH_ADVANCE_PER_MILLE, LineStyle, Page, PageLayout, PageLine, paginate, wrap_text,
};

use casebook_domain::{ReportTemplate, TemplateCustomization, VariableMap, merge_customization};

/// A rendered report: the laid-out pages and the HTML drawn from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub title: String,
    pub layout: PageLayout,
    pub pages: Vec<Page>,
    pub html: String,
}

impl RenderedReport {
    /// Number of pages, including the cover page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Exports the rendered pages.
    #[must_use]
    pub fn export(&self, case_number: &str, format: ExportFormat) -> ExportedDocument {
        export_pages(
            &self.title,
            &file_stem(case_number, &self.title),
            &self.pages,
            &self.layout,
            format,
        )
    }
}

/// Renders a report from a stored template and a per-report customization.
///
/// The stored template is not modified. Every text fragment is filled from
/// one variable map computed from `data`.
///
/// # Errors
///
/// Returns an error if:
/// - The customization references sections outside the template
/// - The layout is too small to hold body text
pub fn render_report(
    template: &ReportTemplate,
    customization: &TemplateCustomization,
    data: &ReportData<'_>,
    layout: &PageLayout,
) -> Result<RenderedReport, ReportError> {
    let merged: ReportTemplate = merge_customization(template, customization)?;
    let variables: VariableMap = data.variables();

    let blocks: Vec<Block> = build_blocks(&merged, data, &variables);
    let cover: Option<CoverPage> = merged
        .show_cover_page
        .then(|| build_cover(&merged, &variables));
    let running: RunningText = if merged.show_header_footer {
        build_running_text(&merged, &variables)
    } else {
        RunningText::disabled()
    };

    let pages: Vec<Page> = paginate(cover.as_ref(), &blocks, &running, layout)?;
    let title: String = data.report_title.to_string();
    let html: String = render_html(&title, &pages, layout);

    Ok(RenderedReport {
        title,
        layout: *layout,
        pages,
        html,
    })
}
