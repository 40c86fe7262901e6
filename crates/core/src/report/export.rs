// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Document export from paginated pages.
//!
//! ## PDF
//!
//! A minimal PDF 1.4 writer: one PDF page per laid-out page, the standard
//! Courier faces with `WinAnsiEncoding`, one text object per row. Courier is
//! monospaced, so a row wrapped to `PageLayout::chars_for` always fits the
//! text area. Row positions come from the same `PageLayout` the preview
//! uses, so page and line breaks are identical to the preview.
//!
//! ## DOC
//!
//! Plain text with a form feed between pages, served as `application/msword`.
//! Word opens it, but styling, tables and fonts are lost.

use crate::report::error::ReportError;
use crate::report::layout::{BULLET_INDENT_CHARS, FIELD_LABEL_CHARS, LineStyle, Page, PageLayout};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A downloadable document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Pdf,
    Doc,
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "doc" | "docx" | "word" => Ok(Self::Doc),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ExportFormat {
    /// Converts this format to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
        }
    }

    /// MIME content type of the exported file.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// An exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Builds a file-system friendly stem from a case number and title.
#[must_use]
pub fn file_stem(case_number: &str, title: &str) -> String {
    let mut stem: String = String::new();
    let mut last_dash: bool = true;
    for c in format!("{case_number} {title}").chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            stem.push('-');
            last_dash = true;
        }
    }
    while stem.ends_with('-') {
        stem.pop();
    }
    if stem.is_empty() {
        stem.push_str("report");
    }
    stem
}

/// Exports pages in the requested format.
#[must_use]
pub fn export_pages(
    title: &str,
    stem: &str,
    pages: &[Page],
    layout: &PageLayout,
    format: ExportFormat,
) -> ExportedDocument {
    let bytes: Vec<u8> = match format {
        ExportFormat::Pdf => export_pdf(title, pages, layout),
        ExportFormat::Doc => export_doc(pages),
    };
    ExportedDocument {
        file_name: format!("{stem}.{}", format.extension()),
        content_type: format.content_type(),
        bytes,
    }
}

/// Encodes text as a PDF literal string body in `WinAnsiEncoding`.
///
/// Characters outside the encoding are replaced with `?`.
fn pdf_string(text: &str) -> String {
    let mut encoded: String = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                encoded.push('\\');
                encoded.push(c);
            }
            ' '..='~' => encoded.push(c),
            '\u{2022}' => encoded.push_str("\\225"),
            '\u{2013}' => encoded.push_str("\\226"),
            '\u{2014}' => encoded.push_str("\\227"),
            '\u{2018}' => encoded.push_str("\\221"),
            '\u{2019}' => encoded.push_str("\\222"),
            '\u{201c}' => encoded.push_str("\\223"),
            '\u{201d}' => encoded.push_str("\\224"),
            '\u{a0}'..='\u{ff}' => {
                encoded.push_str(&format!("\\{:03o}", u32::from(c)));
            }
            _ => encoded.push('?'),
        }
    }
    encoded
}

fn text_op(font: &str, size: usize, x: usize, y: usize, text: &str) -> String {
    format!(
        "BT /{font} {size} Tf {x} {y} Td ({}) Tj ET\n",
        pdf_string(text)
    )
}

/// Baseline of a row, counted from the top margin.
const fn row_baseline(layout: &PageLayout, row: usize) -> usize {
    (layout.page_height_pt - layout.margin_pt + 3).saturating_sub((row + 1) * layout.line_height_pt)
}

fn page_content(page: &Page, layout: &PageLayout) -> String {
    let mut content: String = String::new();
    let left: usize = layout.margin_pt;
    let has_running: bool = page.header.is_some() || page.footer.is_some();
    let first_row: usize = if has_running { 2 } else { 0 };

    if let Some(header) = &page.header {
        content.push_str(&text_op("F1", 8, left, row_baseline(layout, 0), header));
    }

    for (offset, line) in page.lines.iter().enumerate() {
        if line.style == LineStyle::Blank {
            continue;
        }
        let y: usize = row_baseline(layout, first_row + offset);
        let font: &str = if line.style.is_bold() { "F2" } else { "F1" };
        let size: usize = line.style.font_size_pt();

        let text_x: usize = match line.style {
            LineStyle::Field => left + layout.indent_pt(FIELD_LABEL_CHARS),
            LineStyle::Bullet => left + layout.indent_pt(BULLET_INDENT_CHARS),
            _ => left,
        };
        if let Some(label) = &line.label {
            let label_font: &str = if line.style == LineStyle::Field { "F2" } else { "F1" };
            content.push_str(&text_op(label_font, size, left, y, label));
        }
        content.push_str(&text_op(font, size, text_x, y, &line.text));
    }

    if let Some(footer) = &page.footer {
        let row: usize = layout.lines_per_page().saturating_sub(1);
        content.push_str(&text_op("F1", 8, left, row_baseline(layout, row), footer));
    }

    content
}

/// Writes the pages as a PDF document.
#[must_use]
pub fn export_pdf(title: &str, pages: &[Page], layout: &PageLayout) -> Vec<u8> {
    let page_count: usize = pages.len();
    let info_id: usize = 5 + 2 * page_count;

    let kids: String = (0..page_count)
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect::<Vec<String>>()
        .join(" ");

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>".to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    ];

    for (i, page) in pages.iter().enumerate() {
        let content_id: usize = 6 + 2 * i;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>",
                layout.page_width_pt, layout.page_height_pt
            )
            .into_bytes(),
        );

        let stream: String = page_content(page, layout);
        let mut object: Vec<u8> = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        object.extend_from_slice(stream.as_bytes());
        object.extend_from_slice(b"endstream");
        objects.push(object);
    }

    objects.push(format!("<< /Title ({}) /Producer (Casebook) >>", pdf_string(title)).into_bytes());

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets: Vec<usize> = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start: usize = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    out
}

/// Extracts the pages as plain text, one form feed between pages.
#[must_use]
pub fn export_doc(pages: &[Page]) -> Vec<u8> {
    let mut text: String = String::new();

    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            text.push('\x0c');
        }
        if let Some(header) = &page.header {
            text.push_str(header);
            text.push_str("\n\n");
        }
        for line in &page.lines {
            match (&line.label, line.style) {
                (Some(label), LineStyle::Field) => {
                    text.push_str(label);
                    text.push_str(": ");
                }
                (Some(marker), _) => {
                    text.push_str(marker);
                    text.push(' ');
                }
                (None, LineStyle::Field | LineStyle::Bullet) => text.push_str("  "),
                (None, _) => {}
            }
            text.push_str(&line.text);
            text.push('\n');
        }
        if let Some(footer) = &page.footer {
            text.push('\n');
            text.push_str(footer);
            text.push('\n');
        }
    }

    text.into_bytes()
}
