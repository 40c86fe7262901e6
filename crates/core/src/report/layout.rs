// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Page geometry and pagination.
//!
//! `paginate` is the only place page breaks are decided. The HTML preview
//! and every export format draw the pages it returns, so a preview always
//! breaks where the exported document breaks.
//!
//! ## Rules
//!
//! - Text is set in a monospace face and word-wrapped to the number of
//!   glyphs that fit the text area at its line style's size
//! - Headings are never left as the last line of a page
//! - Blocks longer than the remaining space continue on the next page
//! - Blank spacer lines are dropped at the top of a page
//! - The cover page, when present, stands alone and carries no header/footer

use crate::report::blocks::{Block, CoverPage, RunningText};
use crate::report::error::ReportError;
use serde::{Deserialize, Serialize};

/// Advance width of every glyph of the monospace face, in thousandths of an em.
///
/// Courier and Courier-Bold advance 600/1000 em for every character.
pub const GLYPH_ADVANCE_PER_MILLE: usize = 600;

/// Characters reserved for the label column of variable tables.
pub const FIELD_LABEL_CHARS: usize = 20;

/// Characters reserved for bullet markers.
pub const BULLET_INDENT_CHARS: usize = 3;

/// Page geometry in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width_pt: usize,
    pub page_height_pt: usize,
    pub margin_pt: usize,
    /// Body font size.
    pub font_size_pt: usize,
    pub line_height_pt: usize,
}

impl PageLayout {
    /// US letter with 0.75 inch margins and 10pt body text.
    #[must_use]
    pub const fn letter() -> Self {
        Self {
            page_width_pt: 612,
            page_height_pt: 792,
            margin_pt: 54,
            font_size_pt: 10,
            line_height_pt: 14,
        }
    }

    /// Number of text rows on a page.
    #[must_use]
    pub const fn lines_per_page(&self) -> usize {
        self.page_height_pt.saturating_sub(2 * self.margin_pt) / self.line_height_pt
    }

    /// Width of the text area between the side margins.
    #[must_use]
    pub const fn text_width_pt(&self) -> usize {
        self.page_width_pt.saturating_sub(2 * self.margin_pt)
    }

    /// Glyphs that fit the text area at `font_size_pt`.
    #[must_use]
    pub const fn glyphs_per_row(&self, font_size_pt: usize) -> usize {
        let advance: usize = font_size_pt * GLYPH_ADVANCE_PER_MILLE;
        if advance == 0 {
            return 0;
        }
        self.text_width_pt() * 1000 / advance
    }

    /// Horizontal offset of `chars` body glyphs, in points.
    #[must_use]
    pub const fn indent_pt(&self, chars: usize) -> usize {
        chars * self.font_size_pt * GLYPH_ADVANCE_PER_MILLE / 1000
    }

    /// Characters per row at body size.
    #[must_use]
    pub const fn chars_per_line(&self) -> usize {
        self.glyphs_per_row(self.font_size_pt)
    }

    /// Characters per row for a line style, after any label column.
    #[must_use]
    pub const fn chars_for(&self, style: LineStyle) -> usize {
        let full: usize = self.glyphs_per_row(style.font_size_pt());
        let reserved: usize = match style {
            LineStyle::Field => FIELD_LABEL_CHARS,
            LineStyle::Bullet => BULLET_INDENT_CHARS,
            _ => 0,
        };
        let width: usize = full.saturating_sub(reserved);
        if width == 0 { 1 } else { width }
    }

    /// Rows available for body text on a page with running header/footer.
    #[must_use]
    pub const fn body_lines(&self, header_footer: bool) -> usize {
        if header_footer {
            self.lines_per_page().saturating_sub(4)
        } else {
            self.lines_per_page()
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::letter()
    }
}

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    CoverTitle,
    CoverLine,
    Heading,
    EntryHeading,
    Body,
    Field,
    Bullet,
    Meta,
    Note,
    Blank,
}

impl LineStyle {
    /// Font size in points.
    #[must_use]
    pub const fn font_size_pt(&self) -> usize {
        match self {
            Self::CoverTitle => 16,
            Self::Heading => 12,
            Self::Meta => 9,
            Self::CoverLine
            | Self::EntryHeading
            | Self::Body
            | Self::Field
            | Self::Bullet
            | Self::Note
            | Self::Blank => 10,
        }
    }

    /// Whether the line is drawn in the bold face.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        matches!(self, Self::CoverTitle | Self::Heading | Self::EntryHeading)
    }

    /// CSS class used by the HTML preview.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::CoverTitle => "cover-title",
            Self::CoverLine => "cover-line",
            Self::Heading => "heading",
            Self::EntryHeading => "entry-heading",
            Self::Body => "body",
            Self::Field => "field",
            Self::Bullet => "bullet",
            Self::Meta => "meta",
            Self::Note => "note",
            Self::Blank => "blank",
        }
    }

    const fn keeps_with_next(self) -> bool {
        matches!(self, Self::Heading | Self::EntryHeading)
    }
}

/// One row of text on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLine {
    pub style: LineStyle,
    pub text: String,
    /// Left-column text: the label of a table row or a bullet marker.
    /// Only set on the first row of a wrapped field or bullet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PageLine {
    fn new(style: LineStyle, text: String) -> Self {
        Self {
            style,
            text,
            label: None,
        }
    }

    fn blank() -> Self {
        Self::new(LineStyle::Blank, String::new())
    }
}

/// A laid-out page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub is_cover: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub lines: Vec<PageLine>,
}

/// Greedy word wrap to `width` characters.
///
/// Newlines are hard breaks. Words longer than `width` are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width: usize = width.max(1);
    let mut lines: Vec<String> = Vec::new();

    for raw_line in text.lines() {
        let mut current: String = String::new();
        let mut current_len: usize = 0;

        for word in raw_line.split_whitespace() {
            let mut word: &str = word;
            let mut word_len: usize = word.chars().count();

            while word_len > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let split_at: usize = word
                    .char_indices()
                    .nth(width)
                    .map_or(word.len(), |(index, _)| index);
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
                word_len -= width;
            }

            if word_len == 0 {
                continue;
            }
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        if current_len > 0 || raw_line.trim().is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn styled_lines(style: LineStyle, text: &str, layout: &PageLayout) -> Vec<PageLine> {
    wrap_text(text, layout.chars_for(style))
        .into_iter()
        .map(|line| PageLine::new(style, line))
        .collect()
}

fn labelled_lines(
    style: LineStyle,
    label: &str,
    text: &str,
    layout: &PageLayout,
) -> Vec<PageLine> {
    let mut lines: Vec<PageLine> = styled_lines(style, text, layout);
    if let Some(first) = lines.first_mut() {
        first.label = Some(label.to_string());
    }
    lines
}

/// Converts a block into rows, with the spacing that follows it.
fn block_lines(block: &Block, layout: &PageLayout) -> (Vec<PageLine>, bool) {
    match block {
        Block::Heading(text) => (styled_lines(LineStyle::Heading, text, layout), false),
        Block::Paragraph(text) => (styled_lines(LineStyle::Body, text, layout), true),
        Block::Field { label, value } => {
            (labelled_lines(LineStyle::Field, label, value, layout), false)
        }
        Block::Bullet(text) => (
            labelled_lines(LineStyle::Bullet, "\u{2022}", text, layout),
            false,
        ),
        Block::EntryHeading(text) => (styled_lines(LineStyle::EntryHeading, text, layout), false),
        Block::Meta(text) => (styled_lines(LineStyle::Meta, text, layout), false),
        Block::EntryBody(text) => (styled_lines(LineStyle::Body, text, layout), true),
        Block::Note(text) => (styled_lines(LineStyle::Note, text, layout), true),
        Block::Spacer => (Vec::new(), true),
    }
}

struct PageBuilder {
    capacity: usize,
    pages: Vec<Vec<PageLine>>,
    current: Vec<PageLine>,
}

impl PageBuilder {
    const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.current.len())
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
    }

    fn push(&mut self, line: PageLine) {
        if line.style == LineStyle::Blank && self.current.is_empty() {
            return;
        }
        if self.remaining() == 0 {
            self.break_page();
            if line.style == LineStyle::Blank {
                return;
            }
        }
        self.current.push(line);
    }

    fn push_spacer(&mut self) {
        if self
            .current
            .last()
            .is_some_and(|line| line.style != LineStyle::Blank)
        {
            self.push(PageLine::blank());
        }
    }

    fn finish(mut self) -> Vec<Vec<PageLine>> {
        while self
            .current
            .last()
            .is_some_and(|line| line.style == LineStyle::Blank)
        {
            self.current.pop();
        }
        self.break_page();
        self.pages
    }
}

/// Lays out the cover page and body blocks into pages.
///
/// # Errors
///
/// Returns `ReportError::LayoutTooSmall` if a page cannot hold a heading and
/// the line that follows it.
pub fn paginate(
    cover: Option<&CoverPage>,
    blocks: &[Block],
    running: &RunningText,
    layout: &PageLayout,
) -> Result<Vec<Page>, ReportError> {
    let body_capacity: usize = layout.body_lines(running.is_enabled());
    if body_capacity < 2 {
        return Err(ReportError::LayoutTooSmall {
            lines_per_page: layout.lines_per_page(),
        });
    }

    let mut cover_rows: Vec<Vec<PageLine>> = Vec::new();
    if let Some(cover) = cover {
        let mut builder: PageBuilder = PageBuilder::new(layout.lines_per_page());
        for line in styled_lines(LineStyle::CoverTitle, &cover.title, layout) {
            builder.push(line);
        }
        builder.push_spacer();
        for text in &cover.lines {
            for line in styled_lines(LineStyle::CoverLine, text, layout) {
                builder.push(line);
            }
        }
        cover_rows = builder.finish();
    }

    let mut builder: PageBuilder = PageBuilder::new(body_capacity);
    for block in blocks {
        let (lines, spaced_after) = block_lines(block, layout);

        if lines.first().is_some_and(|l| l.style.keeps_with_next()) {
            if lines.first().is_some_and(|l| l.style == LineStyle::Heading) {
                builder.push_spacer();
            }
            // Rule: a heading needs room for itself plus the next row
            let needed: usize = lines.len() + 1;
            if builder.remaining() < needed && !builder.current.is_empty() {
                builder.break_page();
            }
        }

        for line in lines {
            builder.push(line);
        }
        if spaced_after {
            builder.push_spacer();
        }
    }
    let body_rows: Vec<Vec<PageLine>> = builder.finish();

    let total: usize = cover_rows.len() + body_rows.len().max(1);
    let mut pages: Vec<Page> = Vec::with_capacity(total);

    for lines in cover_rows {
        pages.push(Page {
            number: pages.len() + 1,
            is_cover: true,
            header: None,
            footer: None,
            lines,
        });
    }

    let body_rows: Vec<Vec<PageLine>> = if body_rows.is_empty() {
        vec![Vec::new()]
    } else {
        body_rows
    };
    for lines in body_rows {
        let number: usize = pages.len() + 1;
        pages.push(Page {
            number,
            is_cover: false,
            header: running.header.clone(),
            footer: running.footer_for(number, total),
            lines,
        });
    }

    Ok(pages)
}
