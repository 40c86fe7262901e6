// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTML preview rendering.
//!
//! The preview draws the paginated pages line for line. Values are escaped
//! after substitution so author text and case data cannot inject markup.

use crate::report::layout::{BULLET_INDENT_CHARS, FIELD_LABEL_CHARS, LineStyle, Page, PageLayout};
use std::fmt::Write;

/// Escapes text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped: String = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn stylesheet(layout: &PageLayout) -> String {
    format!(
        "body{{background:#e5e5e5;margin:0;font-family:\"Courier New\",Courier,monospace}}\
         .page{{background:#fff;width:{w}pt;height:{h}pt;margin:12pt auto;padding:{m}pt;\
         box-sizing:border-box;position:relative;font-size:{fs}pt;line-height:{lh}pt}}\
         .line{{margin:0;height:{lh}pt;white-space:pre}}\
         .cover-title{{font-size:16pt;font-weight:bold}}\
         .heading{{font-size:12pt;font-weight:bold}}\
         .entry-heading{{font-weight:bold}}\
         .meta{{font-size:9pt;color:#555}}\
         .note{{font-style:italic;color:#555}}\
         .label{{display:inline-block;width:{label}pt;font-weight:bold}}\
         .marker{{display:inline-block;width:{marker}pt}}\
         .running-header,.running-footer{{font-size:8pt;color:#555;height:{lh2}pt}}",
        w = layout.page_width_pt,
        h = layout.page_height_pt,
        m = layout.margin_pt,
        fs = layout.font_size_pt,
        lh = layout.line_height_pt,
        lh2 = layout.line_height_pt * 2,
        label = layout.indent_pt(FIELD_LABEL_CHARS),
        marker = layout.indent_pt(BULLET_INDENT_CHARS),
    )
}

/// Renders paginated pages as a standalone HTML document.
///
/// Each page becomes one `<section class="page">` element.
#[must_use]
pub fn render_html(title: &str, pages: &[Page], layout: &PageLayout) -> String {
    let mut html: String = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(title),
        stylesheet(layout)
    );

    for page in pages {
        let class: &str = if page.is_cover { "page cover" } else { "page" };
        let _ = writeln!(
            html,
            "<section class=\"{class}\" data-page=\"{}\">",
            page.number
        );
        if let Some(header) = &page.header {
            let _ = writeln!(
                html,
                "<header class=\"running-header\">{}</header>",
                escape_html(header)
            );
        }
        html.push_str("<div class=\"page-body\">\n");
        for line in &page.lines {
            let _ = write!(html, "<p class=\"line {}\">", line.style.css_class());
            if let Some(label) = &line.label {
                let label_class: &str = if line.style == LineStyle::Bullet {
                    "marker"
                } else {
                    "label"
                };
                let _ = write!(
                    html,
                    "<span class=\"{label_class}\">{}</span>",
                    escape_html(label)
                );
            }
            let _ = writeln!(html, "{}</p>", escape_html(&line.text));
        }
        html.push_str("</div>\n");
        if let Some(footer) = &page.footer {
            let _ = writeln!(
                html,
                "<footer class=\"running-footer\">{}</footer>",
                escape_html(footer)
            );
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
