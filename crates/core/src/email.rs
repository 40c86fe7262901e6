// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case email composition.
//!
//! Email templates use the same placeholder vocabulary as reports. The
//! subject line is plain text; the body is HTML, so substituted values are
//! escaped before they are inserted.

use crate::report::escape_html;
use casebook_domain::{VariableMap, substitute_placeholders};

/// A composed email, ready to hand to a mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub html_body: String,
}

/// Inserts a signature before `</body>`, or appends it when the body has no
/// closing body tag.
#[must_use]
pub fn inject_signature(html_body: &str, signature_html: &str) -> String {
    let lowered: String = html_body.to_ascii_lowercase();
    lowered.rfind("</body>").map_or_else(
        || format!("{html_body}{signature_html}"),
        |position| {
            format!(
                "{}{signature_html}{}",
                &html_body[..position],
                &html_body[position..]
            )
        },
    )
}

/// Fills an email template for a case and attaches the sender's signature.
#[must_use]
pub fn compose_case_email(
    subject_template: &str,
    body_template: &str,
    variables: &VariableMap,
    signature_html: Option<&str>,
) -> ComposedEmail {
    let subject: String = substitute_placeholders(subject_template, variables)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(" ");

    let escaped: VariableMap = variables.map_values(escape_html);
    let body: String = substitute_placeholders(body_template, &escaped);

    let html_body: String = match signature_html {
        Some(signature) if !signature.trim().is_empty() => inject_signature(&body, signature),
        _ => body,
    };

    ComposedEmail { subject, html_body }
}
