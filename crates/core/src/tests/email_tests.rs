// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ComposedEmail, compose_case_email, inject_signature};
use casebook_domain::{PlaceholderToken, VariableMap};

fn variables() -> VariableMap {
    let mut variables: VariableMap = VariableMap::new();
    variables.set(PlaceholderToken::CaseNumber, "CASE-00001");
    variables.set(PlaceholderToken::PrimarySubject, "O'Brien & Sons <LLC>");
    variables
}

#[test]
fn test_signature_goes_before_closing_body() {
    assert_eq!(
        inject_signature("<html><BODY><p>Hi</p></BODY></html>", "<p>Sam</p>"),
        "<html><BODY><p>Hi</p><p>Sam</p></BODY></html>"
    );
    assert_eq!(inject_signature("<p>Hi</p>", "<p>Sam</p>"), "<p>Hi</p><p>Sam</p>");
}

#[test]
fn test_body_values_are_escaped_and_subject_is_plain() {
    let email: ComposedEmail = compose_case_email(
        "Update on {{case_number}}: {{primary_subject}}",
        "<p>Subject: {{primary_subject}}</p>",
        &variables(),
        None,
    );

    assert_eq!(
        email.subject,
        "Update on CASE-00001: O'Brien & Sons <LLC>"
    );
    assert_eq!(
        email.html_body,
        "<p>Subject: O&#39;Brien &amp; Sons &lt;LLC&gt;</p>"
    );
}

#[test]
fn test_subject_is_single_line() {
    let email: ComposedEmail =
        compose_case_email("Case\n  {{case_number}}\n", "", &variables(), None);

    assert_eq!(email.subject, "Case CASE-00001");
}

#[test]
fn test_signature_is_appended_when_present() {
    let email: ComposedEmail = compose_case_email(
        "{{case_number}}",
        "<body><p>{{case_number}}</p></body>",
        &variables(),
        Some("<p>-- Sam</p>"),
    );
    assert_eq!(
        email.html_body,
        "<body><p>CASE-00001</p><p>-- Sam</p></body>"
    );

    let blank: ComposedEmail =
        compose_case_email("{{case_number}}", "<p>x</p>", &variables(), Some("  "));
    assert_eq!(blank.html_body, "<p>x</p>");
}
