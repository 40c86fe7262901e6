// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod email;
mod error;
mod preview;
pub mod report;
mod state;
mod template_ops;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, open_case};
pub use command::{Command, OpenCaseRequest, TemplateCommand};
pub use email::{ComposedEmail, compose_case_email, inject_signature};
pub use error::CoreError;
pub use preview::{Generation, PreviewGenerations};
pub use report::{
    ExportFormat, ExportedDocument, PageLayout, RenderedReport, ReportData, ReportError,
    ReportExport, ReportExported, ReportGenerated, ReportInstance, export_instance,
    generate_instance, render_report,
};
pub use state::{
    CaseChange, CaseFile, OpenCaseResult, TemplateCreated, TemplateTransition, TransitionResult,
};
pub use template_ops::{apply_template, create_template};
