// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side operations. Rows are decoded back into domain values here.

pub mod audit;
pub mod cases;
pub mod organizations;
pub mod reports;
pub mod templates;

pub use audit::{get_audit_event, list_audit_events};
pub use cases::{get_case_file, list_case_numbers, list_cases, lookup_case_id};
pub use organizations::get_organization;
pub use reports::{get_report_instance, list_report_exports, list_report_instances};
pub use templates::{get_template, list_templates};
