// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side operations.
//!
//! Functions here take a borrowed connection and never open their own
//! transactions; the `Persistence` adapter decides the transaction
//! boundaries so a row change and its audit event commit together.

pub mod audit;
pub mod cases;
pub mod organizations;
pub mod reports;
pub mod templates;

pub use audit::persist_audit_event;
pub use cases::{allocate_case_number, insert_case, insert_case_record, update_case_row};
pub use organizations::insert_organization;
pub use reports::{insert_report_export, insert_report_instance};
pub use templates::{insert_template, sync_sections, update_template_row};
