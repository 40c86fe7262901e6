// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Casebook.
//!
//! This crate stores organizations, cases and their records, report
//! templates, generated report instances, exports and the audit log in
//! `SQLite` through Diesel. Migrations are embedded and applied when a
//! connection is opened.
//!
//! ## Transactions
//!
//! Every state change is written together with its audit event inside one
//! transaction. A case transition also rewrites the case's aggregate count
//! columns in that same transaction, so counts never drift from the rows
//! they summarize.
//!
//! ## Report instances
//!
//! Instances are write-once. The schema carries a trigger that aborts any
//! UPDATE against `report_instances`; exports are recorded as rows in
//! `report_exports` instead.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` opens a uniquely named shared-cache
//! in-memory database, so tests never observe each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod conversions;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

use casebook::{
    CaseFile, OpenCaseResult, ReportExport, ReportExported, ReportGenerated, ReportInstance,
    TemplateCreated, TemplateTransition, TransitionResult,
};
use casebook_audit::AuditEvent;
use casebook_domain::{Case, CaseNumber, Organization, ReportTemplate};
use diesel::{Connection, SqliteConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

pub use error::PersistenceError;

/// Counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Ids assigned when a state change was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedChange {
    /// The audit event recording the change.
    pub event_id: i64,
    /// The row the change created, when it created one.
    pub record_id: Option<i64>,
}

/// Database adapter for Casebook.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence instance with an in-memory `SQLite` database.
    ///
    /// Each call gets its own database, even when called concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&db_name)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence instance backed by a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database
    /// cannot be initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Database path is not valid UTF-8".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened file-backed database");
        Ok(Self { conn })
    }

    /// Re-checks that foreign keys are enforced on the open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ---- organizations ----------------------------------------------------

    /// Stores a new organization and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_organization(
        &mut self,
        organization: &Organization,
    ) -> Result<i64, PersistenceError> {
        mutations::insert_organization(&mut self.conn, organization)
    }

    /// # Errors
    ///
    /// Returns `OrganizationNotFound` if no organization has this id.
    pub fn get_organization(
        &mut self,
        organization_id: i64,
    ) -> Result<Organization, PersistenceError> {
        queries::get_organization(&mut self.conn, organization_id)
    }

    // ---- case numbers -----------------------------------------------------

    /// Atomically reserves the organization's next case number.
    ///
    /// Runs in an immediate transaction so concurrent writers serialize on
    /// the counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization does not exist or the
    /// transaction fails.
    pub fn allocate_case_number(
        &mut self,
        organization_id: i64,
    ) -> Result<CaseNumber, PersistenceError> {
        self.conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
            mutations::allocate_case_number(conn, organization_id)
        })
    }

    /// Lists every case number the organization has issued.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_case_numbers(
        &mut self,
        organization_id: i64,
    ) -> Result<Vec<String>, PersistenceError> {
        queries::list_case_numbers(&mut self.conn, organization_id)
    }

    // ---- cases ------------------------------------------------------------

    /// Writes a newly opened case and its audit event.
    ///
    /// `record_id` in the result is the new case's id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCaseNumber` if the number is taken, or an error if
    /// the transaction fails.
    pub fn persist_opened_case(
        &mut self,
        result: &OpenCaseResult,
    ) -> Result<PersistedChange, PersistenceError> {
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let case_id: i64 = mutations::insert_case(conn, &result.case_file.case)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &result.audit_event)?;
            info!(
                event_id,
                case_id,
                case_number = %result.case_file.case.case_number,
                "Opened case"
            );
            Ok(PersistedChange {
                event_id,
                record_id: Some(case_id),
            })
        })
    }

    /// Writes a case transition: the new record (if any), the rewritten case
    /// row with its counts, and the audit event.
    ///
    /// # Errors
    ///
    /// Returns `CaseNotFound` if the case is not stored, or an error if the
    /// transaction fails.
    pub fn persist_case_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistedChange, PersistenceError> {
        let case: &Case = &result.new_state.case;
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let case_id: i64 = match case.case_id {
                Some(case_id) => case_id,
                None => queries::lookup_case_id(conn, case.organization_id, &case.case_number)?,
            };
            let record_id: Option<i64> =
                mutations::insert_case_record(conn, case_id, &result.change)?;
            mutations::update_case_row(conn, case_id, case)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &result.audit_event)?;

            info!(
                event_id,
                case_id,
                action = %result.audit_event.action.name,
                "Persisted case transition"
            );
            Ok(PersistedChange {
                event_id,
                record_id,
            })
        })
    }

    /// Loads a case and all of its records.
    ///
    /// # Errors
    ///
    /// Returns `CaseNotFound` if the organization has no such case.
    pub fn get_case_file(
        &mut self,
        organization_id: i64,
        case_number: &str,
    ) -> Result<CaseFile, PersistenceError> {
        queries::get_case_file(&mut self.conn, organization_id, case_number)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cases(&mut self, organization_id: i64) -> Result<Vec<Case>, PersistenceError> {
        queries::list_cases(&mut self.conn, organization_id)
    }

    // ---- templates --------------------------------------------------------

    /// Writes a new template, its sections and its audit event.
    ///
    /// `record_id` in the result is the template id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTemplateName` if the name is taken, or an error if
    /// the transaction fails.
    pub fn persist_new_template(
        &mut self,
        created: &TemplateCreated,
    ) -> Result<PersistedChange, PersistenceError> {
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let template_id: i64 = mutations::insert_template(conn, &created.template)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &created.audit_event)?;
            info!(event_id, template_id, name = %created.template.name, "Created template");
            Ok(PersistedChange {
                event_id,
                record_id: Some(template_id),
            })
        })
    }

    /// Writes an authoring change to a stored template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if the template has no id or is not
    /// stored, or an error if the transaction fails.
    pub fn persist_template_transition(
        &mut self,
        transition: &TemplateTransition,
    ) -> Result<PersistedChange, PersistenceError> {
        let template: &ReportTemplate = &transition.new_template;
        let template_id: i64 = template.template_id.ok_or_else(|| {
            PersistenceError::NotFound(format!("Template '{}' has no id", template.name))
        })?;

        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            // Confirms the row exists before rewriting its sections.
            queries::get_template(conn, template_id)?;
            mutations::update_template_row(conn, template_id, template)?;
            mutations::sync_sections(conn, template_id, &template.sections)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &transition.audit_event)?;

            info!(
                event_id,
                template_id,
                action = %transition.audit_event.action.name,
                reordered = transition.order_changes.len(),
                "Persisted template transition"
            );
            Ok(PersistedChange {
                event_id,
                record_id: None,
            })
        })
    }

    /// # Errors
    ///
    /// Returns `TemplateNotFound` if no template has this id.
    pub fn get_template(&mut self, template_id: i64) -> Result<ReportTemplate, PersistenceError> {
        queries::get_template(&mut self.conn, template_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_templates(
        &mut self,
        organization_id: i64,
    ) -> Result<Vec<ReportTemplate>, PersistenceError> {
        queries::list_templates(&mut self.conn, organization_id)
    }

    // ---- reports ----------------------------------------------------------

    /// Stores a generated report instance and its audit event.
    ///
    /// `record_id` in the result is the instance id.
    ///
    /// # Errors
    ///
    /// Returns `CaseNotFound` if the instance's case is not stored in the
    /// organization, or an error if the transaction fails.
    pub fn insert_report_instance(
        &mut self,
        organization_id: i64,
        generated: &ReportGenerated,
    ) -> Result<PersistedChange, PersistenceError> {
        let instance: &ReportInstance = &generated.instance;
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let case_id: i64 =
                queries::lookup_case_id(conn, organization_id, &instance.case_number)?;
            let instance_id: i64 = mutations::insert_report_instance(conn, case_id, instance)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &generated.audit_event)?;
            info!(event_id, instance_id, case_id, "Stored report instance");
            Ok(PersistedChange {
                event_id,
                record_id: Some(instance_id),
            })
        })
    }

    /// # Errors
    ///
    /// Returns `ReportNotFound` if no instance has this id.
    pub fn get_report_instance(
        &mut self,
        instance_id: i64,
    ) -> Result<ReportInstance, PersistenceError> {
        queries::get_report_instance(&mut self.conn, instance_id)
    }

    /// Lists the report instances generated for a case.
    ///
    /// # Errors
    ///
    /// Returns `CaseNotFound` if the organization has no such case.
    pub fn list_report_instances(
        &mut self,
        organization_id: i64,
        case_number: &str,
    ) -> Result<Vec<ReportInstance>, PersistenceError> {
        let case_id: i64 = queries::lookup_case_id(&mut self.conn, organization_id, case_number)?;
        queries::list_report_instances(&mut self.conn, case_id)
    }

    /// Records an export of a stored instance with its audit event.
    ///
    /// `record_id` in the result is the export id.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn record_report_export(
        &mut self,
        exported: &ReportExported,
    ) -> Result<PersistedChange, PersistenceError> {
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let export_id: i64 = mutations::insert_report_export(conn, &exported.export)?;
            let event_id: i64 = mutations::persist_audit_event(conn, &exported.audit_event)?;
            info!(
                event_id,
                export_id,
                instance_id = exported.export.instance_id,
                format = exported.export.format.as_str(),
                "Recorded report export"
            );
            Ok(PersistedChange {
                event_id,
                record_id: Some(export_id),
            })
        })
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_report_exports(
        &mut self,
        instance_id: i64,
    ) -> Result<Vec<ReportExport>, PersistenceError> {
        queries::list_report_exports(&mut self.conn, instance_id)
    }

    // ---- audit ------------------------------------------------------------

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::persist_audit_event(&mut self.conn, event)
    }

    /// # Errors
    ///
    /// Returns `EventNotFound` if no event has this id.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists audit events oldest first, optionally for one case only.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decoding fails.
    pub fn list_audit_events(
        &mut self,
        case_number: Option<&str>,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::list_audit_events(&mut self.conn, case_number)
    }
}
