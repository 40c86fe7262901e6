// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_audit::{AuditEvent, StateSnapshot};
use casebook_domain::{
    Attachment, Case, CaseActivity, CaseStatus, CaseUpdate, DisplayOrderChange, ReportTemplate,
    Subject,
};
use time::Date;

/// A case together with all of its records.
///
/// This is the aggregate that case commands operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFile {
    /// The case row.
    pub case: Case,
    /// Subjects and clients, in the order they were added.
    pub subjects: Vec<Subject>,
    /// Updates, in the order they were recorded.
    pub updates: Vec<CaseUpdate>,
    /// Activities, in the order they were recorded.
    pub activities: Vec<CaseActivity>,
    /// Attachment metadata.
    pub attachments: Vec<Attachment>,
}

impl CaseFile {
    /// Creates a case file with no records.
    #[must_use]
    pub const fn new(case: Case) -> Self {
        Self {
            case,
            subjects: Vec::new(),
            updates: Vec::new(),
            activities: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Returns the primary subject, if one is designated.
    #[must_use]
    pub fn primary_subject(&self) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.is_primary)
    }

    /// Converts the case to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "case_number={},status={},title={},subjects={},updates={},events={},attachments={}",
            self.case.case_number,
            self.case.status,
            self.case.title,
            self.case.counts.subjects,
            self.case.counts.updates,
            self.case.counts.events,
            self.case.counts.attachments
        ))
    }
}

/// The row-level change a case transition produced.
///
/// Persistence uses this to write exactly the affected rows; the case row
/// itself (title, status, due date, counts) is always rewritten from the new
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseChange {
    /// A subject was attached. When it is primary, earlier primaries were demoted.
    SubjectAdded(Subject),
    /// An update was recorded.
    UpdateRecorded(CaseUpdate),
    /// An activity was recorded.
    ActivityRecorded(CaseActivity),
    /// An attachment was registered.
    AttachmentRegistered(Attachment),
    /// The status changed.
    StatusChanged {
        /// Previous status.
        from: CaseStatus,
        /// New status.
        to: CaseStatus,
    },
    /// The title was set manually.
    TitleChanged(String),
    /// The due date was set or cleared.
    DueDateChanged(Option<Date>),
}

/// The result of opening a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCaseResult {
    /// The newly opened case with no records.
    pub case_file: CaseFile,
    /// The audit event recording the opening.
    pub audit_event: AuditEvent,
}

/// The result of a successful case transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new case state after the transition.
    pub new_state: CaseFile,
    /// The row-level change.
    pub change: CaseChange,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of creating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCreated {
    /// The validated template, with contiguous display orders.
    pub template: ReportTemplate,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}

/// The result of a template authoring command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTransition {
    /// The template after the command.
    pub new_template: ReportTemplate,
    /// Sections whose stored rank changed.
    pub order_changes: Vec<DisplayOrderChange>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
