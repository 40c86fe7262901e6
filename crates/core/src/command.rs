// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_domain::{
    Attachment, CaseActivity, CaseStatus, CaseUpdate, SectionBody, Subject,
};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// The fields supplied when opening a new case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenCaseRequest {
    /// Case title. When absent the case is auto-titled from its primary subject.
    pub title: Option<String>,
    /// Free-form case type.
    pub case_type: String,
    /// Linked account.
    pub account_name: Option<String>,
    /// Linked contact.
    pub contact_name: Option<String>,
    /// Case manager.
    pub manager_name: Option<String>,
    /// Optional due date.
    pub due_date: Option<Date>,
}

/// A command represents user or system intent against one case, as data only.
///
/// Commands are the only way to request case state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Attach a subject or client to the case.
    AddSubject {
        /// The subject to attach.
        subject: Subject,
    },
    /// Record a narrative update.
    RecordUpdate {
        /// The update to record.
        update: CaseUpdate,
    },
    /// Record a dated activity.
    RecordActivity {
        /// The activity to record.
        activity: CaseActivity,
    },
    /// Register attachment metadata.
    RegisterAttachment {
        /// The attachment metadata.
        attachment: Attachment,
    },
    /// Move the case to another status.
    ChangeStatus {
        /// The requested status.
        status: CaseStatus,
    },
    /// Set the title manually, turning off auto-titling.
    SetTitle {
        /// The new title.
        title: String,
    },
    /// Set or clear the due date.
    SetDueDate {
        /// The new due date.
        due_date: Option<Date>,
    },
}

impl Command {
    /// The action name recorded in the audit trail.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::AddSubject { .. } => "AddSubject",
            Self::RecordUpdate { .. } => "RecordUpdate",
            Self::RecordActivity { .. } => "RecordActivity",
            Self::RegisterAttachment { .. } => "RegisterAttachment",
            Self::ChangeStatus { .. } => "ChangeStatus",
            Self::SetTitle { .. } => "SetTitle",
            Self::SetDueDate { .. } => "SetDueDate",
        }
    }
}

/// A template authoring command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TemplateCommand {
    /// Append a section at the end of the template.
    AddSection {
        /// Section heading.
        title: String,
        /// Section content.
        body: SectionBody,
        /// Default visibility.
        #[serde(default = "default_visible")]
        is_visible: bool,
    },
    /// Change a section's defaults. The section type cannot change.
    UpdateSection {
        /// The section to update.
        section_id: Uuid,
        /// New heading.
        #[serde(default)]
        title: Option<String>,
        /// New default visibility.
        #[serde(default)]
        is_visible: Option<bool>,
        /// New content of the same section type.
        #[serde(default)]
        body: Option<SectionBody>,
    },
    /// Remove a section. Remaining sections are renumbered.
    RemoveSection {
        /// The section to remove.
        section_id: Uuid,
    },
    /// Drag-and-drop reorder.
    MoveSection {
        /// The section being moved.
        section_id: Uuid,
        /// Target position, 0-based, in display order.
        to_index: usize,
    },
    /// Set the template's presentation defaults.
    SetPresentation {
        /// Template description.
        #[serde(default)]
        description: Option<String>,
        /// Cover page heading.
        #[serde(default)]
        cover_title: Option<String>,
        /// Running header text.
        #[serde(default)]
        header_text: Option<String>,
        /// Running footer text.
        #[serde(default)]
        footer_text: Option<String>,
        /// Whether a cover page is generated by default.
        show_cover_page: bool,
        /// Whether header/footer lines are printed by default.
        show_header_footer: bool,
    },
}

const fn default_visible() -> bool {
    true
}

impl TemplateCommand {
    /// The action name recorded in the audit trail.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::AddSection { .. } => "AddSection",
            Self::UpdateSection { .. } => "UpdateSection",
            Self::RemoveSection { .. } => "RemoveSection",
            Self::MoveSection { .. } => "MoveSection",
            Self::SetPresentation { .. } => "SetPresentation",
        }
    }
}
