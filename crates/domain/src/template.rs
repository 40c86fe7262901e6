// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report template definitions.
//!
//! A template is an ordered list of typed sections. Each section carries a
//! default title, a default visibility, a stored display order and a
//! type-specific body. Templates are authored once and reused; per-report
//! changes are expressed as a `TemplateCustomization` and merged at render
//! time without touching the stored template.

use crate::error::DomainError;
use crate::variables::PlaceholderToken;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// The kind of content a section produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Author-written text with placeholder tokens.
    StaticText,
    /// A table or list of selected case variables.
    VariableBlock,
    /// Case updates filtered by type.
    UpdateCollection,
    /// Case activities filtered by type.
    EventCollection,
}

impl FromStr for SectionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static_text" => Ok(Self::StaticText),
            "variable_block" => Ok(Self::VariableBlock),
            "update_collection" => Ok(Self::UpdateCollection),
            "event_collection" => Ok(Self::EventCollection),
            _ => Err(DomainError::InvalidSectionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SectionType {
    /// Converts this section type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaticText => "static_text",
            Self::VariableBlock => "variable_block",
            Self::UpdateCollection => "update_collection",
            Self::EventCollection => "event_collection",
        }
    }

    /// Returns whether sections of this type list case records.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::UpdateCollection | Self::EventCollection)
    }
}

/// Timestamp ordering for collection sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(DomainError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// How a variable block lays out its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariableLayout {
    /// Two-column label/value table.
    #[default]
    Table,
    /// Bulleted `label: value` list.
    List,
}

/// Configuration for a variable block section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBlockConfig {
    /// The case variables to show, in order.
    pub variables: Vec<PlaceholderToken>,
    /// Table or list layout.
    #[serde(default)]
    pub layout: VariableLayout,
}

/// Configuration for an update or event collection section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Record types to include. Empty includes every type.
    #[serde(default)]
    pub type_filter: Vec<String>,
    /// Timestamp ordering.
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Maximum number of records to emit.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Whether records already emitted by an earlier section may appear again.
    #[serde(default)]
    pub allow_duplicates: bool,
    /// Whether entry timestamps are printed.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            type_filter: Vec::new(),
            sort_order: SortOrder::Ascending,
            limit: None,
            allow_duplicates: false,
            show_timestamps: true,
        }
    }
}

impl CollectionConfig {
    /// Returns whether a record of the given type passes the type allow-list.
    ///
    /// Matching is case-insensitive.
    #[must_use]
    pub fn includes_type(&self, record_type: &str) -> bool {
        self.type_filter.is_empty()
            || self
                .type_filter
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(record_type))
    }
}

/// Type-specific section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionBody {
    /// Author-written text.
    StaticText {
        /// The text, possibly containing `{{token}}` placeholders.
        content: String,
    },
    /// Selected case variables.
    VariableBlock(VariableBlockConfig),
    /// Case updates.
    UpdateCollection(CollectionConfig),
    /// Case activities.
    EventCollection(CollectionConfig),
}

impl SectionBody {
    /// Returns the section type implied by this body.
    #[must_use]
    pub const fn section_type(&self) -> SectionType {
        match self {
            Self::StaticText { .. } => SectionType::StaticText,
            Self::VariableBlock(_) => SectionType::VariableBlock,
            Self::UpdateCollection(_) => SectionType::UpdateCollection,
            Self::EventCollection(_) => SectionType::EventCollection,
        }
    }

    /// Returns the collection config for collection sections.
    #[must_use]
    pub const fn collection(&self) -> Option<&CollectionConfig> {
        match self {
            Self::UpdateCollection(config) | Self::EventCollection(config) => Some(config),
            Self::StaticText { .. } | Self::VariableBlock(_) => None,
        }
    }

    /// Mutable access to the collection config for collection sections.
    pub fn collection_mut(&mut self) -> Option<&mut CollectionConfig> {
        match self {
            Self::UpdateCollection(config) | Self::EventCollection(config) => Some(config),
            Self::StaticText { .. } | Self::VariableBlock(_) => None,
        }
    }
}

/// One configurable content block within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    /// Stable identifier, used as the customization key.
    pub section_id: Uuid,
    /// Default heading.
    pub title: String,
    /// Stored rank within the template (0-based).
    pub display_order: u32,
    /// Default visibility.
    pub is_visible: bool,
    /// Type-specific content.
    pub body: SectionBody,
}

impl TemplateSection {
    /// Creates a visible section with a fresh identifier.
    #[must_use]
    pub fn new(title: &str, display_order: u32, body: SectionBody) -> Self {
        Self {
            section_id: Uuid::new_v4(),
            title: title.to_string(),
            display_order,
            is_visible: true,
            body,
        }
    }

    /// Returns this section's type.
    #[must_use]
    pub const fn section_type(&self) -> SectionType {
        self.body.section_type()
    }
}

/// A reusable, ordered definition of report sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    /// The canonical numeric identifier assigned by the database.
    pub template_id: Option<i64>,
    /// The owning organization.
    pub organization_id: i64,
    /// Template name, unique within the organization.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Cover page heading. Defaults to the report title when absent.
    pub cover_title: Option<String>,
    /// Running header text (placeholders allowed).
    pub header_text: Option<String>,
    /// Running footer text (placeholders allowed).
    pub footer_text: Option<String>,
    /// Whether a cover page is generated by default.
    pub show_cover_page: bool,
    /// Whether running header/footer lines are printed by default.
    pub show_header_footer: bool,
    /// Sections, in stored order.
    pub sections: Vec<TemplateSection>,
}

impl ReportTemplate {
    /// Creates an empty, unpersisted template with a cover page and header/footer enabled.
    #[must_use]
    pub fn new(organization_id: i64, name: &str) -> Self {
        Self {
            template_id: None,
            organization_id,
            name: name.trim().to_string(),
            description: None,
            cover_title: None,
            header_text: None,
            footer_text: None,
            show_cover_page: true,
            show_header_footer: true,
            sections: Vec::new(),
        }
    }

    /// Looks up a section by identifier.
    #[must_use]
    pub fn section(&self, section_id: Uuid) -> Option<&TemplateSection> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }

    /// Returns the position of a section in the stored list.
    #[must_use]
    pub fn section_index(&self, section_id: Uuid) -> Option<usize> {
        self.sections.iter().position(|s| s.section_id == section_id)
    }

    /// Returns the sections sorted by stored display order.
    ///
    /// Ties keep their position in the stored list.
    #[must_use]
    pub fn sections_in_display_order(&self) -> Vec<&TemplateSection> {
        let mut ordered: Vec<&TemplateSection> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.display_order);
        ordered
    }
}
