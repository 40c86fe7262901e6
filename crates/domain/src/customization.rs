// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-report template customization and the merge algorithm.
//!
//! ## Merge Rules
//!
//! - Every overridable field resolves as `override ?? default`
//! - Collection configs merge key by key, so overriding one filter keeps
//!   the sibling settings from the template
//! - Ordering follows the customization's explicit order list when present;
//!   listed sections come first and unlisted ones follow in stored order
//! - Without an order list, sections sort by effective display order, ties
//!   broken by their position in the stored list
//!
//! ## Invariants
//!
//! - The stored template is never mutated
//! - Merging is idempotent: `merge(merge(t, c), c) == merge(t, c)`

use crate::error::DomainError;
use crate::template::{CollectionConfig, ReportTemplate, SortOrder, TemplateSection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Sparse overrides for a collection section's config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfigOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_filter: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_duplicates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_timestamps: Option<bool>,
}

impl CollectionConfigOverride {
    /// Applies the set fields on top of `base`, keeping every unset field.
    #[must_use]
    pub fn apply_to(&self, base: &CollectionConfig) -> CollectionConfig {
        CollectionConfig {
            type_filter: self
                .type_filter
                .clone()
                .unwrap_or_else(|| base.type_filter.clone()),
            sort_order: self.sort_order.unwrap_or(base.sort_order),
            limit: self.limit.or(base.limit),
            allow_duplicates: self.allow_duplicates.unwrap_or(base.allow_duplicates),
            show_timestamps: self.show_timestamps.unwrap_or(base.show_timestamps),
        }
    }
}

/// Sparse overrides for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionConfigOverride>,
}

/// A per-generation sparse override applied on top of a template's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCustomization {
    /// Overrides keyed by section id.
    #[serde(default)]
    pub section_overrides: BTreeMap<Uuid, SectionOverride>,
    /// Explicit section order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<Uuid>>,
    /// Cover page toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_cover_page: Option<bool>,
    /// Running header/footer toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header_footer: Option<bool>,
}

impl TemplateCustomization {
    /// Returns whether the customization changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.section_overrides.is_empty()
            && self.section_order.is_none()
            && self.show_cover_page.is_none()
            && self.show_header_footer.is_none()
    }

    /// Returns the override for a section, inserting an empty one if needed.
    pub fn override_for(&mut self, section_id: Uuid) -> &mut SectionOverride {
        self.section_overrides.entry(section_id).or_default()
    }
}

/// Validates that a customization only references the template's sections.
///
/// # Errors
///
/// Returns an error if:
/// - An override or order entry names a section outside the template
/// - The order list contains a section more than once
/// - A collection override targets a non-collection section
pub fn validate_customization(
    template: &ReportTemplate,
    customization: &TemplateCustomization,
) -> Result<(), DomainError> {
    for (section_id, section_override) in &customization.section_overrides {
        let section: &TemplateSection = template
            .section(*section_id)
            .ok_or(DomainError::SectionNotFound(*section_id))?;

        if section_override.collection.is_some() && !section.section_type().is_collection() {
            return Err(DomainError::CollectionOverrideOnNonCollection {
                section_id: *section_id,
            });
        }
    }

    if let Some(order) = &customization.section_order {
        let mut seen: HashSet<Uuid> = HashSet::new();
        for section_id in order {
            if template.section(*section_id).is_none() {
                return Err(DomainError::SectionNotFound(*section_id));
            }
            if !seen.insert(*section_id) {
                return Err(DomainError::DuplicateOrderEntry(*section_id));
            }
        }
    }

    Ok(())
}

/// Merges a customization into a template, producing the effective template.
///
/// The returned template has overrides applied, sections sorted into their
/// effective order, and the cover page and header/footer toggles resolved.
///
/// # Errors
///
/// Returns an error if the customization fails `validate_customization`.
pub fn merge_customization(
    template: &ReportTemplate,
    customization: &TemplateCustomization,
) -> Result<ReportTemplate, DomainError> {
    validate_customization(template, customization)?;

    let mut merged: Vec<(usize, TemplateSection)> = template
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let effective: TemplateSection = customization
                .section_overrides
                .get(&section.section_id)
                .map_or_else(|| section.clone(), |o| apply_override(section, o));
            (index, effective)
        })
        .collect();

    if let Some(order) = &customization.section_order {
        let rank: BTreeMap<Uuid, usize> = order
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();

        // Listed sections first, then the rest in their own display order.
        merged.sort_by_key(|(index, section)| {
            rank.get(&section.section_id).map_or(
                (1, 0, section.display_order, *index),
                |position| (0, *position, 0, *index),
            )
        });

        for (position, (_, section)) in merged.iter_mut().enumerate() {
            section.display_order = u32::try_from(position).unwrap_or(u32::MAX);
        }
    } else {
        merged.sort_by_key(|(index, section)| (section.display_order, *index));
    }

    Ok(ReportTemplate {
        template_id: template.template_id,
        organization_id: template.organization_id,
        name: template.name.clone(),
        description: template.description.clone(),
        cover_title: template.cover_title.clone(),
        header_text: template.header_text.clone(),
        footer_text: template.footer_text.clone(),
        show_cover_page: customization
            .show_cover_page
            .unwrap_or(template.show_cover_page),
        show_header_footer: customization
            .show_header_footer
            .unwrap_or(template.show_header_footer),
        sections: merged.into_iter().map(|(_, section)| section).collect(),
    })
}

fn apply_override(section: &TemplateSection, section_override: &SectionOverride) -> TemplateSection {
    let mut effective: TemplateSection = section.clone();

    if let Some(title) = &section_override.title {
        effective.title.clone_from(title);
    }
    if let Some(visible) = section_override.is_visible {
        effective.is_visible = visible;
    }
    if let Some(order) = section_override.display_order {
        effective.display_order = order;
    }
    if let Some(collection_override) = &section_override.collection {
        if let Some(config) = effective.body.collection_mut() {
            *config = collection_override.apply_to(config);
        }
    }

    effective
}

/// Returns the visible sections of an (already merged) template, in order.
#[must_use]
pub fn effective_sections(template: &ReportTemplate) -> Vec<&TemplateSection> {
    template
        .sections_in_display_order()
        .into_iter()
        .filter(|s| s.is_visible)
        .collect()
}
