// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section reordering for template authoring.
//!
//! Moving a section renumbers every section so stored ranks are always
//! `0..n` with no gaps and no duplicates.

use crate::error::DomainError;
use crate::template::TemplateSection;
use uuid::Uuid;

/// A stored rank that changed as a result of a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOrderChange {
    /// The section whose rank changed.
    pub section_id: Uuid,
    /// The rank before the move.
    pub previous_order: u32,
    /// The rank after the move.
    pub new_order: u32,
}

/// Sorts sections by stored rank and renumbers them `0..n`.
///
/// Ties keep their relative position.
///
/// # Returns
///
/// The sections whose stored rank changed.
pub fn normalize_display_order(sections: &mut [TemplateSection]) -> Vec<DisplayOrderChange> {
    let previous: Vec<(Uuid, u32)> = sections
        .iter()
        .map(|s| (s.section_id, s.display_order))
        .collect();

    sections.sort_by_key(|s| s.display_order);
    renumber(sections);

    collect_changes(&previous, sections)
}

/// Moves one section to a new position and renumbers all sections.
///
/// `to_index` is the 0-based position the section should occupy after the
/// move, counted in display order.
///
/// # Errors
///
/// Returns an error if:
/// - The section is not in the list
/// - `to_index` is not a valid position
pub fn move_section(
    sections: &mut Vec<TemplateSection>,
    section_id: Uuid,
    to_index: usize,
) -> Result<Vec<DisplayOrderChange>, DomainError> {
    let previous: Vec<(Uuid, u32)> = sections
        .iter()
        .map(|s| (s.section_id, s.display_order))
        .collect();

    sections.sort_by_key(|s| s.display_order);

    let from_index: usize = sections
        .iter()
        .position(|s| s.section_id == section_id)
        .ok_or(DomainError::SectionNotFound(section_id))?;

    if to_index >= sections.len() {
        return Err(DomainError::SectionIndexOutOfRange {
            index: to_index,
            len: sections.len(),
        });
    }

    let moved: TemplateSection = sections.remove(from_index);
    sections.insert(to_index, moved);
    renumber(sections);

    Ok(collect_changes(&previous, sections))
}

fn renumber(sections: &mut [TemplateSection]) {
    for (position, section) in sections.iter_mut().enumerate() {
        section.display_order = u32::try_from(position).unwrap_or(u32::MAX);
    }
}

fn collect_changes(previous: &[(Uuid, u32)], sections: &[TemplateSection]) -> Vec<DisplayOrderChange> {
    sections
        .iter()
        .filter_map(|section| {
            previous
                .iter()
                .find(|(id, _)| *id == section.section_id)
                .filter(|(_, order)| *order != section.display_order)
                .map(|(_, order)| DisplayOrderChange {
                    section_id: section.section_id,
                    previous_order: *order,
                    new_order: section.display_order,
                })
        })
        .collect()
}
