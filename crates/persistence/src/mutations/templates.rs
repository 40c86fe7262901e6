// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report template mutations.

use std::collections::HashSet;

use casebook_domain::{ReportTemplate, TemplateSection};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewTemplateSection, TemplateRowValues};
use crate::diesel_schema;
use crate::error::{PersistenceError, is_unique_violation};

fn template_row_values(template: &ReportTemplate) -> TemplateRowValues<'_> {
    TemplateRowValues {
        organization_id: template.organization_id,
        name: &template.name,
        description: template.description.as_deref(),
        cover_title: template.cover_title.as_deref(),
        header_text: template.header_text.as_deref(),
        footer_text: template.footer_text.as_deref(),
        show_cover_page: template.show_cover_page,
        show_header_footer: template.show_header_footer,
    }
}

fn map_name_conflict(err: diesel::result::Error, name: &str) -> PersistenceError {
    if is_unique_violation(&err) {
        PersistenceError::DuplicateTemplateName(name.to_string())
    } else {
        PersistenceError::from(err)
    }
}

fn display_order(section: &TemplateSection) -> Result<i32, PersistenceError> {
    i32::try_from(section.display_order).map_err(|_| {
        PersistenceError::SerializationError(format!(
            "display_order out of range: {}",
            section.display_order
        ))
    })
}

/// Inserts a template and all of its sections.
///
/// # Errors
///
/// Returns `DuplicateTemplateName` if the organization already has a
/// template with this name, or an error if an insert fails.
pub fn insert_template(
    conn: &mut SqliteConnection,
    template: &ReportTemplate,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(diesel_schema::report_templates::table)
        .values(&template_row_values(template))
        .execute(conn)
        .map_err(|e| map_name_conflict(e, &template.name))?;

    let template_id: i64 = get_last_insert_rowid(conn)?;

    for section in &template.sections {
        insert_section(conn, template_id, section)?;
    }

    debug!(
        template_id,
        name = %template.name,
        sections = template.sections.len(),
        "Inserted template"
    );
    Ok(template_id)
}

/// Rewrites the template's own columns.
///
/// # Errors
///
/// Returns `DuplicateTemplateName` on a rename collision, or an error if the
/// update fails.
pub fn update_template_row(
    conn: &mut SqliteConnection,
    template_id: i64,
    template: &ReportTemplate,
) -> Result<(), PersistenceError> {
    use diesel_schema::report_templates;

    diesel::update(report_templates::table.filter(report_templates::template_id.eq(template_id)))
        .set(&template_row_values(template))
        .execute(conn)
        .map_err(|e| map_name_conflict(e, &template.name))?;
    Ok(())
}

/// Makes the stored sections match `sections`.
///
/// Sections are matched on their stable id: missing ones are deleted,
/// known ones are rewritten in place (including renumbered display
/// orders) and new ones are inserted.
///
/// # Errors
///
/// Returns an error if serialization or a statement fails.
pub fn sync_sections(
    conn: &mut SqliteConnection,
    template_id: i64,
    sections: &[TemplateSection],
) -> Result<(), PersistenceError> {
    use diesel_schema::template_sections;

    let stored: HashSet<String> = template_sections::table
        .filter(template_sections::template_id.eq(template_id))
        .select(template_sections::section_uuid)
        .load::<String>(conn)?
        .into_iter()
        .collect();
    let wanted: HashSet<String> = sections.iter().map(|s| s.section_id.to_string()).collect();

    let removed: Vec<&String> = stored.difference(&wanted).collect();
    if !removed.is_empty() {
        diesel::delete(
            template_sections::table
                .filter(template_sections::template_id.eq(template_id))
                .filter(template_sections::section_uuid.eq_any(removed)),
        )
        .execute(conn)?;
    }

    for section in sections {
        let section_uuid: String = section.section_id.to_string();
        if stored.contains(&section_uuid) {
            diesel::update(
                template_sections::table
                    .filter(template_sections::template_id.eq(template_id))
                    .filter(template_sections::section_uuid.eq(&section_uuid)),
            )
            .set((
                template_sections::title.eq(&section.title),
                template_sections::display_order.eq(display_order(section)?),
                template_sections::is_visible.eq(section.is_visible),
                template_sections::section_type.eq(section.section_type().as_str()),
                template_sections::body_json.eq(serde_json::to_string(&section.body)?),
            ))
            .execute(conn)?;
        } else {
            insert_section(conn, template_id, section)?;
        }
    }

    debug!(
        template_id,
        sections = sections.len(),
        removed = stored.difference(&wanted).count(),
        "Synchronized template sections"
    );
    Ok(())
}

fn insert_section(
    conn: &mut SqliteConnection,
    template_id: i64,
    section: &TemplateSection,
) -> Result<(), PersistenceError> {
    diesel::insert_into(diesel_schema::template_sections::table)
        .values(&NewTemplateSection {
            template_id,
            section_uuid: section.section_id.to_string(),
            title: &section.title,
            display_order: display_order(section)?,
            is_visible: section.is_visible,
            section_type: section.section_type().as_str(),
            body_json: serde_json::to_string(&section.body)?,
        })
        .execute(conn)?;
    Ok(())
}
