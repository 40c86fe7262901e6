// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook_domain::{ReportTemplate, SectionBody, SectionType, TemplateSection};
use diesel::SqliteConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::conversions::parse_column;
use crate::diesel_schema::{report_templates, template_sections};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = report_templates)]
struct TemplateRow {
    template_id: i64,
    organization_id: i64,
    name: String,
    description: Option<String>,
    cover_title: Option<String>,
    header_text: Option<String>,
    footer_text: Option<String>,
    show_cover_page: bool,
    show_header_footer: bool,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = template_sections)]
struct SectionRow {
    section_uuid: String,
    title: String,
    display_order: i32,
    is_visible: bool,
    section_type: String,
    body_json: String,
}

impl SectionRow {
    fn into_section(self) -> Result<TemplateSection, PersistenceError> {
        let section_id: Uuid = Uuid::parse_str(&self.section_uuid).map_err(|e| {
            PersistenceError::ReconstructionError(format!(
                "Invalid section id '{}': {e}",
                self.section_uuid
            ))
        })?;
        let body: SectionBody = serde_json::from_str(&self.body_json)?;
        let stored_type: SectionType = parse_column(&self.section_type)?;
        if body.section_type() != stored_type {
            return Err(PersistenceError::ReconstructionError(format!(
                "Section {section_id} is stored as {stored_type} but its body is {}",
                body.section_type()
            )));
        }
        let display_order: u32 = u32::try_from(self.display_order).map_err(|_| {
            PersistenceError::ReconstructionError(format!(
                "display_order out of range: {}",
                self.display_order
            ))
        })?;

        Ok(TemplateSection {
            section_id,
            title: self.title,
            display_order,
            is_visible: self.is_visible,
            body,
        })
    }
}

fn load_template(
    conn: &mut SqliteConnection,
    row: TemplateRow,
) -> Result<ReportTemplate, PersistenceError> {
    let sections: Vec<TemplateSection> = template_sections::table
        .filter(template_sections::template_id.eq(row.template_id))
        .order((
            template_sections::display_order.asc(),
            template_sections::section_row_id.asc(),
        ))
        .select(SectionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SectionRow::into_section)
        .collect::<Result<_, PersistenceError>>()?;

    Ok(ReportTemplate {
        template_id: Some(row.template_id),
        organization_id: row.organization_id,
        name: row.name,
        description: row.description,
        cover_title: row.cover_title,
        header_text: row.header_text,
        footer_text: row.footer_text,
        show_cover_page: row.show_cover_page,
        show_header_footer: row.show_header_footer,
        sections,
    })
}

/// Loads a template with its sections in display order.
///
/// # Errors
///
/// Returns `TemplateNotFound` if no template has this id, or an error if a
/// section cannot be decoded.
pub fn get_template(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<ReportTemplate, PersistenceError> {
    let row: TemplateRow = report_templates::table
        .filter(report_templates::template_id.eq(template_id))
        .select(TemplateRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::TemplateNotFound(template_id))?;

    load_template(conn, row)
}

/// Lists an organization's templates by name.
///
/// # Errors
///
/// Returns an error if the query or decoding fails.
pub fn list_templates(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<ReportTemplate>, PersistenceError> {
    let rows: Vec<TemplateRow> = report_templates::table
        .filter(report_templates::organization_id.eq(organization_id))
        .order(report_templates::name.asc())
        .select(TemplateRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| load_template(conn, row))
        .collect()
}
