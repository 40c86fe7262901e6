// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Template authoring transitions.
//!
//! Every authoring command leaves the template with contiguous display
//! orders `0..n`, so drag-and-drop moves always operate on clean ranks.

use crate::command::TemplateCommand;
use crate::error::CoreError;
use crate::state::{TemplateCreated, TemplateTransition};
use casebook_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use casebook_domain::{
    DisplayOrderChange, DomainError, ReportTemplate, TemplateSection, move_section,
    normalize_display_order, validate_template,
};

fn template_snapshot(template: &ReportTemplate) -> StateSnapshot {
    let order: Vec<String> = template
        .sections_in_display_order()
        .iter()
        .map(|s| format!("{}:{}", s.display_order, s.title))
        .collect();
    StateSnapshot::new(format!(
        "name={},sections={},order=[{}]",
        template.name,
        template.sections.len(),
        order.join(";")
    ))
}

/// Validates a new template and records its creation.
///
/// Display orders are normalized to `0..n` before the template is returned.
///
/// # Errors
///
/// Returns an error if the template fails validation.
pub fn create_template(
    template: ReportTemplate,
    actor: Actor,
    cause: Cause,
) -> Result<TemplateCreated, CoreError> {
    let mut template: ReportTemplate = template;
    validate_template(&template)?;
    normalize_display_order(&mut template.sections);

    let action: Action = Action::new(
        String::from("CreateTemplate"),
        Some(format!(
            "Created template '{}' with {} sections",
            template.name,
            template.sections.len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        template_snapshot(&template),
        AuditScope::Template {
            template_name: template.name.clone(),
        },
    );

    Ok(TemplateCreated {
        template,
        audit_event,
    })
}

/// Applies an authoring command to a template.
///
/// The input template is not modified.
///
/// # Errors
///
/// Returns an error if:
/// - The command names a section outside the template
/// - An update changes a section's type
/// - A move targets an invalid position
/// - The resulting template fails validation
pub fn apply_template(
    template: &ReportTemplate,
    command: TemplateCommand,
    actor: Actor,
    cause: Cause,
) -> Result<TemplateTransition, CoreError> {
    let action_name: &'static str = command.action_name();
    let mut new_template: ReportTemplate = template.clone();

    let (order_changes, details): (Vec<DisplayOrderChange>, String) = match command {
        TemplateCommand::AddSection {
            title,
            body,
            is_visible,
        } => {
            let next_order: u32 = u32::try_from(new_template.sections.len()).unwrap_or(u32::MAX);
            let mut section: TemplateSection = TemplateSection::new(&title, next_order, body);
            section.is_visible = is_visible;
            let details: String = format!(
                "Added {} section '{}'",
                section.section_type(),
                section.title
            );
            new_template.sections.push(section);
            (normalize_display_order(&mut new_template.sections), details)
        }
        TemplateCommand::UpdateSection {
            section_id,
            title,
            is_visible,
            body,
        } => {
            let index: usize = new_template
                .section_index(section_id)
                .ok_or(DomainError::SectionNotFound(section_id))?;
            let section: &mut TemplateSection = &mut new_template.sections[index];

            if let Some(title) = title {
                section.title = title.trim().to_string();
            }
            if let Some(visible) = is_visible {
                section.is_visible = visible;
            }
            if let Some(body) = body {
                // Rule: customizations are keyed on section ids, so a section keeps its type
                if body.section_type() != section.section_type() {
                    return Err(CoreError::DomainViolation(DomainError::InvalidTemplate(
                        format!(
                            "Section '{}' is a {} section and cannot become {}",
                            section.title,
                            section.section_type(),
                            body.section_type()
                        ),
                    )));
                }
                section.body = body;
            }
            (Vec::new(), format!("Updated section '{}'", section.title))
        }
        TemplateCommand::RemoveSection { section_id } => {
            let index: usize = new_template
                .section_index(section_id)
                .ok_or(DomainError::SectionNotFound(section_id))?;
            let removed: TemplateSection = new_template.sections.remove(index);
            (
                normalize_display_order(&mut new_template.sections),
                format!("Removed section '{}'", removed.title),
            )
        }
        TemplateCommand::MoveSection {
            section_id,
            to_index,
        } => {
            let changes: Vec<DisplayOrderChange> =
                move_section(&mut new_template.sections, section_id, to_index)?;
            (changes, format!("Moved section {section_id} to position {to_index}"))
        }
        TemplateCommand::SetPresentation {
            description,
            cover_title,
            header_text,
            footer_text,
            show_cover_page,
            show_header_footer,
        } => {
            new_template.description = description;
            new_template.cover_title = cover_title;
            new_template.header_text = header_text;
            new_template.footer_text = footer_text;
            new_template.show_cover_page = show_cover_page;
            new_template.show_header_footer = show_header_footer;
            (Vec::new(), String::from("Updated presentation defaults"))
        }
    };

    validate_template(&new_template)?;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(action_name.to_string(), Some(details)),
        template_snapshot(template),
        template_snapshot(&new_template),
        AuditScope::Template {
            template_name: template.name.clone(),
        },
    );

    Ok(TemplateTransition {
        new_template,
        order_changes,
        audit_event,
    })
}
