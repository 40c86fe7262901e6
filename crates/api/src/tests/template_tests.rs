// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use casebook::TemplateCommand;
use casebook_domain::SectionBody;
use uuid::Uuid;

use crate::{
    ApiError, ListTemplatesResponse, ModifyTemplateRequest, TemplateResponse, create_template,
    get_template, list_templates, modify_template,
};

use super::helpers::{
    create_template_request, create_test_actor, create_test_cause, create_test_template, setup,
};

fn titles(response: &TemplateResponse) -> Vec<&str> {
    response
        .template
        .sections
        .iter()
        .map(|s| s.title.as_str())
        .collect()
}

fn orders(response: &TemplateResponse) -> Vec<u32> {
    response
        .template
        .sections
        .iter()
        .map(|s| s.display_order)
        .collect()
}

#[test]
fn test_create_template_assigns_display_orders() {
    let (mut persistence, organization_id) = setup();

    let created: TemplateResponse = create_test_template(&mut persistence, organization_id);
    assert!(created.event_id.is_some());

    let stored: TemplateResponse = get_template(&mut persistence, created.template_id).unwrap();
    assert_eq!(stored.template.template_id, Some(created.template_id));
    assert_eq!(titles(&stored), vec!["Introduction", "Case Details", "Updates"]);
    assert_eq!(orders(&stored), vec![0, 1, 2]);
    assert_eq!(stored.template, created.template);
}

#[test]
fn test_duplicate_template_name_conflicts() {
    let (mut persistence, organization_id) = setup();
    create_test_template(&mut persistence, organization_id);

    let result = create_template(
        &mut persistence,
        &create_template_request(organization_id, "Standard Report"),
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::Conflict { ref resource_type, .. }) if resource_type == "Template"
    ));
}

#[test]
fn test_template_without_name_is_rejected() {
    let (mut persistence, organization_id) = setup();

    let result = create_template(
        &mut persistence,
        &create_template_request(organization_id, "  "),
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "template"
    ));
}

#[test]
fn test_template_for_unknown_organization_is_rejected() {
    let (mut persistence, _) = setup();

    let result = create_template(
        &mut persistence,
        &create_template_request(404, "Standard Report"),
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_move_section_renumbers_and_persists() {
    let (mut persistence, organization_id) = setup();
    let created: TemplateResponse = create_test_template(&mut persistence, organization_id);
    let updates_id: Uuid = created.template.sections[2].section_id;

    let moved: TemplateResponse = modify_template(
        &mut persistence,
        &ModifyTemplateRequest {
            template_id: created.template_id,
            command: TemplateCommand::MoveSection {
                section_id: updates_id,
                to_index: 0,
            },
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(moved.reordered_sections, 3);

    let stored: TemplateResponse = get_template(&mut persistence, created.template_id).unwrap();
    assert_eq!(titles(&stored), vec!["Updates", "Introduction", "Case Details"]);
    assert_eq!(orders(&stored), vec![0, 1, 2]);
}

#[test]
fn test_move_to_out_of_range_index_is_rejected() {
    let (mut persistence, organization_id) = setup();
    let created: TemplateResponse = create_test_template(&mut persistence, organization_id);

    let result = modify_template(
        &mut persistence,
        &ModifyTemplateRequest {
            template_id: created.template_id,
            command: TemplateCommand::MoveSection {
                section_id: created.template.sections[0].section_id,
                to_index: 7,
            },
        },
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "to_index"
    ));
}

#[test]
fn test_add_and_remove_sections() {
    let (mut persistence, organization_id) = setup();
    let created: TemplateResponse = create_test_template(&mut persistence, organization_id);

    modify_template(
        &mut persistence,
        &ModifyTemplateRequest {
            template_id: created.template_id,
            command: TemplateCommand::AddSection {
                title: String::from("Closing"),
                body: SectionBody::StaticText {
                    content: String::from("Prepared for {{client_list}}."),
                },
                is_visible: true,
            },
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    modify_template(
        &mut persistence,
        &ModifyTemplateRequest {
            template_id: created.template_id,
            command: TemplateCommand::RemoveSection {
                section_id: created.template.sections[0].section_id,
            },
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let stored: TemplateResponse = get_template(&mut persistence, created.template_id).unwrap();
    assert_eq!(titles(&stored), vec!["Case Details", "Updates", "Closing"]);
    assert_eq!(orders(&stored), vec![0, 1, 2]);
}

#[test]
fn test_removing_unknown_section_is_not_found() {
    let (mut persistence, organization_id) = setup();
    let created: TemplateResponse = create_test_template(&mut persistence, organization_id);

    let result = modify_template(
        &mut persistence,
        &ModifyTemplateRequest {
            template_id: created.template_id,
            command: TemplateCommand::RemoveSection {
                section_id: Uuid::new_v4(),
            },
        },
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Section"
    ));
}

#[test]
fn test_list_templates_by_name() {
    let (mut persistence, organization_id) = setup();
    for name in ["Weekly Summary", "Final Report"] {
        create_template(
            &mut persistence,
            &create_template_request(organization_id, name),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
    }

    let listed: ListTemplatesResponse = list_templates(&mut persistence, organization_id).unwrap();
    let names: Vec<&str> = listed.templates.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, vec!["Final Report", "Weekly Summary"]);
    assert_eq!(listed.templates[0].section_count, 3);
}

#[test]
fn test_unknown_template_is_not_found() {
    let (mut persistence, _) = setup();

    let result = get_template(&mut persistence, 77);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Template"
    ));
}
