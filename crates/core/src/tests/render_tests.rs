// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    activity, collection, create_test_case_file, create_test_organization, create_test_template,
    create_test_updates, report_data,
};
use crate::CaseFile;
use crate::report::{
    Block, LineStyle, PageLayout, RenderedReport, ReportError, build_blocks, render_report,
};
use casebook_domain::{
    CollectionConfigOverride, DomainError, Organization, ReportTemplate, SectionBody, SortOrder,
    TemplateCustomization, TemplateSection, merge_customization, unresolved_tokens,
};
use time::macros::datetime;
use uuid::Uuid;

fn case_with_updates() -> CaseFile {
    let mut case_file: CaseFile = create_test_case_file();
    case_file.updates = create_test_updates();
    case_file
}

fn blocks_for(template: &ReportTemplate, customization: &TemplateCustomization) -> Vec<Block> {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = case_with_updates();
    let data = report_data(&organization, &case_file, "Surveillance Report");
    let merged: ReportTemplate = merge_customization(template, customization).unwrap();
    build_blocks(&merged, &data, &data.variables())
}

/// Entry headings grouped under the section heading that precedes them.
fn entries_by_section(blocks: &[Block]) -> Vec<(String, Vec<String>)> {
    let mut sections: Vec<(String, Vec<String>)> = Vec::new();
    for block in blocks {
        match block {
            Block::Heading(title) => sections.push((title.clone(), Vec::new())),
            Block::EntryHeading(entry) => {
                if let Some((_, entries)) = sections.last_mut() {
                    entries.push(entry.clone());
                }
            }
            _ => {}
        }
    }
    sections
}

fn entries_in(blocks: &[Block], section: &str) -> Vec<String> {
    entries_by_section(blocks)
        .into_iter()
        .find(|(title, _)| title == section)
        .map(|(_, entries)| entries)
        .unwrap_or_default()
}

#[test]
fn test_first_collection_section_wins() {
    let blocks: Vec<Block> = blocks_for(&create_test_template(), &TemplateCustomization::default());

    assert_eq!(
        entries_in(&blocks, "Surveillance"),
        vec![
            "Day 1 (Surveillance)",
            "Day 2 (Surveillance)",
            "Day 3 (Surveillance)"
        ]
    );
    assert_eq!(
        entries_in(&blocks, "All Updates"),
        vec!["Neighbor (Interview)"]
    );
}

#[test]
fn test_allow_duplicates_repeats_records() {
    let template: ReportTemplate = create_test_template();
    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.override_for(template.sections[3].section_id).collection =
        Some(CollectionConfigOverride {
            allow_duplicates: Some(true),
            ..CollectionConfigOverride::default()
        });

    let blocks: Vec<Block> = blocks_for(&template, &customization);

    assert_eq!(
        entries_in(&blocks, "All Updates"),
        vec![
            "Day 1 (Surveillance)",
            "Neighbor (Interview)",
            "Day 2 (Surveillance)",
            "Day 3 (Surveillance)"
        ]
    );
}

#[test]
fn test_hidden_section_does_not_claim_records() {
    let template: ReportTemplate = create_test_template();
    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization
        .override_for(template.sections[2].section_id)
        .is_visible = Some(false);

    let blocks: Vec<Block> = blocks_for(&template, &customization);
    let titles: Vec<String> = entries_by_section(&blocks)
        .into_iter()
        .map(|(title, _)| title)
        .collect();

    assert_eq!(titles, vec!["Introduction", "Case Details", "All Updates"]);
    assert_eq!(entries_in(&blocks, "All Updates").len(), 4);
}

#[test]
fn test_limit_applies_after_sort_and_unemitted_records_stay_available() {
    let template: ReportTemplate = create_test_template();
    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.override_for(template.sections[2].section_id).collection =
        Some(CollectionConfigOverride {
            sort_order: Some(SortOrder::Descending),
            limit: Some(2),
            ..CollectionConfigOverride::default()
        });

    let blocks: Vec<Block> = blocks_for(&template, &customization);

    assert_eq!(
        entries_in(&blocks, "Surveillance"),
        vec!["Day 3 (Surveillance)", "Day 2 (Surveillance)"]
    );
    assert_eq!(
        entries_in(&blocks, "All Updates"),
        vec!["Day 1 (Surveillance)", "Neighbor (Interview)"]
    );
}

#[test]
fn test_reordering_changes_which_section_wins() {
    let template: ReportTemplate = create_test_template();
    let customization: TemplateCustomization = TemplateCustomization {
        section_order: Some(vec![
            template.sections[3].section_id,
            template.sections[2].section_id,
        ]),
        ..TemplateCustomization::default()
    };

    let blocks: Vec<Block> = blocks_for(&template, &customization);

    assert_eq!(entries_in(&blocks, "All Updates").len(), 4);
    assert!(entries_in(&blocks, "Surveillance").is_empty());
    assert!(blocks.contains(&Block::Note(String::from(
        "No updates recorded for Surveillance."
    ))));
}

#[test]
fn test_update_entries_carry_timestamp_and_author() {
    let blocks: Vec<Block> = blocks_for(&create_test_template(), &TemplateCustomization::default());

    assert!(blocks.contains(&Block::Meta(String::from(
        "March 6, 2026 09:00 by Sam Rivera"
    ))));
    assert!(blocks.contains(&Block::EntryBody(String::from("Day 1 body"))));
}

#[test]
fn test_static_text_and_variable_block() {
    let blocks: Vec<Block> = blocks_for(&create_test_template(), &TemplateCustomization::default());

    assert!(blocks.contains(&Block::Paragraph(String::from(
        "This report covers CASE-00001 for Globex Insurance."
    ))));
    assert!(blocks.contains(&Block::Field {
        label: String::from("Case Number"),
        value: String::from("CASE-00001"),
    }));
    assert!(blocks.contains(&Block::Field {
        label: String::from("Case Manager"),
        value: String::from("Sam Rivera"),
    }));
}

#[test]
fn test_event_collection_entries() {
    let organization: Organization = create_test_organization();
    let mut case_file: CaseFile = create_test_case_file();
    case_file.activities = vec![
        activity("Interview", "Spoke to neighbor", datetime!(2026-03-07 14:30 UTC)),
        activity("Canvass", "Door knock", datetime!(2026-03-06 10:00 UTC)),
    ];

    let mut template: ReportTemplate = ReportTemplate::new(1, "Events");
    template.sections = vec![TemplateSection::new(
        "Interviews",
        0,
        SectionBody::EventCollection(collection(&["interview"], SortOrder::Ascending)),
    )];

    let data = report_data(&organization, &case_file, "Events");
    let blocks: Vec<Block> = build_blocks(&template, &data, &data.variables());

    assert_eq!(
        blocks,
        vec![
            Block::Heading(String::from("Interviews")),
            Block::EntryHeading(String::from("Spoke to neighbor (Interview)")),
            Block::Meta(String::from("March 7, 2026 14:30 at Main St")),
            Block::Spacer,
        ]
    );
}

#[test]
fn test_render_report_leaves_template_untouched() {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = case_with_updates();
    let template: ReportTemplate = create_test_template();
    let snapshot: ReportTemplate = template.clone();

    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.override_for(template.sections[0].section_id).title =
        Some(String::from("Overview"));

    let rendered: RenderedReport = render_report(
        &template,
        &customization,
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    )
    .unwrap();

    assert_eq!(template, snapshot);
    assert!(rendered.html.contains("Overview"));
    assert!(!rendered.html.contains(">Introduction<"));
}

#[test]
fn test_render_report_cover_and_running_text() {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = case_with_updates();

    let rendered: RenderedReport = render_report(
        &create_test_template(),
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    )
    .unwrap();

    let cover = &rendered.pages[0];
    assert!(cover.is_cover);
    assert_eq!(cover.header, None);
    assert_eq!(cover.lines[0].style, LineStyle::CoverTitle);
    assert_eq!(cover.lines[0].text, "Surveillance Report");
    assert!(
        cover
            .lines
            .iter()
            .any(|line| line.text == "Case Number: CASE-00001")
    );
    assert!(cover.lines.iter().any(|line| line.text == "Phone: 555-0100"));

    let body = &rendered.pages[1];
    assert!(!body.is_cover);
    assert_eq!(
        body.header.as_deref(),
        Some("CASE-00001 | Surveillance Report")
    );
    assert_eq!(body.footer.as_deref(), Some("Page 2 of 2"));
    assert!(rendered.html.contains("class=\"page cover\""));
}

#[test]
fn test_customization_toggles_cover_and_running_text() {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = case_with_updates();
    let customization: TemplateCustomization = TemplateCustomization {
        show_cover_page: Some(false),
        show_header_footer: Some(false),
        ..TemplateCustomization::default()
    };

    let rendered: RenderedReport = render_report(
        &create_test_template(),
        &customization,
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    )
    .unwrap();

    assert_eq!(rendered.page_count(), 1);
    assert!(!rendered.pages[0].is_cover);
    assert_eq!(rendered.pages[0].header, None);
    assert_eq!(rendered.pages[0].footer, None);
    assert!(!rendered.html.contains("running-footer\">"));
}

#[test]
fn test_html_escapes_case_data() {
    let organization: Organization = create_test_organization();
    let mut case_file: CaseFile = case_with_updates();
    case_file.updates[0].title = String::from("<script>alert(1)</script>");

    let rendered: RenderedReport = render_report(
        &create_test_template(),
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, "Tom & Jerry"),
        &PageLayout::letter(),
    )
    .unwrap();

    assert!(!rendered.html.contains("<script>"));
    assert!(rendered.html.contains("&lt;script&gt;"));
    assert!(rendered.html.contains("<title>Tom &amp; Jerry</title>"));
}

#[test]
fn test_customization_for_foreign_section_is_rejected() {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = case_with_updates();
    let stranger: Uuid = Uuid::new_v4();
    let mut customization: TemplateCustomization = TemplateCustomization::default();
    customization.override_for(stranger).is_visible = Some(false);

    let result = render_report(
        &create_test_template(),
        &customization,
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    );

    assert_eq!(
        result,
        Err(ReportError::InvalidCustomization(
            DomainError::SectionNotFound(stranger)
        ))
    );
}

#[test]
fn test_empty_collection_note_uses_substituted_title() {
    let organization: Organization = create_test_organization();
    let case_file: CaseFile = create_test_case_file();
    let mut template: ReportTemplate = ReportTemplate::new(1, "Updates");
    template.sections = vec![TemplateSection::new(
        "Updates for {{case_number}}",
        0,
        SectionBody::UpdateCollection(collection(&[], SortOrder::Ascending)),
    )];

    let rendered: RenderedReport = render_report(
        &template,
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, "Updates"),
        &PageLayout::letter(),
    )
    .unwrap();

    assert!(unresolved_tokens(&rendered.html).is_empty());
    assert!(
        rendered
            .html
            .contains("No updates recorded for Updates for CASE-00001.")
    );
}

#[test]
fn test_record_text_is_never_read_as_placeholder() {
    let organization: Organization = create_test_organization();
    let mut case_file: CaseFile = case_with_updates();
    case_file.updates[0].body = String::from("Asked about {{case_number}}");

    let rendered: RenderedReport = render_report(
        &create_test_template(),
        &TemplateCustomization::default(),
        &report_data(&organization, &case_file, "Surveillance Report"),
        &PageLayout::letter(),
    )
    .unwrap();

    assert!(unresolved_tokens(&rendered.html).is_empty());
    assert!(rendered.html.contains("Asked about { {case_number}}"));
}
