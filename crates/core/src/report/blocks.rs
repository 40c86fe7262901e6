// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section dispatch: turns a merged template and case data into content blocks.
//!
//! Collection sections share one de-duplication set per record kind. A record
//! emitted by any section is marked as seen, and later sections that do not
//! allow duplicates skip it, so the first section in display order wins.

use casebook_domain::{
    Case, CaseActivity, CaseUpdate, CollectionConfig, Organization, PlaceholderToken,
    ReportTemplate, SectionBody, SortOrder, Subject, VariableBlockConfig, VariableLayout,
    VariableMap, build_variable_map, effective_sections, literal_text, substitute_placeholders,
};
use std::collections::HashSet;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// A unit of report content, before line wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading.
    Heading(String),
    /// Static text paragraph. Newlines are hard breaks.
    Paragraph(String),
    /// Variable table row.
    Field { label: String, value: String },
    /// Variable list item.
    Bullet(String),
    /// Title line of a collection entry.
    EntryHeading(String),
    /// Timestamp, author or location of a collection entry.
    Meta(String),
    /// Text of a collection entry.
    EntryBody(String),
    /// Placeholder text for an empty collection.
    Note(String),
    /// Vertical space after a group of rows.
    Spacer,
}

/// The cover page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverPage {
    pub title: String,
    pub lines: Vec<String>,
}

/// Running header and footer text for body pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningText {
    pub header: Option<String>,
    pub footer: Option<String>,
    enabled: bool,
}

impl RunningText {
    /// No header or footer.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            header: None,
            footer: None,
            enabled: false,
        }
    }

    /// Header and footer lines with the given texts.
    #[must_use]
    pub const fn new(header: Option<String>, footer: Option<String>) -> Self {
        Self {
            header,
            footer,
            enabled: true,
        }
    }

    /// Whether rows are reserved for the header and footer.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The footer for a page, ending with the page number.
    #[must_use]
    pub fn footer_for(&self, number: usize, total: usize) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let page: String = format!("Page {number} of {total}");
        Some(match &self.footer {
            Some(text) if !text.is_empty() => format!("{text} | {page}"),
            _ => page,
        })
    }
}

/// Everything a render reads from the case.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    pub organization: &'a Organization,
    pub case: &'a Case,
    pub subjects: &'a [Subject],
    pub updates: &'a [CaseUpdate],
    pub activities: &'a [CaseActivity],
    pub report_date: Date,
    pub report_title: &'a str,
}

impl ReportData<'_> {
    /// Computes the variable map shared by every text fragment of the render.
    #[must_use]
    pub fn variables(&self) -> VariableMap {
        build_variable_map(
            self.organization,
            self.case,
            self.subjects,
            self.report_date,
            self.report_title,
        )
    }
}

#[derive(Default)]
struct SeenRecords {
    updates: HashSet<usize>,
    activities: HashSet<usize>,
}

/// Builds the body blocks for a merged template.
///
/// Only visible sections are rendered, in effective display order.
#[must_use]
pub fn build_blocks(
    template: &ReportTemplate,
    data: &ReportData<'_>,
    variables: &VariableMap,
) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut seen: SeenRecords = SeenRecords::default();

    for section in effective_sections(template) {
        let title: String = substitute_placeholders(&section.title, variables);
        blocks.push(Block::Heading(title.clone()));
        match &section.body {
            SectionBody::StaticText { content } => {
                static_text_blocks(&mut blocks, content, variables);
            }
            SectionBody::VariableBlock(config) => {
                variable_blocks(&mut blocks, config, variables);
            }
            SectionBody::UpdateCollection(config) => {
                update_blocks(&mut blocks, &title, config, data.updates, &mut seen.updates);
            }
            SectionBody::EventCollection(config) => {
                activity_blocks(
                    &mut blocks,
                    &title,
                    config,
                    data.activities,
                    &mut seen.activities,
                );
            }
        }
    }

    blocks
}

fn static_text_blocks(blocks: &mut Vec<Block>, content: &str, variables: &VariableMap) {
    let text: String = substitute_placeholders(content, variables);
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !paragraph.is_empty() {
                blocks.push(Block::Paragraph(paragraph.join("\n")));
                paragraph.clear();
            }
        } else {
            paragraph.push(line.trim_end());
        }
    }
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(paragraph.join("\n")));
    }
}

fn variable_blocks(blocks: &mut Vec<Block>, config: &VariableBlockConfig, variables: &VariableMap) {
    for token in &config.variables {
        let value: String = variables.value_or_empty(*token).to_string();
        match config.layout {
            VariableLayout::Table => blocks.push(Block::Field {
                label: token.label().to_string(),
                value,
            }),
            VariableLayout::List => {
                blocks.push(Block::Bullet(format!("{}: {value}", token.label())));
            }
        }
    }
    blocks.push(Block::Spacer);
}

/// Selects record indices for one collection section.
///
/// Order of operations: type filter, skip already emitted records, sort by
/// timestamp with ties in input order, then limit.
fn select_records<T>(
    records: &[T],
    config: &CollectionConfig,
    seen: &mut HashSet<usize>,
    record_type: impl Fn(&T) -> &str,
    timestamp: impl Fn(&T) -> OffsetDateTime,
) -> Vec<usize> {
    let mut selected: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|&(_, record)| config.includes_type(record_type(record)))
        .filter(|&(index, _)| config.allow_duplicates || !seen.contains(&index))
        .map(|(index, _)| index)
        .collect();

    selected.sort_by(|a, b| {
        let by_time = timestamp(&records[*a]).cmp(&timestamp(&records[*b]));
        let by_time = match config.sort_order {
            SortOrder::Ascending => by_time,
            SortOrder::Descending => by_time.reverse(),
        };
        by_time.then(a.cmp(b))
    });

    if let Some(limit) = config.limit {
        selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    seen.extend(selected.iter().copied());
    selected
}

fn format_timestamp(value: OffsetDateTime) -> String {
    value
        .format(format_description!(
            "[month repr:long] [day padding:none], [year] [hour]:[minute]"
        ))
        .unwrap_or_default()
}

fn update_blocks(
    blocks: &mut Vec<Block>,
    title: &str,
    config: &CollectionConfig,
    updates: &[CaseUpdate],
    seen: &mut HashSet<usize>,
) {
    let selected: Vec<usize> = select_records(
        updates,
        config,
        seen,
        |u| u.update_type.as_str(),
        |u| u.created_at,
    );

    if selected.is_empty() {
        blocks.push(Block::Note(format!("No updates recorded for {title}.")));
        return;
    }

    for index in selected {
        let update: &CaseUpdate = &updates[index];
        blocks.push(Block::EntryHeading(literal_text(&format!(
            "{} ({})",
            update.title, update.update_type
        ))));

        let mut meta: Vec<String> = Vec::new();
        if config.show_timestamps {
            meta.push(format_timestamp(update.created_at));
        }
        if let Some(author) = &update.author_name {
            meta.push(literal_text(&format!("by {author}")));
        }
        if !meta.is_empty() {
            blocks.push(Block::Meta(meta.join(" ")));
        }

        blocks.push(Block::EntryBody(literal_text(&update.body)));
    }
}

fn activity_blocks(
    blocks: &mut Vec<Block>,
    title: &str,
    config: &CollectionConfig,
    activities: &[CaseActivity],
    seen: &mut HashSet<usize>,
) {
    let selected: Vec<usize> = select_records(
        activities,
        config,
        seen,
        |a| a.activity_type.as_str(),
        |a| a.occurred_at,
    );

    if selected.is_empty() {
        blocks.push(Block::Note(format!("No events recorded for {title}.")));
        return;
    }

    for index in selected {
        let activity: &CaseActivity = &activities[index];
        blocks.push(Block::EntryHeading(literal_text(&format!(
            "{} ({})",
            activity.title, activity.activity_type
        ))));

        let mut meta: Vec<String> = Vec::new();
        if config.show_timestamps {
            meta.push(format_timestamp(activity.occurred_at));
        }
        if let Some(location) = &activity.location {
            meta.push(literal_text(&format!("at {location}")));
        }
        if !meta.is_empty() {
            blocks.push(Block::Meta(meta.join(" ")));
        }

        match &activity.description {
            Some(description) if !description.trim().is_empty() => {
                blocks.push(Block::EntryBody(literal_text(description)));
            }
            _ => blocks.push(Block::Spacer),
        }
    }
}

/// Builds the cover page from the same variables as the body.
#[must_use]
pub fn build_cover(template: &ReportTemplate, variables: &VariableMap) -> CoverPage {
    let title: String = template.cover_title.as_deref().map_or_else(
        || variables.value_or_empty(PlaceholderToken::ReportTitle).to_string(),
        |title| substitute_placeholders(title, variables),
    );

    let rows: [(&str, PlaceholderToken); 9] = [
        ("Case Number", PlaceholderToken::CaseNumber),
        ("Subject", PlaceholderToken::PrimarySubject),
        ("Client", PlaceholderToken::ClientList),
        ("Report Date", PlaceholderToken::ReportDate),
        ("Prepared by", PlaceholderToken::OrgName),
        ("Address", PlaceholderToken::OrgAddress),
        ("Phone", PlaceholderToken::OrgPhone),
        ("Email", PlaceholderToken::OrgEmail),
        ("Website", PlaceholderToken::OrgWebsite),
    ];

    let lines: Vec<String> = rows
        .iter()
        .filter_map(|(label, token)| {
            variables
                .get(*token)
                .map(|value| format!("{label}: {value}"))
        })
        .collect();

    CoverPage { title, lines }
}

/// Builds the running header/footer texts.
///
/// Without an explicit header the case number and report title are used.
#[must_use]
pub fn build_running_text(template: &ReportTemplate, variables: &VariableMap) -> RunningText {
    let header: String = template.header_text.as_deref().map_or_else(
        || {
            format!(
                "{} | {}",
                variables.value_or_empty(PlaceholderToken::CaseNumber),
                variables.value_or_empty(PlaceholderToken::ReportTitle)
            )
        },
        |text| substitute_placeholders(text, variables),
    );
    let footer: Option<String> = template
        .footer_text
        .as_deref()
        .map(|text| substitute_placeholders(text, variables));

    RunningText::new(Some(header), footer)
}
