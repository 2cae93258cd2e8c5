// Dweve HED - Hierarchical Event Descriptor validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Validation of the HED column of an event table.
//!
//! # Pipeline
//!
//! 1. Parse every row (in parallel for large tables); errors stop here
//! 2. Reject column splices in the HED column
//! 3. Reject top-level tags that belong inside a top-level group
//! 4. Timeline tables: build the events, re-parse rows sharing an onset as
//!    one string for duplicate detection, then check the scopes
//! 5. Other tables: reject every timeline tag
//!
//! Each stage only runs if the previous ones found no errors. Every issue
//! carries the `tsvLine` of the row it came from.

use crate::definitions::{extract_definitions, DefinitionTable};
use crate::temporal::{EventManager, Onset, TemporalRow};
use hed_core::schema::Schemas;
use hed_core::{parse, parse_many, split_issues, Issue, IssueCode, ParseOptions, ParsedString};
use std::collections::HashMap;
use tracing::debug;

/// Settings for [`DatasetValidator`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    pub parse: ParseOptions,
    /// The table has a meaningful onset column.
    pub timeline: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            timeline: true,
        }
    }
}

impl ValidatorConfig {
    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_timeline(mut self, timeline: bool) -> Self {
        self.timeline = timeline;
        self
    }
}

/// One row of an event table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub hed: String,
    pub onset: Onset,
    pub line: usize,
}

impl EventRow {
    pub fn new(hed: impl Into<String>, onset: Onset, line: usize) -> Self {
        Self {
            hed: hed.into(),
            onset,
            line,
        }
    }
}

/// Outcome of validating one table.
#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// Parse tree of each row, `None` where lexing failed.
    pub parsed: Vec<Option<ParsedString>>,
}

impl DatasetReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn extend(&mut self, issues: Vec<Issue>) {
        let (errors, warnings) = split_issues(issues);
        self.errors.extend(errors);
        self.warnings.extend(warnings);
    }
}

/// Validates event tables against a fixed set of schemas.
pub struct DatasetValidator<'s> {
    schemas: &'s Schemas,
    config: ValidatorConfig,
}

impl<'s> DatasetValidator<'s> {
    pub fn new(schemas: &'s Schemas, config: ValidatorConfig) -> Self {
        Self { schemas, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Parse sidecar strings and collect their definitions.
    pub fn definitions<S>(&self, hed_strings: &[S]) -> (DefinitionTable, Vec<Issue>)
    where
        S: AsRef<str> + Sync,
    {
        let (parsed, by_index) = parse_many(hed_strings, self.schemas, &self.config.parse);
        let mut issues: Vec<Issue> = by_index.into_values().flatten().collect();
        let (table, definition_issues) = extract_definitions(parsed.iter().flatten());
        issues.extend(definition_issues);
        (table, issues)
    }

    pub fn validate(&self, rows: &[EventRow], definitions: &DefinitionTable) -> DatasetReport {
        debug!(
            "Validating {} rows (timeline: {})",
            rows.len(),
            self.config.timeline
        );
        let mut report = DatasetReport::default();

        let hed: Vec<&str> = rows.iter().map(|row| row.hed.as_str()).collect();
        let (parsed, by_index) = parse_many(&hed, self.schemas, &self.config.parse);
        for (index, issues) in by_index {
            report.extend(with_line(issues, rows[index].line));
        }
        report.parsed = parsed;
        if !report.is_valid() {
            debug!("Stopping after row parsing: {} errors", report.errors.len());
            return report;
        }

        let parsed_rows: Vec<(&EventRow, &ParsedString)> = rows
            .iter()
            .zip(&report.parsed)
            .filter_map(|(row, parsed)| parsed.as_ref().map(|p| (row, p)))
            .collect();

        let mut issues = check_splices(&parsed_rows);
        if issues.is_empty() {
            issues = check_top_level_tags(&parsed_rows);
        }
        if issues.is_empty() {
            issues = if self.config.timeline {
                self.check_timeline(&parsed_rows, definitions)
            } else {
                check_no_timeline(&parsed_rows)
            };
        }
        report.extend(issues);
        debug!(
            "Validated {} rows: {} errors, {} warnings",
            rows.len(),
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    fn check_timeline(
        &self,
        parsed_rows: &[(&EventRow, &ParsedString)],
        definitions: &DefinitionTable,
    ) -> Vec<Issue> {
        let timeline: Vec<TemporalRow<'_>> = parsed_rows
            .iter()
            .map(|(row, parsed)| TemporalRow::new(parsed, row.onset, row.line))
            .collect();
        let manager = EventManager::new(definitions);
        let (events, issues) = manager.parse_events(&timeline);
        if !issues.is_empty() {
            return issues;
        }

        let issues = self.check_shared_onsets(parsed_rows);
        if issues.iter().any(Issue::is_error) {
            return issues;
        }
        let mut issues = issues;
        issues.extend(manager.validate(&events));
        issues
    }

    /// Re-parse the rows sharing one onset as a single comma-joined string
    /// so the ordinary duplicate-tag check spans them.
    fn check_shared_onsets(&self, parsed_rows: &[(&EventRow, &ParsedString)]) -> Vec<Issue> {
        let mut order: Vec<Vec<&EventRow>> = Vec::new();
        let mut index: HashMap<Option<u64>, usize> = HashMap::new();
        for (row, _) in parsed_rows {
            if row.hed.trim().is_empty() {
                continue;
            }
            let slot = *index.entry(row.onset.key()).or_insert_with(|| {
                order.push(Vec::new());
                order.len() - 1
            });
            order[slot].push(row);
        }

        let mut issues = Vec::new();
        for shared in order.into_iter().filter(|rows| rows.len() > 1) {
            let joined: Vec<&str> = shared.iter().map(|row| row.hed.as_str()).collect();
            let lines: Vec<String> = shared.iter().map(|row| row.line.to_string()).collect();
            let (_, errors, warnings) = parse(&joined.join(","), self.schemas, &self.config.parse);
            let tag = |mut issue: Issue| {
                issue.set_context("tsvLine", lines.join(","));
                issue
            };
            issues.extend(errors.into_iter().map(tag));
            issues.extend(warnings.into_iter().map(tag));
        }
        debug!("Shared-onset duplicate check: {} issues", issues.len());
        issues
    }
}

fn with_line(issues: Vec<Issue>, line: usize) -> Vec<Issue> {
    issues
        .into_iter()
        .map(|mut issue| {
            issue.set_context("tsvLine", line);
            issue
        })
        .collect()
}

fn check_splices(parsed_rows: &[(&EventRow, &ParsedString)]) -> Vec<Issue> {
    parsed_rows
        .iter()
        .filter(|(_, parsed)| !parsed.column_splices().is_empty())
        .map(|(row, parsed)| {
            Issue::new(IssueCode::CurlyBracesInHedColumn)
                .with_context("string", parsed.hed_string())
                .with_context("tsvLine", row.line)
        })
        .collect()
}

fn check_top_level_tags(parsed_rows: &[(&EventRow, &ParsedString)]) -> Vec<Issue> {
    parsed_rows
        .iter()
        .filter_map(|(row, parsed)| {
            let misplaced = parsed.misplaced_top_level_tags();
            if misplaced.is_empty() {
                return None;
            }
            let tags: Vec<String> = misplaced.iter().map(|tag| tag.format(false)).collect();
            Some(
                Issue::new(IssueCode::InvalidTopLevelTag)
                    .with_context("tag", tags.join(", "))
                    .with_context("string", parsed.hed_string())
                    .with_context("tsvLine", row.line),
            )
        })
        .collect()
}

fn check_no_timeline(parsed_rows: &[(&EventRow, &ParsedString)]) -> Vec<Issue> {
    parsed_rows
        .iter()
        .filter_map(|(row, parsed)| {
            let timeline = parsed.timeline_tags();
            let first = timeline.first()?;
            Some(
                Issue::new(IssueCode::TemporalTagInNonTemporalContext)
                    .with_context("tag", first.format(false))
                    .with_context("string", parsed.hed_string())
                    .with_context("tsvLine", row.line),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::schema::{SchemaBuilder, TagDefinition, TOP_LEVEL_ATTRIBUTE};

    fn schemas() -> Schemas {
        let schema = SchemaBuilder::new("8.3.0")
            .tags([
                TagDefinition::new("Red"),
                TagDefinition::new("Blue"),
                TagDefinition::new("Event-context").attribute(TOP_LEVEL_ATTRIBUTE),
                TagDefinition::new("Def"),
                TagDefinition::new("Def/#"),
                TagDefinition::new("Onset"),
                TagDefinition::new("Offset"),
            ])
            .build()
            .unwrap();
        Schemas::single(schema)
    }

    fn rows(strings: &[&str]) -> Vec<EventRow> {
        strings
            .iter()
            .enumerate()
            .map(|(i, s)| EventRow::new(*s, Onset::Time(i as f64), i + 2))
            .collect()
    }

    fn codes(report: &DatasetReport) -> Vec<IssueCode> {
        report.errors.iter().map(Issue::code).collect()
    }

    // ==================== Stage tests ====================

    #[test]
    fn test_parse_errors_stop_pipeline() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let report = validator.validate(&rows(&["Red,,Blue", "(Offset, Def/X)"]), &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::EmptyTagFound]);
        assert_eq!(report.errors[0].get("tsvLine"), Some("2"));
        assert!(report.parsed[0].is_none());
        assert!(report.parsed[1].is_some());
    }

    #[test]
    fn test_splices_rejected() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let report = validator.validate(&rows(&["Red, {stim}"]), &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::CurlyBracesInHedColumn]);
    }

    #[test]
    fn test_top_level_tags() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let report = validator.validate(&rows(&["Event-context, Red", "(Event-context, Blue)"]), &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::InvalidTopLevelTag]);
        assert_eq!(report.errors[0].get("tag"), Some("Event-context"));
    }

    #[test]
    fn test_timeline_scopes() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let report = validator.validate(&rows(&["(Offset, Def/X)"]), &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::InactiveOnset]);
    }

    #[test]
    fn test_non_timeline_rejects_temporal_tags() {
        let schemas = schemas();
        let config = ValidatorConfig::default().with_timeline(false);
        let validator = DatasetValidator::new(&schemas, config);
        let report = validator.validate(&rows(&["Red", "(Onset, Def/X)"]), &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::TemporalTagInNonTemporalContext]);
        assert_eq!(report.errors[0].get("tsvLine"), Some("3"));
    }

    #[test]
    fn test_shared_onset_duplicates() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let rows = vec![
            EventRow::new("Red", Onset::Time(1.0), 2),
            EventRow::new("Blue, Red", Onset::Time(1.0), 3),
            EventRow::new("Red", Onset::Time(2.0), 4),
        ];
        let report = validator.validate(&rows, &DefinitionTable::new());
        assert_eq!(codes(&report), [IssueCode::DuplicateTag]);
        assert_eq!(report.errors[0].get("tsvLine"), Some("2,3"));
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let schemas = schemas();
        let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
        let rows = vec![
            EventRow::new("Red", Onset::Time(1.0), 2),
            EventRow::new("", Onset::Time(1.0), 3),
        ];
        assert!(validator.validate(&rows, &DefinitionTable::new()).is_valid());
    }
}
