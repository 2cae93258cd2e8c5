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

//! Onset, Offset and Inset scoping across the rows of a time-indexed table.
//!
//! Rows are processed in the order they appear. An Onset group opens the
//! scope named by its definition reference, a matching Offset closes it and
//! an Inset must fall inside an open scope. A scope still open after the last
//! row is not an error.

use crate::definitions::DefinitionTable;
use hed_core::{DefinitionName, GroupKind, HedError, Issue, IssueCode, ParsedGroup, ParsedString};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The onset column of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Onset {
    /// Seconds from the start of the recording.
    Time(f64),
    /// `n/a`: the row is not anchored to the timeline.
    NotApplicable,
}

impl Onset {
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::Time(t) => Some(*t),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Time(_))
    }

    /// Hashable identity. Negative and positive zero coincide.
    pub(crate) fn key(&self) -> Option<u64> {
        self.time().map(|t| if t == 0.0 { 0 } else { t.to_bits() })
    }
}

impl FromStr for Onset {
    type Err = HedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("n/a") {
            return Ok(Self::NotApplicable);
        }
        match text.parse::<f64>() {
            Ok(t) if t.is_finite() => Ok(Self::Time(t)),
            _ => Err(HedError::value(format!("onset '{}' is neither a number nor n/a", text))),
        }
    }
}

impl fmt::Display for Onset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(t) => write!(f, "{}", t),
            Self::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Which temporal marker a group carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemporalKind {
    Onset,
    Offset,
    Inset,
}

impl TemporalKind {
    pub fn from_group_kind(kind: GroupKind) -> Option<Self> {
        match kind {
            GroupKind::Onset => Some(Self::Onset),
            GroupKind::Offset => Some(Self::Offset),
            GroupKind::Inset => Some(Self::Inset),
            _ => None,
        }
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Onset => "Onset",
            Self::Offset => "Offset",
            Self::Inset => "Inset",
        }
    }
}

/// A parsed row on the timeline.
#[derive(Debug, Clone, Copy)]
pub struct TemporalRow<'a> {
    pub parsed: &'a ParsedString,
    pub onset: Onset,
    /// Line in the source table, used in issue context.
    pub line: usize,
}

impl<'a> TemporalRow<'a> {
    pub fn new(parsed: &'a ParsedString, onset: Onset, line: usize) -> Self {
        Self { parsed, onset, line }
    }
}

/// One temporal group placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemporalEvent {
    pub kind: TemporalKind,
    /// Definition reference as written, value included.
    pub definition: String,
    /// Lower-cased scope identity: definition name plus its value, if any.
    pub scope: String,
    pub onset: f64,
    pub line: usize,
    /// The group in short form.
    pub group: String,
}

fn scope_key(reference: &DefinitionName<'_>) -> String {
    match reference.value {
        Some(value) => format!("{}/{}", reference.name, value).to_lowercase(),
        None => reference.key(),
    }
}

fn reference_text(reference: &DefinitionName<'_>) -> String {
    match reference.value {
        Some(value) => format!("{}/{}", reference.name, value),
        None => reference.name.to_string(),
    }
}

/// Builds the event timeline from parsed rows and runs the scope state machine.
pub struct EventManager<'t> {
    definitions: &'t DefinitionTable,
}

impl<'t> EventManager<'t> {
    pub fn new(definitions: &'t DefinitionTable) -> Self {
        Self { definitions }
    }

    /// Turn every top-level temporal group into an event.
    ///
    /// Reports temporal groups on rows without an onset, groups whose
    /// reference does not fit its definition, and the same scope appearing
    /// twice at one onset.
    pub fn parse_events(&self, rows: &[TemporalRow<'_>]) -> (Vec<TemporalEvent>, Vec<Issue>) {
        let mut events = Vec::new();
        let mut issues = Vec::new();
        let mut seen: HashSet<(u64, String)> = HashSet::new();

        for row in rows {
            let groups: Vec<&ParsedGroup> = row
                .parsed
                .top_level_groups()
                .into_iter()
                .filter(|g| g.is_temporal())
                .collect();
            let Some(first) = groups.first() else {
                continue;
            };
            let Some(time) = row.onset.time() else {
                let marker = first
                    .tags()
                    .find(|tag| tag.is_timeline())
                    .map(|tag| tag.format(false))
                    .unwrap_or_else(|| first.format(false));
                issues.push(
                    Issue::new(IssueCode::TemporalTagInNonTemporalContext)
                        .with_context("tag", marker)
                        .with_context("string", row.parsed.hed_string())
                        .with_context("tsvLine", row.line),
                );
                continue;
            };

            for group in groups {
                let Some(kind) = TemporalKind::from_group_kind(group.kind()) else {
                    continue;
                };
                let event = match self.event(group, kind, time, row.line) {
                    Ok(event) => event,
                    Err(issue) => {
                        issues.push(issue);
                        continue;
                    }
                };
                let identity = (row.onset.key().unwrap_or_default(), event.scope.clone());
                if !seen.insert(identity) {
                    issues.push(
                        Issue::new(IssueCode::DuplicateTemporalEvent)
                            .with_context("definition", &event.definition)
                            .with_context("group", &event.group)
                            .with_context("tsvLine", row.line),
                    );
                    continue;
                }
                events.push(event);
            }
        }

        debug!(
            "Built {} temporal events from {} rows with {} issues",
            events.len(),
            rows.len(),
            issues.len()
        );
        (events, issues)
    }

    fn event(
        &self,
        group: &ParsedGroup,
        kind: TemporalKind,
        onset: f64,
        line: usize,
    ) -> Result<TemporalEvent, Issue> {
        let malformed = |reason: String| {
            Issue::new(IssueCode::TemporalTagError)
                .with_context("group", group.format(false))
                .with_context("reason", reason)
                .with_context("tsvLine", line)
        };
        let references = group.def_references();
        let [reference] = references.as_slice() else {
            return Err(malformed(format!(
                "expected one definition reference but found {}",
                references.len()
            )));
        };
        if let Some(definition) = self.definitions.get(reference.name) {
            if definition.has_placeholder() != reference.value.is_some() {
                let reason = if definition.has_placeholder() {
                    format!("definition {} takes a value", definition.name())
                } else {
                    format!("definition {} does not take a value", definition.name())
                };
                return Err(malformed(reason));
            }
        }
        Ok(TemporalEvent {
            kind,
            definition: reference_text(reference),
            scope: scope_key(reference),
            onset,
            line,
            group: group.format(false),
        })
    }

    /// Walk the events in row order and check every Offset and Inset
    /// against the open scopes.
    pub fn validate(&self, events: &[TemporalEvent]) -> Vec<Issue> {
        let mut open: HashMap<&str, usize> = HashMap::new();
        let mut issues = Vec::new();

        for event in events {
            match event.kind {
                TemporalKind::Onset => {
                    open.insert(event.scope.as_str(), event.line);
                }
                TemporalKind::Offset | TemporalKind::Inset => {
                    let active = if event.kind == TemporalKind::Offset {
                        open.remove(event.scope.as_str()).is_some()
                    } else {
                        open.contains_key(event.scope.as_str())
                    };
                    if !active {
                        issues.push(
                            Issue::new(IssueCode::InactiveOnset)
                                .with_context("tag", event.kind.tag_name())
                                .with_context("definition", &event.definition)
                                .with_context("tsvLine", event.line),
                        );
                    }
                }
            }
        }

        debug!(
            "Temporal pass over {} events: {} issues, {} scopes left open",
            events.len(),
            issues.len(),
            open.len()
        );
        issues
    }
}

/// Build the timeline and, if it is well formed, check the scopes.
pub fn validate_temporal(rows: &[TemporalRow<'_>], definitions: &DefinitionTable) -> Vec<Issue> {
    let manager = EventManager::new(definitions);
    let (events, issues) = manager.parse_events(rows);
    if !issues.is_empty() {
        return issues;
    }
    manager.validate(&events)
}
