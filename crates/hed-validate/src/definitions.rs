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

//! Definition extraction and lookup.
//!
//! Definitions are keyed by their case-insensitive name. Re-declaring a name
//! with an equivalent template is harmless; a differing template is a
//! `duplicateDefinition` and marks every declaration under that name invalid
//! for use as a reference. Lookups always return the first declaration seen.

use hed_core::lex::Bounds;
use hed_core::{DefinitionName, Issue, IssueCode, ParsedGroup, ParsedString};
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One declared definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Definition {
    name: String,
    placeholder: bool,
    template: String,
    source: usize,
    bounds: Bounds,
    valid: bool,
}

impl Definition {
    /// Read a Definition group. `None` if the group is not one or has no name.
    pub fn from_group(group: &ParsedGroup, source: usize) -> Option<Self> {
        if !group.is_definition() {
            return None;
        }
        let name = group.definition_name()?;
        if name.name.trim().is_empty() {
            return None;
        }
        let template: Vec<String> = group.groups().map(ParsedGroup::canonical_form).collect();
        Some(Self {
            name: name.name.to_string(),
            placeholder: name.has_placeholder(),
            template: template.join(","),
            source,
            bounds: group.bounds(),
            valid: true,
        })
    }

    /// The name as first written.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Declared with a `#` value placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Order-insensitive canonical form of the content group.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Index of the string the definition came from.
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// False once a conflicting declaration of the same name was seen.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Same placeholder declaration and same canonical template.
    pub fn equivalent(&self, other: &Definition) -> bool {
        self.placeholder == other.placeholder && self.template == other.template
    }
}

/// Definitions indexed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionTable {
    entries: BTreeMap<String, Vec<Definition>>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Returns one `duplicateDefinition` issue per
    /// previously declared, non-equivalent template under the same name.
    pub fn insert(&mut self, definition: Definition) -> Vec<Issue> {
        let declared = self.entries.entry(definition.key()).or_default();
        if declared.iter().any(|d| d.equivalent(&definition)) {
            return Vec::new();
        }
        let issues: Vec<Issue> = declared
            .iter()
            .map(|existing| {
                Issue::new(IssueCode::DuplicateDefinition)
                    .with_context("definition", &definition.name)
                    .with_context("bounds", definition.bounds)
                    .with_context("previousBounds", existing.bounds)
            })
            .collect();
        let conflicted = !issues.is_empty();
        declared.push(definition);
        if conflicted {
            declared.iter_mut().for_each(|d| d.valid = false);
        }
        issues
    }

    /// The first declaration of a name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(&name.to_lowercase()).and_then(|v| v.first())
    }

    /// The declaration a reference resolves to, if the reference is usable.
    pub fn resolve(&self, reference: &DefinitionName<'_>) -> Option<&Definition> {
        self.get(reference.name).filter(|d| d.is_valid())
    }

    /// Every retained declaration of a name.
    pub fn all(&self, name: &str) -> &[Definition] {
        self.entries
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.entries.values().filter_map(|v| v.first())
    }
}

/// Collect every Definition group from already-parsed strings.
///
/// Definition groups without a name are reported as `invalidDefinition`.
pub fn extract_definitions<'a, I>(parsed: I) -> (DefinitionTable, Vec<Issue>)
where
    I: IntoIterator<Item = &'a ParsedString>,
{
    let mut table = DefinitionTable::new();
    let mut issues = Vec::new();
    let mut strings = 0;

    for (source, string) in parsed.into_iter().enumerate() {
        strings += 1;
        for group in string.definitions() {
            match Definition::from_group(group, source) {
                Some(definition) => issues.extend(table.insert(definition)),
                None => issues.push(
                    Issue::new(IssueCode::InvalidDefinition)
                        .with_context("reason", "a definition needs a name")
                        .with_context("bounds", group.bounds())
                        .with_context("string", string.hed_string()),
                ),
            }
        }
    }

    debug!(
        "Extracted {} definitions from {} strings with {} issues",
        table.len(),
        strings,
        issues.len()
    );
    (table, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::schema::{SchemaBuilder, Schemas, TagDefinition};
    use hed_core::{parse, ParseOptions};

    fn schemas() -> Schemas {
        let schema = SchemaBuilder::new("8.3.0")
            .tags([
                TagDefinition::new("Event"),
                TagDefinition::new("Event/Sensory-event"),
                TagDefinition::new("Red"),
                TagDefinition::new("Blue"),
                TagDefinition::new("Label"),
                TagDefinition::new("Label/#"),
                TagDefinition::new("Definition"),
                TagDefinition::new("Definition/#"),
            ])
            .build()
            .unwrap();
        Schemas::single(schema)
    }

    fn parsed(strings: &[&str]) -> Vec<ParsedString> {
        let schemas = schemas();
        strings
            .iter()
            .map(|s| {
                let (parsed, errors, _) = parse(s, &schemas, &ParseOptions::default());
                assert!(errors.is_empty(), "{:?}", errors);
                parsed.unwrap()
            })
            .collect()
    }

    // ==================== Extraction tests ====================

    #[test]
    fn test_extracts_definitions() {
        let strings = parsed(&["(Definition/MyDef, (Red, Blue)), Sensory-event", "(Definition/Speed/#, (Label/#))"]);
        let (table, issues) = extract_definitions(&strings);
        assert!(issues.is_empty());
        assert_eq!(table.len(), 2);
        let speed = table.get("speed").unwrap();
        assert_eq!(speed.name(), "Speed");
        assert!(speed.has_placeholder());
        assert_eq!(speed.source(), 1);
        assert!(!table.get("MyDef").unwrap().has_placeholder());
    }

    #[test]
    fn test_template_is_order_insensitive() {
        let strings = parsed(&["(Definition/MyDef, (Red, Blue))", "(Definition/mydef, (Blue, Red))"]);
        let (table, issues) = extract_definitions(&strings);
        assert!(issues.is_empty());
        assert_eq!(table.all("MyDef").len(), 1);
        assert!(table.get("MyDef").unwrap().is_valid());
    }

    // ==================== Duplicate tests ====================

    #[test]
    fn test_conflicting_templates() {
        let strings = parsed(&["(Definition/MyDef, (Red))", "(Definition/MyDef, (Blue))"]);
        let (table, issues) = extract_definitions(&strings);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), IssueCode::DuplicateDefinition);
        assert_eq!(issues[0].get("definition"), Some("MyDef"));

        let all = table.all("MyDef");
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|d| !d.is_valid()));
        assert_eq!(table.get("MyDef").unwrap().source(), 0);
        assert!(table.resolve(&DefinitionName::parse("MyDef")).is_none());
    }

    #[test]
    fn test_one_issue_per_conflicting_pair() {
        let strings = parsed(&[
            "(Definition/MyDef, (Red))",
            "(Definition/MyDef, (Blue))",
            "(Definition/MyDef, (Red))",
            "(Definition/MyDef, (Sensory-event))",
        ]);
        let (table, issues) = extract_definitions(&strings);
        assert_eq!(issues.len(), 3);
        assert_eq!(table.all("MyDef").len(), 3);
    }

    #[test]
    fn test_placeholder_difference_conflicts() {
        let strings = parsed(&["(Definition/Speed/#, (Label/#))", "(Definition/Speed, (Label/Fast))"]);
        let (_, issues) = extract_definitions(&strings);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_resolve_valid_reference() {
        let strings = parsed(&["(Definition/MyDef, (Red))"]);
        let (table, _) = extract_definitions(&strings);
        assert!(table.resolve(&DefinitionName::parse("mydef")).is_some());
        assert!(table.resolve(&DefinitionName::parse("Other")).is_none());
        assert!(table.all("Other").is_empty());
    }
}
