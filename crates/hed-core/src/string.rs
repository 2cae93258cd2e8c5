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

//! The parse tree of one annotation string and its structural checks.

use crate::group::{
    canonical_form, collect_groups, collect_splices, collect_tags, DefinitionName, GroupChild, GroupKind,
    ParsedGroup,
};
use crate::issue::{Issue, IssueCode, IssueSink};
use crate::lex::{Bounds, ColumnSplice, Token};
use crate::schema::{ReservedKind, Schemas};
use crate::tag::{ParsedTag, PLACEHOLDER};
use std::collections::HashSet;
use std::sync::Arc;

/// A fully parsed annotation string.
///
/// Owns its tag tree exclusively. Every accessor walks the tree, so each
/// tag appears exactly once in [`ParsedString::tags`].
#[derive(Debug, Clone)]
pub struct ParsedString {
    hed_string: String,
    children: Vec<GroupChild>,
}

impl ParsedString {
    /// Assemble the tree from lexically clean tokens and run the structural checks.
    pub(crate) fn assemble(
        hed_string: &str,
        tokens: Vec<Token>,
        schemas: &Schemas,
        sink: &mut IssueSink,
    ) -> Self {
        let mut stack: Vec<(usize, Vec<GroupChild>)> = vec![(0, Vec::new())];
        for token in tokens {
            match token {
                Token::Tag(spec) => {
                    let (tag, issues) = ParsedTag::new(spec, schemas);
                    sink.extend(issues);
                    push_child(&mut stack, GroupChild::Tag(tag));
                }
                Token::Splice(splice) => push_child(&mut stack, GroupChild::Splice(splice)),
                Token::GroupOpen(index) => stack.push((index, Vec::new())),
                Token::GroupClose(index) => {
                    if stack.len() > 1 {
                        close_group(&mut stack, index + 1, sink);
                    }
                }
            }
        }
        while stack.len() > 1 {
            close_group(&mut stack, hed_string.len(), sink);
        }
        let children = stack.pop().map(|(_, children)| children).unwrap_or_default();

        let parsed = Self {
            hed_string: hed_string.to_string(),
            children,
        };
        parsed.check_structure(sink);
        parsed
    }

    /// The string as given.
    pub fn hed_string(&self) -> &str {
        &self.hed_string
    }

    /// Top-level elements in source order.
    pub fn children(&self) -> &[GroupChild] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every tag at any depth, in source order.
    pub fn tags(&self) -> Vec<&ParsedTag> {
        let mut out = Vec::new();
        collect_tags(&self.children, &mut out);
        out
    }

    /// Tags not inside any group.
    pub fn top_level_tags(&self) -> Vec<&ParsedTag> {
        self.children
            .iter()
            .filter_map(|c| match c {
                GroupChild::Tag(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Groups directly at the top level.
    pub fn top_level_groups(&self) -> Vec<&ParsedGroup> {
        self.children
            .iter()
            .filter_map(|c| match c {
                GroupChild::Group(group) => Some(group),
                _ => None,
            })
            .collect()
    }

    /// Every group at any depth, depth first.
    pub fn all_groups(&self) -> Vec<&ParsedGroup> {
        let mut out = Vec::new();
        collect_groups(&self.children, &mut out);
        out
    }

    /// Every `{name}` placeholder at any depth.
    pub fn column_splices(&self) -> Vec<&ColumnSplice> {
        let mut out = Vec::new();
        collect_splices(&self.children, &mut out);
        out
    }

    /// Every Definition group at any depth.
    pub fn definitions(&self) -> Vec<&ParsedGroup> {
        self.all_groups().into_iter().filter(|g| g.is_definition()).collect()
    }

    /// Every Onset, Offset and Inset group at any depth.
    pub fn temporal_groups(&self) -> Vec<&ParsedGroup> {
        self.all_groups().into_iter().filter(|g| g.is_temporal()).collect()
    }

    /// Top-level tags that may only appear inside a top-level group.
    pub fn misplaced_top_level_tags(&self) -> Vec<&ParsedTag> {
        self.top_level_tags()
            .into_iter()
            .filter(|tag| tag.requires_top_level_group())
            .collect()
    }

    /// Any tag only meaningful on a timeline.
    pub fn timeline_tags(&self) -> Vec<&ParsedTag> {
        self.tags().into_iter().filter(|tag| tag.is_timeline()).collect()
    }

    /// Order-insensitive canonical text of the whole string.
    pub fn canonical_form(&self) -> String {
        canonical_form(&self.children)
    }

    pub fn format(&self, long: bool) -> String {
        let parts: Vec<String> = self.children.iter().map(|c| c.format(long)).collect();
        parts.join(", ")
    }

    fn check_structure(&self, sink: &mut IssueSink) {
        check_duplicates(&self.children, sink);
        for group in self.all_groups() {
            check_duplicates(group.children(), sink);
        }

        for top in self.top_level_groups() {
            check_reserved_groups(top, true, false, sink);
        }
    }
}

/// Check Definition and temporal groups at any depth. A Definition nested in
/// another Definition is already reported by the outer one.
fn check_reserved_groups(group: &ParsedGroup, is_top: bool, in_definition: bool, sink: &mut IssueSink) {
    match group.kind() {
        GroupKind::Definition if !in_definition => check_definition(group, is_top, sink),
        GroupKind::Onset | GroupKind::Offset | GroupKind::Inset => check_temporal(group, is_top, sink),
        _ => {}
    }
    let in_definition = in_definition || group.is_definition();
    for child in group.groups() {
        check_reserved_groups(child, false, in_definition, sink);
    }
}

fn push_child(stack: &mut [(usize, Vec<GroupChild>)], child: GroupChild) {
    if let Some((_, children)) = stack.last_mut() {
        children.push(child);
    }
}

fn close_group(stack: &mut Vec<(usize, Vec<GroupChild>)>, end: usize, sink: &mut IssueSink) {
    let Some((open, children)) = stack.pop() else {
        return;
    };
    let (group, conflict) = ParsedGroup::new(children, Bounds::new(open, end));
    if let Some(issue) = conflict {
        sink.push(issue);
    }
    push_child(stack, GroupChild::Group(group));
}

/// One `duplicateTag` per repeated tag or group at the same level.
fn check_duplicates(children: &[GroupChild], sink: &mut IssueSink) {
    let mut seen_tags: HashSet<(usize, &str)> = HashSet::new();
    let mut seen_groups: HashSet<String> = HashSet::new();
    for child in children {
        let repeated = match child {
            GroupChild::Tag(tag) => {
                let schema = tag.schema().map(|s| Arc::as_ptr(s) as usize).unwrap_or(0);
                !seen_tags.insert((schema, tag.formatted()))
            }
            GroupChild::Group(group) => !seen_groups.insert(group.canonical_form()),
            GroupChild::Splice(_) => false,
        };
        if repeated {
            sink.push(
                Issue::new(IssueCode::DuplicateTag)
                    .with_context("tag", child.format(false))
                    .with_context("bounds", child.bounds()),
            );
        }
    }
}

fn definition_issue(group: &ParsedGroup, reason: &str) -> Issue {
    let name = group
        .definition_name()
        .map(|n| n.name.to_string())
        .unwrap_or_default();
    Issue::new(IssueCode::InvalidDefinition)
        .with_context("definition", name)
        .with_context("reason", reason)
        .with_context("bounds", group.bounds())
}

/// Definition groups: top level, exactly the Definition tag plus at most one
/// content group, no nested definition machinery, and placeholders matching
/// the declaration.
fn check_definition(group: &ParsedGroup, is_top: bool, sink: &mut IssueSink) {
    if !is_top {
        sink.push(definition_issue(group, "a definition must be a top-level group"));
        return;
    }
    if group.tags().count() > 1 {
        sink.push(definition_issue(group, "a definition may only contain its Definition tag and one group"));
        return;
    }
    let content: Vec<&ParsedGroup> = group.groups().collect();
    if content.len() > 1 {
        sink.push(definition_issue(group, "a definition may contain at most one group"));
        return;
    }
    let content_tags: Vec<&ParsedTag> = content.iter().flat_map(|g| g.all_tags()).collect();
    let nested = content_tags.iter().any(|tag| {
        matches!(
            tag.reserved_kind(),
            Some(ReservedKind::Definition | ReservedKind::Def | ReservedKind::DefExpand)
        )
    });
    if nested {
        sink.push(definition_issue(group, "a definition may not contain Definition, Def or Def-expand tags"));
        return;
    }
    let declared = group
        .definition_name()
        .map(|n| DefinitionName::has_placeholder(&n))
        .unwrap_or(false);
    let placeholders = content_tags.iter().filter(|tag| has_placeholder(tag)).count();
    let expected = usize::from(declared);
    if placeholders != expected {
        sink.push(definition_issue(
            group,
            &format!("expected {} placeholder(s) but found {}", expected, placeholders),
        ));
    }
}

fn has_placeholder(tag: &ParsedTag) -> bool {
    tag.remainder()
        .split(|c: char| c == '/' || c.is_whitespace())
        .any(|part| part == PLACEHOLDER)
}

fn temporal_issue(group: &ParsedGroup, reason: &str) -> Issue {
    Issue::new(IssueCode::TemporalTagError)
        .with_context("group", group.format(false))
        .with_context("reason", reason)
        .with_context("bounds", group.bounds())
}

/// Onset, Offset and Inset groups: top level, exactly one definition
/// reference, at most one content group, and nothing but the reference on an Offset.
fn check_temporal(group: &ParsedGroup, is_top: bool, sink: &mut IssueSink) {
    if !is_top {
        sink.push(temporal_issue(group, "a temporal group must be a top-level group"));
        return;
    }
    let references = group.def_references().len();
    if references != 1 {
        sink.push(temporal_issue(
            group,
            &format!("expected one definition reference but found {}", references),
        ));
        return;
    }
    let extra_tags = group
        .tags()
        .filter(|tag| tag.reserved_kind().is_none())
        .count();
    if extra_tags > 0 {
        sink.push(temporal_issue(group, "only a definition reference and one group may appear"));
        return;
    }
    let content = group.content_groups().count();
    if group.kind() == GroupKind::Offset && content > 0 {
        sink.push(temporal_issue(group, "an Offset group may not carry content"));
    } else if content > 1 {
        sink.push(temporal_issue(group, "at most one content group may appear"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;
    use crate::limits::Limits;
    use crate::schema::{SchemaBuilder, TagDefinition, TOP_LEVEL_ATTRIBUTE};

    fn schemas() -> Schemas {
        let schema = SchemaBuilder::new("8.3.0")
            .tags([
                TagDefinition::new("Red"),
                TagDefinition::new("Blue"),
                TagDefinition::new("Label"),
                TagDefinition::new("Label/#"),
                TagDefinition::new("Event-context").attribute(TOP_LEVEL_ATTRIBUTE),
                TagDefinition::new("Definition"),
                TagDefinition::new("Definition/#"),
                TagDefinition::new("Def"),
                TagDefinition::new("Def/#"),
                TagDefinition::new("Def-expand"),
                TagDefinition::new("Def-expand/#"),
                TagDefinition::new("Onset"),
                TagDefinition::new("Offset"),
            ])
            .build()
            .unwrap();
        Schemas::single(schema)
    }

    fn assemble(input: &str) -> (ParsedString, Vec<IssueCode>) {
        let (tokens, lexical) = tokenize(input, &Limits::default());
        assert!(lexical.is_empty(), "{:?}", lexical);
        let mut sink = IssueSink::default();
        let parsed = ParsedString::assemble(input, tokens, &schemas(), &mut sink);
        let codes = sink.issues().iter().map(Issue::code).collect();
        (parsed, codes)
    }

    // ==================== Tree tests ====================

    #[test]
    fn test_tree_accessors() {
        let (parsed, codes) = assemble("Red, (Blue, (Label/x)), {col}");
        assert!(codes.is_empty());
        assert_eq!(parsed.tags().len(), 3);
        assert_eq!(parsed.top_level_tags().len(), 1);
        assert_eq!(parsed.top_level_groups().len(), 1);
        assert_eq!(parsed.all_groups().len(), 2);
        assert_eq!(parsed.column_splices().len(), 1);
        assert_eq!(parsed.format(false), "Red, (Blue, (Label/x)), {col}");
    }

    #[test]
    fn test_group_bounds() {
        let (parsed, _) = assemble("Red, (Blue)");
        assert_eq!(parsed.top_level_groups()[0].bounds(), Bounds::new(5, 11));
    }

    #[test]
    fn test_misplaced_top_level_tags() {
        let (parsed, _) = assemble("Event-context, (Event-context, Red)");
        let misplaced = parsed.misplaced_top_level_tags();
        assert_eq!(misplaced.len(), 1);
        assert_eq!(misplaced[0].bounds(), Bounds::new(0, 13));
        assert_eq!(parsed.timeline_tags().len(), 0);
    }

    // ==================== Duplicate tests ====================

    #[test]
    fn test_duplicates_per_level() {
        assert_eq!(assemble("Red, red").1, [IssueCode::DuplicateTag]);
        assert!(assemble("Red, (Red)").1.is_empty());
        assert_eq!(assemble("(Red, Blue), (Blue, Red)").1, [IssueCode::DuplicateTag]);
        assert_eq!(assemble("(Red, Red, Red)").1, [IssueCode::DuplicateTag, IssueCode::DuplicateTag]);
    }

    // ==================== Definition tests ====================

    #[test]
    fn test_valid_definitions() {
        assert!(assemble("(Definition/A, (Red, Blue))").1.is_empty());
        assert!(assemble("(Definition/A)").1.is_empty());
        assert!(assemble("(Definition/B/#, (Label/#))").1.is_empty());
    }

    #[test]
    fn test_invalid_definitions() {
        for input in [
            "(Red, (Definition/A, (Blue)))",
            "(Definition/A, Red, (Blue))",
            "(Definition/A, (Red), (Blue))",
            "(Definition/A, (Def/B))",
            "(Definition/A, (Red, (Def-expand/B, (Blue))))",
            "(Definition/A/#, (Red))",
            "(Definition/A, (Label/#))",
            "(Definition/A, (Red, (Definition/B)))",
            "(Definition/A, ((Definition/B, (Blue))))",
        ] {
            assert_eq!(assemble(input).1, [IssueCode::InvalidDefinition], "{}", input);
        }
    }

    // ==================== Temporal tests ====================

    #[test]
    fn test_valid_temporal_groups() {
        for input in [
            "(Onset, Def/A)",
            "(Onset, (Def/A))",
            "(Onset, Def/A, (Red, Blue))",
            "(Onset, (Def-expand/A, (Red)), (Blue))",
            "(Offset, Def/A)",
        ] {
            assert!(assemble(input).1.is_empty(), "{}", input);
        }
    }

    #[test]
    fn test_invalid_temporal_groups() {
        for input in [
            "(Onset, (Red))",
            "(Onset, Def/A, Def/B)",
            "(Onset, Def/A, Red)",
            "(Onset, Def/A, (Red), (Blue))",
            "(Offset, Def/A, (Red))",
            "(Red, (Onset, Def/A))",
        ] {
            assert_eq!(assemble(input).1, [IssueCode::TemporalTagError], "{}", input);
        }
    }

    #[test]
    fn test_conflicting_markers() {
        assert_eq!(assemble("(Onset, Offset, Def/A)").1, [IssueCode::ConflictingReservedTags]);
        assert_eq!(assemble("(Onset, Onset, Def/A)").1, [IssueCode::ConflictingReservedTags, IssueCode::DuplicateTag]);
    }
}
