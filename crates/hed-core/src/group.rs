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

//! Parenthesized tag groups.

use crate::issue::{Issue, IssueCode};
use crate::lex::{Bounds, ColumnSplice};
use crate::schema::ReservedKind;
use crate::tag::{ParsedTag, PLACEHOLDER};

/// One element of a group or of the top level of a string.
#[derive(Debug, Clone)]
pub enum GroupChild {
    Tag(ParsedTag),
    Group(ParsedGroup),
    Splice(ColumnSplice),
}

impl GroupChild {
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Tag(tag) => tag.bounds(),
            Self::Group(group) => group.bounds(),
            Self::Splice(splice) => splice.bounds(),
        }
    }

    /// Order-insensitive canonical text used for group equality.
    pub fn canonical_form(&self) -> String {
        match self {
            Self::Tag(tag) => tag.formatted().to_string(),
            Self::Group(group) => format!("({})", group.canonical_form()),
            Self::Splice(splice) => format!("{{{}}}", splice.name().to_lowercase()),
        }
    }

    pub fn format(&self, long: bool) -> String {
        match self {
            Self::Tag(tag) => tag.format(long),
            Self::Group(group) => group.format(long),
            Self::Splice(splice) => format!("{{{}}}", splice.name()),
        }
    }
}

/// Classification of a group by the reserved tag among its direct children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Plain,
    Definition,
    DefExpand,
    Onset,
    Offset,
    Inset,
}

impl GroupKind {
    fn from_reserved(kind: ReservedKind) -> Option<Self> {
        match kind {
            ReservedKind::Definition => Some(Self::Definition),
            ReservedKind::DefExpand => Some(Self::DefExpand),
            ReservedKind::Onset => Some(Self::Onset),
            ReservedKind::Offset => Some(Self::Offset),
            ReservedKind::Inset => Some(Self::Inset),
            ReservedKind::Def => None,
        }
    }

    /// Onset, Offset and Inset groups.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Onset | Self::Offset | Self::Inset)
    }
}

/// A definition name with an optional `#` placeholder, as declared or referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionName<'a> {
    /// Name as written.
    pub name: &'a str,
    /// Text after the name (`#` in a declaration, a value in a reference).
    pub value: Option<&'a str>,
}

impl<'a> DefinitionName<'a> {
    /// Split the value of a `Definition/`, `Def/` or `Def-expand/` tag.
    pub fn parse(value: &'a str) -> Self {
        match value.split_once('/') {
            Some((name, rest)) => Self {
                name,
                value: Some(rest),
            },
            None => Self { name: value, value: None },
        }
    }

    pub fn has_placeholder(&self) -> bool {
        self.value == Some(PLACEHOLDER)
    }

    /// Lower-cased lookup key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// One parenthesized group of a parsed string.
#[derive(Debug, Clone)]
pub struct ParsedGroup {
    children: Vec<GroupChild>,
    bounds: Bounds,
    kind: GroupKind,
}

impl ParsedGroup {
    /// Build a group and classify it from its direct child tags.
    ///
    /// Two reserved classifiers among the direct children leave the group
    /// `Plain` and yield a `conflictingReservedTags` issue.
    pub fn new(children: Vec<GroupChild>, bounds: Bounds) -> (Self, Option<Issue>) {
        let markers: Vec<GroupKind> = children
            .iter()
            .filter_map(|child| match child {
                GroupChild::Tag(tag) => tag.reserved_kind().and_then(GroupKind::from_reserved),
                _ => None,
            })
            .collect();
        let (kind, issue) = match markers.as_slice() {
            [] => (GroupKind::Plain, None),
            [single] => (*single, None),
            _ => (GroupKind::Plain, Some(())),
        };
        let group = Self {
            children,
            bounds,
            kind,
        };
        let issue = issue.map(|_| {
            Issue::new(IssueCode::ConflictingReservedTags)
                .with_context("group", group.format(false))
                .with_context("bounds", bounds)
        });
        (group, issue)
    }

    pub fn children(&self) -> &[GroupChild] {
        &self.children
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn is_definition(&self) -> bool {
        self.kind == GroupKind::Definition
    }

    pub fn is_def_expand(&self) -> bool {
        self.kind == GroupKind::DefExpand
    }

    pub fn is_temporal(&self) -> bool {
        self.kind.is_temporal()
    }

    /// Direct child tags.
    pub fn tags(&self) -> impl Iterator<Item = &ParsedTag> {
        self.children.iter().filter_map(|c| match c {
            GroupChild::Tag(tag) => Some(tag),
            _ => None,
        })
    }

    /// Direct child groups.
    pub fn groups(&self) -> impl Iterator<Item = &ParsedGroup> {
        self.children.iter().filter_map(|c| match c {
            GroupChild::Group(group) => Some(group),
            _ => None,
        })
    }

    /// Every tag in this group and its subgroups, in source order.
    pub fn all_tags(&self) -> Vec<&ParsedTag> {
        let mut out = Vec::new();
        collect_tags(&self.children, &mut out);
        out
    }

    /// This group followed by every nested group, depth first.
    pub fn all_groups(&self) -> Vec<&ParsedGroup> {
        let mut out = vec![self];
        collect_groups(&self.children, &mut out);
        out
    }

    /// Direct child tag carrying the given reserved classification.
    pub fn reserved_tag(&self, kind: ReservedKind) -> Option<&ParsedTag> {
        self.tags().find(|tag| tag.reserved_kind() == Some(kind))
    }

    /// Name declared by a Definition group, or referenced by a Def-expand group.
    pub fn definition_name(&self) -> Option<DefinitionName<'_>> {
        let marker = match self.kind {
            GroupKind::Definition => ReservedKind::Definition,
            GroupKind::DefExpand => ReservedKind::DefExpand,
            _ => return None,
        };
        let value = self.reserved_tag(marker)?.value()?;
        Some(DefinitionName::parse(value))
    }

    /// Direct `Def` tags.
    pub fn def_tags(&self) -> impl Iterator<Item = &ParsedTag> {
        self.tags().filter(|tag| tag.reserved_kind() == Some(ReservedKind::Def))
    }

    /// Direct `Def-expand` groups.
    pub fn def_expand_groups(&self) -> impl Iterator<Item = &ParsedGroup> {
        self.groups().filter(|g| g.is_def_expand())
    }

    /// Definitions this group refers to: its own `Def` tags, its `Def-expand`
    /// groups, and `Def` tags of direct child groups such as `(Onset, (Def/X))`.
    pub fn def_references(&self) -> Vec<DefinitionName<'_>> {
        let mut refs: Vec<DefinitionName<'_>> = self
            .def_tags()
            .filter_map(|tag| tag.value())
            .map(DefinitionName::parse)
            .collect();
        for group in self.groups() {
            if group.is_def_expand() {
                refs.extend(group.definition_name());
            } else {
                refs.extend(group.def_tags().filter_map(|tag| tag.value()).map(DefinitionName::parse));
            }
        }
        refs
    }

    /// A `Def-expand` group, or a group holding a `Def` tag directly.
    pub fn carries_reference(&self) -> bool {
        self.is_def_expand() || self.def_tags().next().is_some()
    }

    /// Direct child groups that do not carry a definition reference.
    pub fn content_groups(&self) -> impl Iterator<Item = &ParsedGroup> {
        self.groups().filter(|g| !g.carries_reference())
    }

    /// Order-insensitive canonical text. Two groups with the same children in
    /// any order share one canonical form.
    pub fn canonical_form(&self) -> String {
        canonical_form(&self.children)
    }

    /// Same canonical form.
    pub fn equivalent(&self, other: &ParsedGroup) -> bool {
        self.canonical_form() == other.canonical_form()
    }

    pub fn format(&self, long: bool) -> String {
        let inner: Vec<String> = self.children.iter().map(|c| c.format(long)).collect();
        format!("({})", inner.join(", "))
    }
}

pub(crate) fn canonical_form(children: &[GroupChild]) -> String {
    let mut parts: Vec<String> = children.iter().map(GroupChild::canonical_form).collect();
    parts.sort_unstable();
    parts.join(",")
}

pub(crate) fn collect_tags<'a>(children: &'a [GroupChild], out: &mut Vec<&'a ParsedTag>) {
    for child in children {
        match child {
            GroupChild::Tag(tag) => out.push(tag),
            GroupChild::Group(group) => collect_tags(&group.children, out),
            GroupChild::Splice(_) => {}
        }
    }
}

pub(crate) fn collect_groups<'a>(children: &'a [GroupChild], out: &mut Vec<&'a ParsedGroup>) {
    for child in children {
        if let GroupChild::Group(group) = child {
            out.push(group);
            collect_groups(&group.children, out);
        }
    }
}

pub(crate) fn collect_splices<'a>(children: &'a [GroupChild], out: &mut Vec<&'a ColumnSplice>) {
    for child in children {
        match child {
            GroupChild::Splice(splice) => out.push(splice),
            GroupChild::Group(group) => collect_splices(&group.children, out),
            GroupChild::Tag(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_name_parse() {
        let plain = DefinitionName::parse("MyDef");
        assert_eq!(plain.name, "MyDef");
        assert_eq!(plain.value, None);
        assert!(!plain.has_placeholder());
        assert_eq!(plain.key(), "mydef");

        let declared = DefinitionName::parse("MyDef/#");
        assert!(declared.has_placeholder());

        let referenced = DefinitionName::parse("MyDef/3.5");
        assert_eq!(referenced.value, Some("3.5"));
    }

    #[test]
    fn test_group_kind_temporal() {
        assert!(GroupKind::Onset.is_temporal());
        assert!(GroupKind::Offset.is_temporal());
        assert!(!GroupKind::Definition.is_temporal());
        assert_eq!(GroupKind::from_reserved(ReservedKind::Def), None);
    }

    #[test]
    fn test_canonical_form_is_order_insensitive() {
        let a = vec![
            GroupChild::Splice(ColumnSplice::new("b", Bounds::new(0, 3))),
            GroupChild::Splice(ColumnSplice::new("a", Bounds::new(4, 7))),
        ];
        let b = vec![
            GroupChild::Splice(ColumnSplice::new("A", Bounds::new(0, 3))),
            GroupChild::Splice(ColumnSplice::new("B", Bounds::new(4, 7))),
        ];
        assert_eq!(canonical_form(&a), canonical_form(&b));
        let (group, issue) = ParsedGroup::new(a, Bounds::new(0, 8));
        assert!(issue.is_none());
        assert_eq!(group.kind(), GroupKind::Plain);
        assert_eq!(group.format(false), "({b}, {a})");
    }
}
