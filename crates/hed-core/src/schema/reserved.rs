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

//! Catalog of reserved tags, built once per schema.

use super::TagId;
use std::collections::{HashMap, HashSet};

/// Classification carried by a reserved tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReservedKind {
    Definition,
    Def,
    DefExpand,
    Onset,
    Offset,
    Inset,
}

impl ReservedKind {
    /// Schema short name of the tag that carries this classification.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Definition => "Definition",
            Self::Def => "Def",
            Self::DefExpand => "Def-expand",
            Self::Onset => "Onset",
            Self::Offset => "Offset",
            Self::Inset => "Inset",
        }
    }

    pub const ALL: [ReservedKind; 6] = [
        Self::Definition,
        Self::Def,
        Self::DefExpand,
        Self::Onset,
        Self::Offset,
        Self::Inset,
    ];

    /// Onset, Offset and Inset.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Onset | Self::Offset | Self::Inset)
    }
}

/// Tags that are only meaningful on a timeline.
pub const TIMELINE_TAGS: [&str; 5] = ["Onset", "Offset", "Inset", "Delay", "Duration"];

/// Boolean attribute marking additional timeline-only tags.
pub const TIMELINE_ATTRIBUTE: &str = "timeline";

/// Boolean attribute marking tags that may only appear in a top-level group.
pub const TOP_LEVEL_ATTRIBUTE: &str = "topLevelTagGroup";

/// Reserved-tag lookups for one schema.
///
/// Value-taking reserved tags (`Def/#`, `Definition/#`) are registered under
/// both the term and its value child, so a resolved `Def/MyDef` classifies
/// the same as a bare `Def`.
#[derive(Debug, Clone, Default)]
pub struct ReservedTags {
    kinds: HashMap<TagId, ReservedKind>,
    timeline: HashSet<TagId>,
    top_level: HashSet<TagId>,
}

impl ReservedTags {
    pub(crate) fn register_kind(&mut self, id: TagId, kind: ReservedKind) {
        self.kinds.insert(id, kind);
    }

    pub(crate) fn register_timeline(&mut self, id: TagId) {
        self.timeline.insert(id);
    }

    pub(crate) fn register_top_level(&mut self, id: TagId) {
        self.top_level.insert(id);
    }

    /// Reserved classification of a schema tag, if any.
    pub fn kind(&self, id: TagId) -> Option<ReservedKind> {
        self.kinds.get(&id).copied()
    }

    /// Whether the tag may only be used in time-indexed data.
    pub fn is_timeline(&self, id: TagId) -> bool {
        self.timeline.contains(&id)
    }

    /// Whether the tag must sit directly in a top-level group.
    pub fn requires_top_level_group(&self, id: TagId) -> bool {
        self.top_level.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.timeline.is_empty() && self.top_level.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = ReservedKind::ALL.iter().map(ReservedKind::tag_name).collect();
        assert_eq!(names, ["Definition", "Def", "Def-expand", "Onset", "Offset", "Inset"]);
    }

    #[test]
    fn test_temporal_kinds() {
        assert!(ReservedKind::Onset.is_temporal());
        assert!(ReservedKind::Inset.is_temporal());
        assert!(!ReservedKind::Def.is_temporal());
    }

    #[test]
    fn test_registration() {
        let mut reserved = ReservedTags::default();
        assert!(reserved.is_empty());
        reserved.register_kind(TagId(3), ReservedKind::Onset);
        reserved.register_timeline(TagId(3));
        assert_eq!(reserved.kind(TagId(3)), Some(ReservedKind::Onset));
        assert!(reserved.is_timeline(TagId(3)));
        assert!(!reserved.requires_top_level_group(TagId(3)));
        assert_eq!(reserved.kind(TagId(4)), None);
    }
}
