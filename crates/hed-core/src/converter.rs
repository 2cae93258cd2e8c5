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

//! Resolution of tag text against the schema hierarchy.

use crate::issue::{Issue, IssueCode};
use crate::lex::TagSpec;
use crate::schema::{Schema, Schemas, TagId};
use std::sync::Arc;

/// A tag resolved to a schema entry plus the text the entry does not cover.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub schema: Arc<Schema>,
    pub tag: TagId,
    /// Extension text for plain tags, the value for value tags. Empty when the path matched exactly.
    pub remainder: String,
}

/// Resolves one [`TagSpec`] against the loaded schemas.
///
/// The path is walked one level at a time. The first level is looked up by
/// short name, so both short and long forms resolve. Each further level must
/// either be a child of the previous one, be the value of a value-taking
/// term, or start an extension; the longest matching prefix wins and the
/// unmatched suffix becomes the remainder.
pub struct TagConverter<'a> {
    spec: &'a TagSpec,
    schema: &'a Arc<Schema>,
}

impl<'a> TagConverter<'a> {
    /// Pick the schema named by the tag's library prefix.
    pub fn new(spec: &'a TagSpec, schemas: &'a Schemas) -> Result<Self, Issue> {
        let schema = schemas.get(spec.library()).ok_or_else(|| {
            if spec.library().is_empty() {
                Issue::new(IssueCode::UnmatchedBaseSchema)
                    .with_context("tag", spec.text())
                    .with_context("bounds", spec.bounds())
            } else {
                Issue::new(IssueCode::UnmatchedLibrarySchema)
                    .with_context("tag", spec.text())
                    .with_context("library", spec.library())
                    .with_context("bounds", spec.bounds())
            }
        })?;
        Ok(Self { spec, schema })
    }

    /// Walk the path and produce the resolved entry and remainder.
    pub fn convert(&self) -> Result<Conversion, Issue> {
        let levels: Vec<&str> = self.spec.path().split('/').collect();
        let schema: &Schema = self.schema;
        let mut parent: Option<TagId> = None;

        for (index, level) in levels.iter().enumerate() {
            if let Some(value) = parent.and_then(|p| schema.value_child(p)) {
                return Ok(self.finish(value, &levels[index..]));
            }
            match self.child_tag(parent, level)? {
                Some(child) => parent = Some(child),
                None => {
                    let Some(parent) = parent else {
                        return Err(self.invalid_tag());
                    };
                    self.check_extension(&levels[index + 1..])?;
                    return Ok(self.finish(parent, &levels[index..]));
                }
            }
        }
        match parent {
            Some(tag) => Ok(self.finish(tag, &[])),
            None => Err(self.invalid_tag()),
        }
    }

    /// Look one level up by short name and check it hangs below `parent`.
    fn child_tag(&self, parent: Option<TagId>, level: &str) -> Result<Option<TagId>, Issue> {
        let name = level.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let Some(child) = self.schema.find_short(name) else {
            return Ok(None);
        };
        match parent {
            None => Ok(Some(child)),
            Some(parent) if self.schema.parent(child) == Some(parent) => Ok(Some(child)),
            Some(_) => {
                let actual = self.schema.tag(child).long_name();
                Err(Issue::new(IssueCode::InvalidParentNode)
                    .with_context("tag", name)
                    .with_context("parentTag", actual)
                    .with_context("bounds", self.spec.bounds()))
            }
        }
    }

    /// Extension levels may not reuse schema terms.
    fn check_extension(&self, levels: &[&str]) -> Result<(), Issue> {
        for level in levels {
            let name = level.trim();
            if let Some(existing) = self.schema.find_short(name) {
                return Err(Issue::new(IssueCode::InvalidParentNode)
                    .with_context("tag", name)
                    .with_context("parentTag", self.schema.tag(existing).long_name())
                    .with_context("bounds", self.spec.bounds()));
            }
        }
        Ok(())
    }

    fn finish(&self, tag: TagId, rest: &[&str]) -> Conversion {
        Conversion {
            schema: Arc::clone(self.schema),
            tag,
            remainder: rest.join("/"),
        }
    }

    fn invalid_tag(&self) -> Issue {
        Issue::new(IssueCode::InvalidTag)
            .with_context("tag", self.spec.text())
            .with_context("bounds", self.spec.bounds())
    }
}

/// Convenience wrapper: pick the schema and convert.
pub fn convert_tag(spec: &TagSpec, schemas: &Schemas) -> Result<Conversion, Issue> {
    TagConverter::new(spec, schemas)?.convert()
}
