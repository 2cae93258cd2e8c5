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

//! Builder for [`Schema`].

use super::reserved::{ReservedKind, ReservedTags, TIMELINE_ATTRIBUTE, TIMELINE_TAGS, TOP_LEVEL_ATTRIBUTE};
use super::units::{sort_forms_by_length, Unit, UnitClass, UnitClassDefinition, UnitModifier};
use super::{Schema, SchemaTag, TagEntry, TagId, NAME_CLASS};
use crate::error::{HedError, HedResult};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Name-class grammar used when the schema declares none.
const DEFAULT_NAME_CLASS: &str = r"[\w\-]+";

/// Declaration of one schema tag by its long name.
///
/// A final `#` segment declares the value placeholder of its parent term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    long_name: String,
    attributes: BTreeSet<String>,
    values: BTreeMap<String, String>,
    unit_classes: Vec<String>,
    value_classes: Vec<String>,
}

impl TagDefinition {
    pub fn new(long_name: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            attributes: BTreeSet::new(),
            values: BTreeMap::new(),
            unit_classes: Vec::new(),
            value_classes: Vec::new(),
        }
    }

    /// Set a boolean attribute such as `extensionAllowed`.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into());
        self
    }

    /// Set a valued attribute such as `defaultUnits`.
    pub fn value_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn unit_class(mut self, name: impl Into<String>) -> Self {
        self.unit_classes.push(name.into());
        self
    }

    pub fn value_class(mut self, name: impl Into<String>) -> Self {
        self.value_classes.push(name.into());
        self
    }

    fn depth(&self) -> usize {
        self.long_name.split('/').count()
    }
}

/// Fluent builder assembling a [`Schema`].
///
/// Tags may be declared in any order; parents are attached by long name
/// during [`SchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    version: String,
    library: Option<String>,
    prefix: String,
    modifiers: Vec<UnitModifier>,
    unit_classes: Vec<UnitClassDefinition>,
    value_classes: Vec<(String, String)>,
    tags: Vec<TagDefinition>,
}

impl SchemaBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            library: None,
            prefix: String::new(),
            modifiers: Vec::new(),
            unit_classes: Vec::new(),
            value_classes: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn library(mut self, name: impl Into<String>) -> Self {
        self.library = Some(name.into());
        self
    }

    /// Annotation prefix (`sc` for `sc:Seizure`). Empty for the base schema.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn unit_modifier(mut self, modifier: UnitModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn unit_class(mut self, class: UnitClassDefinition) -> Self {
        self.unit_classes.push(class);
        self
    }

    /// Declare a value class. The pattern must match the whole value.
    pub fn value_class(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.value_classes.push((name.into(), pattern.into()));
        self
    }

    pub fn tag(mut self, tag: TagDefinition) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = TagDefinition>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Validate the declarations and build the schema.
    ///
    /// # Errors
    ///
    /// - `Collision` for duplicate tag, unit or value-class names
    /// - `Schema` for missing parents, unknown classes or a bad default unit
    /// - `Pattern` for a value class that fails to compile
    pub fn build(mut self) -> HedResult<Schema> {
        let context = format!("schema {}", self.version);
        let in_context = |err: HedError| err.with_context(context.clone());

        let mut value_classes: BTreeMap<String, Regex> = BTreeMap::new();
        for (name, pattern) in &self.value_classes {
            let compiled = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| in_context(e.into()))?;
            if value_classes.insert(name.clone(), compiled).is_some() {
                return Err(in_context(HedError::collision(format!(
                    "value class '{}' is declared twice",
                    name
                ))));
            }
        }
        let name_pattern = match value_classes.get(NAME_CLASS) {
            Some(pattern) => pattern.clone(),
            None => Regex::new(&format!("^(?:{})$", DEFAULT_NAME_CLASS)).map_err(|e| in_context(e.into()))?,
        };

        let mut unit_classes: BTreeMap<String, UnitClass> = BTreeMap::new();
        let mut units: BTreeMap<String, Unit> = BTreeMap::new();
        for class in std::mem::take(&mut self.unit_classes) {
            let mut names = Vec::with_capacity(class.units.len());
            for def in class.units {
                let unit = Unit::from_definition(def, &class.name, &self.modifiers);
                if units.contains_key(unit.name()) {
                    return Err(in_context(HedError::collision(format!(
                        "unit '{}' is declared twice",
                        unit.name()
                    ))));
                }
                names.push(unit.name().to_string());
                units.insert(unit.name().to_string(), unit);
            }
            if let Some(default) = &class.default_unit {
                if !names.contains(default) {
                    return Err(in_context(HedError::schema(format!(
                        "default unit '{}' is not a member of unit class '{}'",
                        default, class.name
                    ))));
                }
            }
            if unit_classes.contains_key(&class.name) {
                return Err(in_context(HedError::collision(format!(
                    "unit class '{}' is declared twice",
                    class.name
                ))));
            }
            unit_classes.insert(class.name.clone(), UnitClass::new(class.name, class.default_unit, names));
        }
        let unit_refs: Vec<&Unit> = units.values().collect();
        let unit_forms = sort_forms_by_length(&unit_refs);

        let mut definitions = std::mem::take(&mut self.tags);
        definitions.sort_by_key(TagDefinition::depth);

        let mut tags: Vec<SchemaTag> = Vec::with_capacity(definitions.len());
        let mut by_short: HashMap<String, TagId> = HashMap::new();
        let mut by_long: HashMap<String, TagId> = HashMap::new();
        let mut value_children: HashMap<TagId, TagId> = HashMap::new();

        for def in definitions {
            let segments: Vec<&str> = def.long_name.split('/').collect();
            if segments.iter().any(|s| s.trim().is_empty()) {
                return Err(in_context(HedError::schema(format!(
                    "tag '{}' has an empty path segment",
                    def.long_name
                ))));
            }
            let short = segments[segments.len() - 1].to_string();
            let parent = if segments.len() > 1 {
                let parent_long = segments[..segments.len() - 1].join("/").to_lowercase();
                let parent = by_long.get(&parent_long).copied().ok_or_else(|| {
                    in_context(HedError::schema(format!(
                        "tag '{}' has no parent '{}'",
                        def.long_name, parent_long
                    )))
                })?;
                Some(parent)
            } else {
                None
            };
            for class in &def.unit_classes {
                if !unit_classes.contains_key(class) {
                    return Err(in_context(HedError::schema(format!(
                        "tag '{}' names unknown unit class '{}'",
                        def.long_name, class
                    ))));
                }
            }
            for class in &def.value_classes {
                if !value_classes.contains_key(class) {
                    return Err(in_context(HedError::schema(format!(
                        "tag '{}' names unknown value class '{}'",
                        def.long_name, class
                    ))));
                }
            }

            let long_key = def.long_name.to_lowercase();
            if by_long.contains_key(&long_key) {
                return Err(in_context(HedError::collision(format!(
                    "tag '{}' is declared twice",
                    def.long_name
                ))));
            }

            let id = TagId(tags.len());
            let is_value = short == "#";
            let entry = TagEntry {
                short_name: short,
                long_name: def.long_name,
                parent,
                attributes: def.attributes,
                values: def.values,
                unit_classes: def.unit_classes,
                value_classes: def.value_classes,
            };

            if is_value {
                let parent = parent.ok_or_else(|| {
                    in_context(HedError::schema("a value placeholder needs a parent term"))
                })?;
                value_children.insert(parent, id);
                tags.push(SchemaTag::Value(entry));
            } else {
                let short_key = entry.short_name.to_lowercase();
                if let Some(existing) = by_short.get(&short_key) {
                    let existing: &SchemaTag = &tags[existing.index()];
                    return Err(in_context(HedError::collision(format!(
                        "short name '{}' is used by both '{}' and '{}'",
                        entry.short_name,
                        existing.long_name(),
                        entry.long_name
                    ))));
                }
                by_short.insert(short_key, id);
                tags.push(SchemaTag::Plain(entry));
            }
            by_long.insert(long_key, id);
        }

        let mut schema = Schema {
            version: self.version,
            library: self.library,
            prefix: self.prefix,
            tags,
            by_short,
            by_long,
            value_children,
            unit_classes,
            units,
            unit_forms,
            value_classes,
            name_pattern,
            reserved: ReservedTags::default(),
        };
        schema.reserved = reserved_catalog(&schema);
        Ok(schema)
    }
}

fn reserved_catalog(schema: &Schema) -> ReservedTags {
    let mut reserved = ReservedTags::default();
    let with_value = |id: TagId| std::iter::once(id).chain(schema.value_child(id));

    for kind in ReservedKind::ALL {
        if let Some(id) = schema.find_short(kind.tag_name()) {
            for id in with_value(id) {
                reserved.register_kind(id, kind);
            }
        }
    }
    for name in TIMELINE_TAGS {
        if let Some(id) = schema.find_short(name) {
            with_value(id).for_each(|id| reserved.register_timeline(id));
        }
    }
    for name in ["Definition", "Onset", "Offset", "Inset"] {
        if let Some(id) = schema.find_short(name) {
            with_value(id).for_each(|id| reserved.register_top_level(id));
        }
    }
    for (id, tag) in schema.tags() {
        if tag.has_attribute(TIMELINE_ATTRIBUTE) {
            with_value(id).for_each(|id| reserved.register_timeline(id));
        }
        if tag.has_attribute(TOP_LEVEL_ATTRIBUTE) {
            with_value(id).for_each(|id| reserved.register_top_level(id));
        }
    }
    reserved
}
