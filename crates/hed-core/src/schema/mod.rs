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

//! In-memory schema object model.
//!
//! A [`Schema`] is built once through [`SchemaBuilder`] and is immutable
//! afterwards. It is shared between parses as `Arc<Schema>`; every lookup
//! here takes `&self`, so concurrent readers need no locking.
//!
//! # Examples
//!
//! ```
//! use hed_core::schema::{SchemaBuilder, TagDefinition};
//!
//! let schema = SchemaBuilder::new("8.3.0")
//!     .tag(TagDefinition::new("Event"))
//!     .tag(TagDefinition::new("Event/Sensory-event"))
//!     .build()
//!     .unwrap();
//!
//! let id = schema.find_short("sensory-event").unwrap();
//! assert_eq!(schema.tag(id).long_name(), "Event/Sensory-event");
//! ```

mod builder;
mod reserved;
mod units;

pub use builder::{SchemaBuilder, TagDefinition};
pub use reserved::{
    ReservedKind, ReservedTags, TIMELINE_ATTRIBUTE, TIMELINE_TAGS, TOP_LEVEL_ATTRIBUTE,
};
pub use units::{ModifierKind, Unit, UnitClass, UnitClassDefinition, UnitDefinition, UnitModifier};

pub(crate) use units::UnitForm;

use crate::error::{HedError, HedResult};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Boolean attribute allowing user extensions below a term.
pub const EXTENSION_ALLOWED: &str = "extensionAllowed";

/// Valued attribute overriding the unit-class default unit.
pub const DEFAULT_UNITS: &str = "defaultUnits";

/// Value-class name consulted for extension text.
pub const NAME_CLASS: &str = "nameClass";

/// Index of a tag entry inside its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub(crate) usize);

impl TagId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Data shared by both kinds of schema tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    short_name: String,
    long_name: String,
    parent: Option<TagId>,
    attributes: BTreeSet<String>,
    values: BTreeMap<String, String>,
    unit_classes: Vec<String>,
    value_classes: Vec<String>,
}

impl TagEntry {
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn parent(&self) -> Option<TagId> {
        self.parent
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn unit_classes(&self) -> &[String] {
        &self.unit_classes
    }

    pub fn value_classes(&self) -> &[String] {
        &self.value_classes
    }
}

/// A schema tag: a plain term, or the `#` value placeholder below a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTag {
    Plain(TagEntry),
    Value(TagEntry),
}

impl SchemaTag {
    pub fn entry(&self) -> &TagEntry {
        match self {
            Self::Plain(entry) | Self::Value(entry) => entry,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn short_name(&self) -> &str {
        self.entry().short_name()
    }

    pub fn long_name(&self) -> &str {
        self.entry().long_name()
    }

    pub fn parent(&self) -> Option<TagId> {
        self.entry().parent()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.entry().has_attribute(name)
    }
}

/// A built, immutable HED schema.
#[derive(Debug)]
pub struct Schema {
    version: String,
    library: Option<String>,
    prefix: String,
    tags: Vec<SchemaTag>,
    by_short: HashMap<String, TagId>,
    by_long: HashMap<String, TagId>,
    value_children: HashMap<TagId, TagId>,
    unit_classes: BTreeMap<String, UnitClass>,
    units: BTreeMap<String, Unit>,
    unit_forms: Vec<UnitForm>,
    value_classes: BTreeMap<String, Regex>,
    name_pattern: Regex,
    reserved: ReservedTags,
}

impl Schema {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    /// Nickname used as the `prefix:` marker in annotation strings. Empty for the base schema.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tag(&self, id: TagId) -> &SchemaTag {
        &self.tags[id.0]
    }

    pub fn tags(&self) -> impl Iterator<Item = (TagId, &SchemaTag)> {
        self.tags.iter().enumerate().map(|(i, tag)| (TagId(i), tag))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Case-insensitive lookup of a plain term by short name.
    pub fn find_short(&self, name: &str) -> Option<TagId> {
        self.by_short.get(&name.to_lowercase()).copied()
    }

    /// Case-insensitive lookup of any entry by long name.
    pub fn find_long(&self, name: &str) -> Option<TagId> {
        self.by_long.get(&name.to_lowercase()).copied()
    }

    /// Resolve a short or long form name to an entry.
    pub fn resolve_tag(&self, path: &str) -> Option<TagId> {
        if path.contains('/') {
            self.find_long(path)
        } else {
            self.find_short(path)
        }
    }

    /// The `#` child of a term, if it takes a value.
    pub fn value_child(&self, id: TagId) -> Option<TagId> {
        self.value_children.get(&id).copied()
    }

    pub fn parent(&self, id: TagId) -> Option<TagId> {
        self.tag(id).parent()
    }

    /// The tag itself followed by each ancestor up to the root.
    pub fn ancestors(&self, id: TagId) -> Ancestors<'_> {
        Ancestors {
            schema: self,
            next: Some(id),
        }
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_descendant_of(&self, id: TagId, ancestor: TagId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether the entry with the given formatted long name carries `attribute`.
    pub fn tag_has_attribute(&self, formatted: &str, attribute: &str) -> bool {
        self.by_long
            .get(formatted)
            .map(|id| self.tag(*id).has_attribute(attribute))
            .unwrap_or(false)
    }

    pub fn unit_class(&self, name: &str) -> Option<&UnitClass> {
        self.unit_classes.get(name)
    }

    /// Unit classes declared on an entry, in declaration order.
    pub fn unit_classes_of(&self, id: TagId) -> Vec<&UnitClass> {
        self.tag(id)
            .entry()
            .unit_classes()
            .iter()
            .filter_map(|name| self.unit_classes.get(name))
            .collect()
    }

    /// Every unit in the schema, keyed by name.
    pub fn all_units(&self) -> &BTreeMap<String, Unit> {
        &self.units
    }

    pub(crate) fn unit_forms(&self) -> &[UnitForm] {
        &self.unit_forms
    }

    /// Does `text` satisfy the name-class grammar used for extensions and definition names?
    pub fn is_valid_extension(&self, text: &str) -> bool {
        self.name_pattern.is_match(text)
    }

    /// Does `text` satisfy at least one of the entry's value classes?
    ///
    /// Entries without value classes accept any non-empty value.
    pub fn value_matches(&self, id: TagId, text: &str) -> bool {
        let classes = self.tag(id).entry().value_classes();
        if classes.is_empty() {
            return !text.is_empty();
        }
        classes
            .iter()
            .filter_map(|name| self.value_classes.get(name))
            .any(|pattern| pattern.is_match(text))
    }

    pub fn reserved(&self) -> &ReservedTags {
        &self.reserved
    }
}

/// Iterator returned by [`Schema::ancestors`].
pub struct Ancestors<'a> {
    schema: &'a Schema,
    next: Option<TagId>,
}

impl Iterator for Ancestors<'_> {
    type Item = TagId;

    fn next(&mut self) -> Option<TagId> {
        let current = self.next?;
        self.next = self.schema.parent(current);
        Some(current)
    }
}

/// The loaded schemas, keyed by annotation prefix.
#[derive(Debug, Clone, Default)]
pub struct Schemas {
    by_prefix: BTreeMap<String, Arc<Schema>>,
}

impl Schemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding only one schema.
    pub fn single(schema: Schema) -> Self {
        let mut by_prefix = BTreeMap::new();
        by_prefix.insert(schema.prefix().to_string(), Arc::new(schema));
        Self { by_prefix }
    }

    /// Add a schema under its prefix.
    pub fn insert(&mut self, schema: Schema) -> HedResult<()> {
        let prefix = schema.prefix().to_string();
        if self.by_prefix.contains_key(&prefix) {
            return Err(HedError::collision(format!(
                "a schema with prefix '{}' is already loaded",
                prefix
            )));
        }
        self.by_prefix.insert(prefix, Arc::new(schema));
        Ok(())
    }

    /// Builder-style [`Schemas::insert`].
    pub fn with(mut self, schema: Schema) -> HedResult<Self> {
        self.insert(schema)?;
        Ok(self)
    }

    pub fn get(&self, prefix: &str) -> Option<&Arc<Schema>> {
        self.by_prefix.get(prefix)
    }

    pub fn base(&self) -> Option<&Arc<Schema>> {
        self.get("")
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.by_prefix.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}
