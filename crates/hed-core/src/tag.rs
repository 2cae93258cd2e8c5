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

//! A single tag resolved against the schema.

use crate::converter::{convert_tag, Conversion};
use crate::issue::{Issue, IssueCode};
use crate::lex::{Bounds, TagSpec};
use crate::schema::{
    ReservedKind, Schema, SchemaTag, Schemas, TagId, Unit, UnitClass, DEFAULT_UNITS, EXTENSION_ALLOWED,
};
use std::sync::Arc;

/// Placeholder written in definitions and sidecars in place of a value.
pub const PLACEHOLDER: &str = "#";

/// Outcome of scanning a value for a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMatch {
    /// A unit token was present.
    pub found: bool,
    /// The unit belongs to one of the tag's unit classes.
    pub legal: bool,
    /// The value with the unit token removed.
    pub stripped: String,
}

/// Identity of a tag that resolved against a schema.
#[derive(Debug, Clone)]
struct Resolved {
    schema: Arc<Schema>,
    tag: TagId,
    remainder: String,
    canonical: String,
}

/// One tag of a parsed string.
///
/// Everything after construction is a pure function of the tag spec and the
/// resolution result. A tag that failed to resolve is kept with only its
/// original text so sibling tags can still be validated.
#[derive(Debug, Clone)]
pub struct ParsedTag {
    spec: TagSpec,
    resolved: Option<Resolved>,
    formatted: String,
}

impl ParsedTag {
    /// Resolve a tag spec and run the per-tag semantic checks.
    ///
    /// Returns the tag (possibly unresolved) and every issue found for it.
    pub fn new(spec: TagSpec, schemas: &Schemas) -> (Self, Vec<Issue>) {
        match convert_tag(&spec, schemas) {
            Ok(conversion) => {
                let tag = Self::from_conversion(spec, conversion);
                let issues = tag.check();
                (tag, issues)
            }
            Err(issue) => (Self::unresolved(spec), vec![issue]),
        }
    }

    /// Wrap a successful conversion.
    pub fn from_conversion(spec: TagSpec, conversion: Conversion) -> Self {
        let Conversion {
            schema,
            tag,
            remainder,
        } = conversion;
        let canonical = long_form(&schema, tag, &remainder);
        let formatted = canonical.to_lowercase();
        Self {
            spec,
            resolved: Some(Resolved {
                schema,
                tag,
                remainder,
                canonical,
            }),
            formatted,
        }
    }

    /// Keep a tag that failed resolution in its original form.
    pub fn unresolved(spec: TagSpec) -> Self {
        let formatted = spec.text().to_lowercase();
        Self {
            spec,
            resolved: None,
            formatted,
        }
    }

    pub fn spec(&self) -> &TagSpec {
        &self.spec
    }

    /// The tag exactly as written.
    pub fn original(&self) -> &str {
        self.spec.text()
    }

    pub fn library(&self) -> &str {
        self.spec.library()
    }

    pub fn bounds(&self) -> Bounds {
        self.spec.bounds()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.resolved.as_ref().map(|r| &r.schema)
    }

    pub fn schema_tag_id(&self) -> Option<TagId> {
        self.resolved.as_ref().map(|r| r.tag)
    }

    pub fn schema_tag(&self) -> Option<&SchemaTag> {
        self.resolved.as_ref().map(|r| r.schema.tag(r.tag))
    }

    /// Long form with the remainder appended. `None` if the tag did not resolve.
    pub fn canonical(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.canonical.as_str())
    }

    /// Lower-cased canonical form, or the lower-cased original when unresolved.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Text not covered by the schema entry.
    pub fn remainder(&self) -> &str {
        self.resolved.as_ref().map(|r| r.remainder.as_str()).unwrap_or("")
    }

    /// The matched entry is a `#` value placeholder.
    pub fn takes_value(&self) -> bool {
        self.schema_tag().map(SchemaTag::is_value).unwrap_or(false)
    }

    /// The value of a value-taking tag.
    pub fn value(&self) -> Option<&str> {
        self.takes_value().then(|| self.remainder())
    }

    /// The extension of a plain tag, if it has one.
    pub fn extension(&self) -> Option<&str> {
        match self.schema_tag() {
            Some(SchemaTag::Plain(_)) if !self.remainder().is_empty() => Some(self.remainder()),
            _ => None,
        }
    }

    /// Short name of the term, the parent term for value tags.
    pub fn term(&self) -> Option<&str> {
        let resolved = self.resolved.as_ref()?;
        let schema = &resolved.schema;
        Some(match schema.tag(resolved.tag) {
            SchemaTag::Plain(entry) => entry.short_name(),
            SchemaTag::Value(entry) => entry
                .parent()
                .map(|p| schema.tag(p).short_name())
                .unwrap_or_else(|| entry.short_name()),
        })
    }

    /// The term or any ancestor carries `extensionAllowed`. A bare `#` never does.
    pub fn allows_extensions(&self) -> bool {
        if self.remainder() == PLACEHOLDER {
            return false;
        }
        let Some(resolved) = &self.resolved else {
            return false;
        };
        match resolved.schema.tag(resolved.tag) {
            SchemaTag::Value(_) => false,
            SchemaTag::Plain(_) => resolved
                .schema
                .ancestors(resolved.tag)
                .any(|id| resolved.schema.tag(id).has_attribute(EXTENSION_ALLOWED)),
        }
    }

    pub fn has_unit_class(&self) -> bool {
        !self.unit_classes().is_empty()
    }

    /// Unit classes of a value-taking tag, empty otherwise.
    pub fn unit_classes(&self) -> Vec<&UnitClass> {
        match &self.resolved {
            Some(r) if self.takes_value() => r.schema.unit_classes_of(r.tag),
            _ => Vec::new(),
        }
    }

    /// Tag-level `defaultUnits` override, else the first unit class default.
    pub fn default_unit(&self) -> Option<&str> {
        let resolved = self.resolved.as_ref()?;
        if !self.takes_value() {
            return None;
        }
        let schema = &resolved.schema;
        let from_tag = schema
            .ancestors(resolved.tag)
            .take(2)
            .find_map(|id| schema.tag(id).entry().attribute_value(DEFAULT_UNITS));
        from_tag.or_else(|| self.unit_classes().into_iter().find_map(UnitClass::default_unit))
    }

    /// Every unit legal for this tag.
    pub fn valid_units(&self) -> Vec<&Unit> {
        let Some(resolved) = &self.resolved else {
            return Vec::new();
        };
        self.unit_classes()
            .into_iter()
            .flat_map(|class| class.units().iter())
            .filter_map(|name| resolved.schema.all_units().get(name))
            .collect()
    }

    /// Scan this tag's value for a unit, longest spelling first.
    pub fn validate_units(&self) -> UnitMatch {
        let value = self.remainder();
        let Some(resolved) = &self.resolved else {
            return UnitMatch {
                found: false,
                legal: false,
                stripped: value.to_string(),
            };
        };
        let legal_units: Vec<&str> = self.valid_units().into_iter().map(Unit::name).collect();
        scan_units(&resolved.schema, value, &legal_units)
    }

    /// Same schema instance and identical formatted form.
    pub fn equivalent(&self, other: &ParsedTag) -> bool {
        let same_schema = match (self.schema(), other.schema()) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_schema && self.formatted == other.formatted
    }

    /// Render in long or short form. Unresolved tags render as written.
    pub fn format(&self, long: bool) -> String {
        let Some(resolved) = &self.resolved else {
            return self.original().to_string();
        };
        if long {
            return resolved.canonical.clone();
        }
        let term = self.term().unwrap_or_default();
        let short = if resolved.remainder.is_empty() {
            term.to_string()
        } else {
            format!("{}/{}", term, resolved.remainder)
        };
        if self.library().is_empty() {
            short
        } else {
            format!("{}:{}", self.library(), short)
        }
    }

    /// Reserved classification of the matched entry.
    pub fn reserved_kind(&self) -> Option<ReservedKind> {
        let resolved = self.resolved.as_ref()?;
        resolved.schema.reserved().kind(resolved.tag)
    }

    /// The tag may only appear in time-indexed data.
    pub fn is_timeline(&self) -> bool {
        self.resolved
            .as_ref()
            .map(|r| r.schema.reserved().is_timeline(r.tag))
            .unwrap_or(false)
    }

    /// The tag must sit directly inside a top-level group.
    pub fn requires_top_level_group(&self) -> bool {
        self.resolved
            .as_ref()
            .map(|r| r.schema.reserved().requires_top_level_group(r.tag))
            .unwrap_or(false)
    }

    /// Per-tag semantic checks: extensions, units and values.
    fn check(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(resolved) = &self.resolved else {
            return issues;
        };
        let schema = &resolved.schema;
        match schema.tag(resolved.tag) {
            SchemaTag::Plain(_) => {
                if resolved.remainder.is_empty() {
                    return issues;
                }
                if !self.allows_extensions() {
                    issues.push(self.issue(IssueCode::ExtensionNotAllowed));
                } else if let Some(bad) = resolved
                    .remainder
                    .split('/')
                    .find(|level| !schema.is_valid_extension(level.trim()))
                {
                    issues.push(self.issue(IssueCode::InvalidExtension).with_context("extension", bad));
                } else {
                    issues.push(self.issue(IssueCode::TagExtended));
                }
            }
            SchemaTag::Value(_) => {
                let value = if self.has_unit_class() {
                    let units = self.validate_units();
                    if units.found && !units.legal {
                        let names: Vec<&str> = self.valid_units().into_iter().map(Unit::name).collect();
                        issues.push(
                            self.issue(IssueCode::UnitClassInvalidUnit)
                                .with_context("unitClassUnits", names.join(",")),
                        );
                        return issues;
                    }
                    if !units.found {
                        if let Some(default) = self.default_unit() {
                            issues.push(
                                self.issue(IssueCode::UnitClassDefaultUsed)
                                    .with_context("defaultUnit", default),
                            );
                        }
                    }
                    units.stripped
                } else {
                    resolved.remainder.clone()
                };
                if value != PLACEHOLDER && !schema.value_matches(resolved.tag, &value) {
                    issues.push(self.issue(IssueCode::InvalidValue));
                }
            }
        }
        issues
    }

    fn issue(&self, code: IssueCode) -> Issue {
        Issue::new(code)
            .with_context("tag", self.original())
            .with_context("bounds", self.bounds())
    }
}

/// Long form of an entry with its remainder.
fn long_form(schema: &Schema, tag: TagId, remainder: &str) -> String {
    let base = match schema.tag(tag) {
        SchemaTag::Plain(entry) => entry.long_name(),
        SchemaTag::Value(entry) => entry
            .parent()
            .map(|p| schema.tag(p).long_name())
            .unwrap_or_else(|| entry.long_name()),
    };
    if remainder.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, remainder)
    }
}

/// Longest-match unit scan over every unit spelling in the schema.
///
/// The unit token is the last space-separated word, or a leading prefix for
/// prefix units such as `$`. Symbol units must match case exactly; a match
/// that differs only in case is reported as found but illegal.
fn scan_units(schema: &Schema, value: &str, legal_units: &[&str]) -> UnitMatch {
    let (stem, last) = match value.rsplit_once(' ') {
        Some((stem, last)) => (stem.trim_end(), last),
        None => ("", ""),
    };
    let has_token = !last.is_empty();
    let mut wrong_case: Option<String> = None;

    for form in schema.unit_forms() {
        let Some(unit) = schema.all_units().get(&form.unit) else {
            continue;
        };
        let stripped = if unit.is_prefix() && value.starts_with(form.text.as_str()) {
            Some(value[form.text.len()..].trim().to_string())
        } else if has_token && last == form.text {
            Some(stem.to_string())
        } else if has_token && last.eq_ignore_ascii_case(&form.text) {
            if unit.is_symbol() {
                // Only used if no other spelling matches exactly.
                wrong_case.get_or_insert_with(|| stem.to_string());
                None
            } else {
                Some(stem.to_string())
            }
        } else {
            None
        };
        if let Some(stripped) = stripped {
            return UnitMatch {
                found: true,
                legal: legal_units.contains(&unit.name()),
                stripped,
            };
        }
    }
    if let Some(stripped) = wrong_case {
        return UnitMatch {
            found: true,
            legal: false,
            stripped,
        };
    }
    UnitMatch {
        found: has_token,
        legal: false,
        stripped: value.to_string(),
    }
}
