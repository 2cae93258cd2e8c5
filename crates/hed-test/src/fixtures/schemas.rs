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

//! Schema fixtures.
//!
//! The base schema mirrors the shape of the standard HED vocabulary at a
//! fraction of its size: the same reserved terms, unit classes and value
//! classes, with enough ordinary terms to exercise short, long and partial
//! long forms.

use hed_core::schema::{
    Schema, SchemaBuilder, Schemas, TagDefinition, UnitClassDefinition, UnitDefinition, UnitModifier,
    DEFAULT_UNITS, EXTENSION_ALLOWED, TOP_LEVEL_ATTRIBUTE,
};

/// Version string of [`base_schema`].
pub const BASE_VERSION: &str = "8.3.0";

/// Annotation prefix of [`library_schema`].
pub const LIBRARY_PREFIX: &str = "sc";

const TEMPORAL_VALUE: &str = "Property/Data-property/Data-value/Spatiotemporal-value/Temporal-value";
const SPATIAL_VALUE: &str = "Property/Data-property/Data-value/Spatiotemporal-value/Spatial-value";
const ORGANIZATIONAL: &str = "Property/Organizational-property";

/// A base schema shaped like the standard HED vocabulary.
pub fn base_schema() -> Schema {
    base_builder().build().expect("base fixture schema builds")
}

/// Builder for [`base_schema`], for tests that add their own terms.
pub fn base_builder() -> SchemaBuilder {
    SchemaBuilder::new(BASE_VERSION)
        .unit_modifier(UnitModifier::symbol("k"))
        .unit_modifier(UnitModifier::symbol("m"))
        .unit_modifier(UnitModifier::symbol("u"))
        .unit_modifier(UnitModifier::name("kilo"))
        .unit_modifier(UnitModifier::name("milli"))
        .unit_modifier(UnitModifier::name("micro"))
        .unit_class(
            UnitClassDefinition::new("timeUnits")
                .default_unit("s")
                .unit(UnitDefinition::new("s").si_unit().symbol())
                .unit(UnitDefinition::new("second").si_unit())
                .unit(UnitDefinition::new("minute"))
                .unit(UnitDefinition::new("hour")),
        )
        .unit_class(
            UnitClassDefinition::new("physicalLengthUnits")
                .default_unit("m")
                .unit(UnitDefinition::new("m").si_unit().symbol())
                .unit(UnitDefinition::new("metre").si_unit())
                .unit(UnitDefinition::new("foot")),
        )
        .unit_class(
            UnitClassDefinition::new("currencyUnits")
                .default_unit("$")
                .unit(UnitDefinition::new("$").prefix().symbol())
                .unit(UnitDefinition::new("dollar")),
        )
        .value_class("numericClass", r"[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?")
        .value_class("nameClass", r"[\w\-]+")
        .value_class("textClass", r"[^,()\[\]{}~]+")
        .tags([
            TagDefinition::new("Event"),
            TagDefinition::new("Event/Sensory-event"),
            TagDefinition::new("Event/Agent-action"),
            TagDefinition::new("Event/Experiment-control"),
            TagDefinition::new("Action").attribute(EXTENSION_ALLOWED),
            TagDefinition::new("Action/Move"),
            TagDefinition::new("Action/Move/Walk"),
            TagDefinition::new("Action/Press"),
            TagDefinition::new("Agent"),
            TagDefinition::new("Agent/Human-agent"),
            TagDefinition::new("Item").attribute(EXTENSION_ALLOWED),
            TagDefinition::new("Item/Object"),
            TagDefinition::new("Item/Object/Man-made-object"),
            TagDefinition::new("Item/Object/Man-made-object/Device"),
            TagDefinition::new("Item/Object/Man-made-object/Device/Computer-screen"),
            TagDefinition::new("Property").attribute(EXTENSION_ALLOWED),
            TagDefinition::new("Property/Sensory-property"),
            TagDefinition::new("Property/Sensory-property/Red"),
            TagDefinition::new("Property/Sensory-property/Green"),
            TagDefinition::new("Property/Sensory-property/Blue"),
            TagDefinition::new("Property/Data-property"),
            TagDefinition::new("Property/Data-property/Data-value"),
            TagDefinition::new("Property/Data-property/Data-value/Spatiotemporal-value"),
            TagDefinition::new(TEMPORAL_VALUE),
            TagDefinition::new(format!("{TEMPORAL_VALUE}/Duration")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{TEMPORAL_VALUE}/Duration/#"))
                .unit_class("timeUnits")
                .value_class("numericClass"),
            TagDefinition::new(format!("{TEMPORAL_VALUE}/Delay")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{TEMPORAL_VALUE}/Delay/#"))
                .unit_class("timeUnits")
                .value_class("numericClass")
                .value_attribute(DEFAULT_UNITS, "s"),
            TagDefinition::new(SPATIAL_VALUE),
            TagDefinition::new(format!("{SPATIAL_VALUE}/Width")),
            TagDefinition::new(format!("{SPATIAL_VALUE}/Width/#"))
                .unit_class("physicalLengthUnits")
                .value_class("numericClass"),
            TagDefinition::new("Property/Data-property/Data-value/Cost"),
            TagDefinition::new("Property/Data-property/Data-value/Cost/#")
                .unit_class("currencyUnits")
                .value_class("numericClass"),
            TagDefinition::new("Property/Informational-property"),
            TagDefinition::new("Property/Informational-property/Label"),
            TagDefinition::new("Property/Informational-property/Label/#").value_class("nameClass"),
            TagDefinition::new("Property/Informational-property/Description"),
            TagDefinition::new("Property/Informational-property/Description/#").value_class("textClass"),
            TagDefinition::new(ORGANIZATIONAL),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Definition")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Definition/#")),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Def")),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Def/#")),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Def-expand")),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Def-expand/#")),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Event-context")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Onset")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Offset")).attribute(TOP_LEVEL_ATTRIBUTE),
            TagDefinition::new(format!("{ORGANIZATIONAL}/Inset")).attribute(TOP_LEVEL_ATTRIBUTE),
        ])
}

/// A small library schema loaded under the `sc` prefix.
pub fn library_schema() -> Schema {
    SchemaBuilder::new("1.0.0")
        .library("score")
        .prefix(LIBRARY_PREFIX)
        .tags([
            TagDefinition::new("Seizure").attribute(EXTENSION_ALLOWED),
            TagDefinition::new("Seizure/Focal-seizure"),
            TagDefinition::new("Seizure/Generalized-seizure"),
            TagDefinition::new("Finding"),
            TagDefinition::new("Finding/Sensory-event"),
        ])
        .build()
        .expect("library fixture schema builds")
}

/// Base and library schemas together.
pub fn schemas() -> Schemas {
    Schemas::single(base_schema())
        .with(library_schema())
        .expect("fixture prefixes are distinct")
}

/// Only the base schema.
pub fn base_schemas() -> Schemas {
    Schemas::single(base_schema())
}
