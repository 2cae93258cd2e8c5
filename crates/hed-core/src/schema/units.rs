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

//! Units, unit classes and SI unit modifiers.

/// How an SI unit modifier attaches to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    /// Attaches to unit symbols (`m` + `m` = `mm`).
    Symbol,
    /// Attaches to unit names (`milli` + `meter`).
    Name,
}

/// An SI prefix such as `k` or `kilo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitModifier {
    pub name: String,
    pub kind: ModifierKind,
}

impl UnitModifier {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModifierKind::Symbol,
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModifierKind::Name,
        }
    }
}

/// Declaration of one unit, consumed by the schema builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDefinition {
    pub(crate) name: String,
    pub(crate) si_unit: bool,
    pub(crate) unit_symbol: bool,
    pub(crate) unit_prefix: bool,
}

impl UnitDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            si_unit: false,
            unit_symbol: false,
            unit_prefix: false,
        }
    }

    /// The unit accepts SI modifiers.
    pub fn si_unit(mut self) -> Self {
        self.si_unit = true;
        self
    }

    /// The unit is a case-sensitive symbol such as `m` or `Hz`.
    pub fn symbol(mut self) -> Self {
        self.unit_symbol = true;
        self
    }

    /// The unit is written before the value, as in `$10`.
    pub fn prefix(mut self) -> Self {
        self.unit_prefix = true;
        self
    }
}

/// Declaration of a unit class, consumed by the schema builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitClassDefinition {
    pub(crate) name: String,
    pub(crate) default_unit: Option<String>,
    pub(crate) units: Vec<UnitDefinition>,
}

impl UnitClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_unit: None,
            units: Vec::new(),
        }
    }

    pub fn default_unit(mut self, unit: impl Into<String>) -> Self {
        self.default_unit = Some(unit.into());
        self
    }

    pub fn unit(mut self, unit: UnitDefinition) -> Self {
        self.units.push(unit);
        self
    }
}

/// A unit as stored in a built schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    name: String,
    unit_class: String,
    si_unit: bool,
    unit_symbol: bool,
    unit_prefix: bool,
    derivatives: Vec<String>,
}

impl Unit {
    pub(crate) fn from_definition(
        def: UnitDefinition,
        unit_class: &str,
        modifiers: &[UnitModifier],
    ) -> Self {
        let derivatives = derivative_forms(&def, modifiers);
        Self {
            name: def.name,
            unit_class: unit_class.to_string(),
            si_unit: def.si_unit,
            unit_symbol: def.unit_symbol,
            unit_prefix: def.unit_prefix,
            derivatives,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_class(&self) -> &str {
        &self.unit_class
    }

    pub fn is_si_unit(&self) -> bool {
        self.si_unit
    }

    pub fn is_symbol(&self) -> bool {
        self.unit_symbol
    }

    pub fn is_prefix(&self) -> bool {
        self.unit_prefix
    }

    /// Every spelling of this unit: the name, its plural and SI-modified forms.
    pub fn derivatives(&self) -> &[String] {
        &self.derivatives
    }
}

/// A unit class as stored in a built schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitClass {
    name: String,
    default_unit: Option<String>,
    units: Vec<String>,
}

impl UnitClass {
    pub(crate) fn new(name: String, default_unit: Option<String>, units: Vec<String>) -> Self {
        Self {
            name,
            default_unit,
            units,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_unit(&self) -> Option<&str> {
        self.default_unit.as_deref()
    }

    /// Names of the units in this class, in declaration order.
    pub fn units(&self) -> &[String] {
        &self.units
    }
}

/// One spelling of a unit, used for longest-match unit scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnitForm {
    pub(crate) text: String,
    pub(crate) unit: String,
}

/// English plural of a unit name. Names ending in `s`, `x` or `z` are left alone.
pub(crate) fn pluralize(name: &str) -> String {
    if name.ends_with(['s', 'x', 'z']) {
        return name.to_string();
    }
    if let Some(stem) = name.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    format!("{name}s")
}

fn derivative_forms(def: &UnitDefinition, modifiers: &[UnitModifier]) -> Vec<String> {
    let mut forms = vec![def.name.clone()];
    let plural = (!def.unit_symbol).then(|| pluralize(&def.name));
    if let Some(plural) = &plural {
        if plural != &def.name {
            forms.push(plural.clone());
        }
    }
    if def.si_unit {
        let wanted = if def.unit_symbol {
            ModifierKind::Symbol
        } else {
            ModifierKind::Name
        };
        for modifier in modifiers.iter().filter(|m| m.kind == wanted) {
            forms.push(format!("{}{}", modifier.name, def.name));
            if let Some(plural) = &plural {
                if plural != &def.name {
                    forms.push(format!("{}{}", modifier.name, plural));
                }
            }
        }
    }
    forms.dedup();
    forms
}

/// Sort unit spellings longest first, then alphabetically for stable output.
pub(crate) fn sort_forms_by_length(units: &[&Unit]) -> Vec<UnitForm> {
    let mut forms: Vec<UnitForm> = units
        .iter()
        .flat_map(|unit| {
            unit.derivatives().iter().map(move |text| UnitForm {
                text: text.clone(),
                unit: unit.name().to_string(),
            })
        })
        .collect();
    forms.sort_by(|a, b| b.text.len().cmp(&a.text.len()).then_with(|| a.text.cmp(&b.text)));
    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifiers() -> Vec<UnitModifier> {
        vec![
            UnitModifier::symbol("m"),
            UnitModifier::symbol("k"),
            UnitModifier::name("milli"),
            UnitModifier::name("kilo"),
        ]
    }

    // ==================== Pluralization tests ====================

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("second"), "seconds");
        assert_eq!(pluralize("hertz"), "hertz");
        assert_eq!(pluralize("century"), "centuries");
        assert_eq!(pluralize("day"), "days");
    }

    // ==================== Derivative tests ====================

    #[test]
    fn test_symbol_unit_uses_symbol_modifiers_only() {
        let unit = Unit::from_definition(
            UnitDefinition::new("m").si_unit().symbol(),
            "physicalLengthUnits",
            &modifiers(),
        );
        assert_eq!(unit.derivatives(), ["m", "mm", "km"]);
    }

    #[test]
    fn test_named_unit_gets_plural_and_name_modifiers() {
        let unit = Unit::from_definition(
            UnitDefinition::new("second").si_unit(),
            "timeUnits",
            &modifiers(),
        );
        assert_eq!(
            unit.derivatives(),
            ["second", "seconds", "millisecond", "milliseconds", "kilosecond", "kiloseconds"]
        );
    }

    #[test]
    fn test_non_si_unit_has_no_modified_forms() {
        let unit = Unit::from_definition(UnitDefinition::new("$").prefix().symbol(), "currency", &modifiers());
        assert_eq!(unit.derivatives(), ["$"]);
        assert!(unit.is_prefix());
    }

    #[test]
    fn test_forms_sorted_longest_first() {
        let m = Unit::from_definition(UnitDefinition::new("m").si_unit().symbol(), "len", &modifiers());
        let s = Unit::from_definition(UnitDefinition::new("s").si_unit().symbol(), "time", &modifiers());
        let forms = sort_forms_by_length(&[&m, &s]);
        let texts: Vec<&str> = forms.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, ["km", "ks", "mm", "ms", "m", "s"]);
        assert_eq!(forms[2].unit, "m");
    }
}
