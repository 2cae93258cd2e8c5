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

//! Annotation strings that parse cleanly against [`schemas`](super::schemas).

/// Named strings that produce no errors. Some produce warnings that are
/// only reported when warnings are requested.
pub fn valid_strings() -> Vec<(&'static str, &'static str)> {
    vec![
        ("short_form", "Sensory-event, Red"),
        ("long_form", "Event/Sensory-event, Property/Sensory-property/Blue"),
        ("partial_long_form", "Sensory-property/Green"),
        ("nested_groups", "(Red, (Blue, (Green)))"),
        ("surrounding_whitespace", "  Red ,  ( Blue , Green )  "),
        ("value_with_unit", "(Duration/2 s, Sensory-event)"),
        ("modified_unit", "Width/5 mm"),
        ("named_unit", "(Duration/3 milliseconds, Press)"),
        ("default_unit", "(Delay/3, Press)"),
        ("prefix_unit", "Cost/$25"),
        ("name_value", "Label/Trial-1"),
        ("text_value", "Description/A red flash appears"),
        ("extension", "Item/Widget"),
        ("library_tag", "sc:Focal-seizure, Red"),
        ("column_splice", "{response}, Red"),
        ("definition", "(Definition/MyDef, (Sensory-event, Red))"),
        ("placeholder_definition", "(Definition/Speed/#, (Label/#))"),
        ("def_reference", "Def/MyDef, Red"),
        ("def_expand", "(Def-expand/MyDef, (Sensory-event, Red))"),
        ("onset", "(Onset, Def/MyDef), Sensory-event"),
        ("onset_with_content", "(Onset, Def/MyDef, (Red, Blue))"),
        ("offset", "(Offset, Def/MyDef)"),
        ("onset_expanded", "(Onset, (Def-expand/MyDef, (Sensory-event, Red)))"),
    ]
}

/// Strings whose definitions other fixtures reference.
pub fn sidecar_definitions() -> Vec<&'static str> {
    vec![
        "(Definition/MyDef, (Sensory-event, Red))",
        "(Definition/Speed/#, (Label/#))",
        "(Definition/Rest, (Agent-action, Walk))",
    ]
}
