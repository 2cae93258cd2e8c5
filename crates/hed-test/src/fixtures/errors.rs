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

//! Error fixtures for testing diagnostics.
//!
//! Each case names an annotation string and the issue codes it must produce,
//! in report order.

use hed_core::IssueCode;

/// A string paired with the exact issue codes expected from parsing it.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCase {
    pub name: &'static str,
    pub hed: &'static str,
    pub expected: &'static [IssueCode],
}

impl ErrorCase {
    const fn new(name: &'static str, hed: &'static str, expected: &'static [IssueCode]) -> Self {
        Self { name, hed, expected }
    }
}

/// Strings rejected by the tokenizer before any schema lookup.
pub fn lexical_errors() -> Vec<ErrorCase> {
    use IssueCode::*;
    vec![
        ErrorCase::new("trailing_comma", "x,y,", &[EmptyTagFound]),
        ErrorCase::new("double_comma", "x,,y,", &[EmptyTagFound, EmptyTagFound]),
        ErrorCase::new("leading_comma", ",x,y", &[EmptyTagFound]),
        ErrorCase::new("empty_group", "Red, ()", &[EmptyTagFound]),
        ErrorCase::new("leading_slash", "/x", &[ExtraSlash]),
        ErrorCase::new("double_slash", "x//y", &[ExtraSlash]),
        ErrorCase::new("triple_slash", "x///y", &[ExtraSlash]),
        ErrorCase::new("trailing_slash", "x/y/", &[ExtraSlash]),
        ErrorCase::new("blank_before_slash", "x /y", &[ExtraBlank]),
        ErrorCase::new("unopened_parenthesis", "x), y", &[UnopenedParenthesis]),
        ErrorCase::new("unclosed_parenthesis", "(x, (y)", &[UnclosedParenthesis]),
        ErrorCase::new("comma_missing", "(x)(y)", &[CommaMissing]),
        ErrorCase::new("invalid_character", "Re[d", &[InvalidCharacter]),
        ErrorCase::new("stray_close_brace", "}x", &[UnclosedCurlyBrace]),
        ErrorCase::new("parenthesis_in_braces", "x, {y(z)}", &[UnclosedCurlyBrace]),
        ErrorCase::new("comma_in_braces", "x, {y,z}", &[UnclosedCurlyBrace]),
        ErrorCase::new("unterminated_braces", "x, {y, z", &[UnclosedCurlyBrace]),
        ErrorCase::new("nested_braces", "{x}, {{y, z}}", &[NestedCurlyBrace]),
        ErrorCase::new("empty_braces", "x, {}", &[EmptyCurlyBrace]),
    ]
}

/// Well-formed strings that fail schema or structural checks.
pub fn semantic_errors() -> Vec<ErrorCase> {
    use IssueCode::*;
    vec![
        ErrorCase::new("unknown_term", "Nonexistent-tag, Red", &[InvalidTag]),
        ErrorCase::new("misplaced_child", "Sensory-event/Flash/Action", &[InvalidParentNode]),
        ErrorCase::new("extension_not_allowed", "Agent/Human-agent/Robot", &[ExtensionNotAllowed]),
        ErrorCase::new("unknown_unit", "(Duration/3 fortnights, Red)", &[UnitClassInvalidUnit]),
        ErrorCase::new("unit_of_other_class", "Width/3 s", &[UnitClassInvalidUnit]),
        ErrorCase::new("non_numeric_value", "Width/abc m", &[InvalidValue]),
        ErrorCase::new("unknown_library", "xy:Seizure", &[UnmatchedLibrarySchema]),
        ErrorCase::new("duplicate_tag", "Red, Blue, Red", &[DuplicateTag]),
        ErrorCase::new("duplicate_group", "(Red, Blue), (Blue, Red)", &[DuplicateTag]),
        ErrorCase::new("nested_definition", "((Definition/MyDef, (Red)))", &[InvalidDefinition]),
        ErrorCase::new("definition_extra_tag", "(Definition/MyDef, Blue, (Red))", &[InvalidDefinition]),
        ErrorCase::new("missing_placeholder", "(Definition/Speed/#, (Label/Fast))", &[InvalidDefinition]),
        ErrorCase::new("onset_without_reference", "(Onset, (Red))", &[TemporalTagError]),
        ErrorCase::new("offset_with_content", "(Offset, Def/MyDef, (Red))", &[TemporalTagError]),
        ErrorCase::new("conflicting_reserved", "(Definition/A, Onset, (Red))", &[ConflictingReservedTags]),
    ]
}
