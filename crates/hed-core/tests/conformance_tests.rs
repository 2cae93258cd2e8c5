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

//! Conformance tests for annotation-string parsing.
//!
//! Every fixture in `hed-test` is checked here against the shared schemas.

use hed_core::{parse, parse_many, IssueCode, ParseOptions, PLACEHOLDER};
use hed_test::fixtures::{self, errors};
use hed_test::{codes, count_code};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

fn warnings_on() -> ParseOptions {
    ParseOptions::builder().check_for_warnings(true).build()
}

// =============================================================================
// Valid strings
// =============================================================================

#[test]
fn test_valid_fixtures_have_no_errors() {
    let schemas = fixtures::schemas();
    for (name, hed) in fixtures::valid_strings() {
        let (parsed, errors, _) = parse(hed, &schemas, &ParseOptions::default());
        assert!(parsed.is_some(), "{name}: no tree");
        assert!(errors.is_empty(), "{name}: unexpected errors {:?}", errors);
    }
}

#[test]
fn test_warnings_are_opt_in() {
    let schemas = fixtures::schemas();
    let (_, _, quiet) = parse("Item/Widget", &schemas, &ParseOptions::default());
    assert!(quiet.is_empty());

    let (_, errors, warnings) = parse("Item/Widget", &schemas, &warnings_on());
    assert!(errors.is_empty());
    assert_eq!(codes(&warnings), [IssueCode::TagExtended]);
}

#[test]
fn test_default_unit_warning() {
    let schemas = fixtures::schemas();
    let (_, errors, warnings) = parse("(Delay/3, Press)", &schemas, &warnings_on());
    assert!(errors.is_empty());
    assert_eq!(codes(&warnings), [IssueCode::UnitClassDefaultUsed]);
    assert_eq!(warnings[0].get("defaultUnit"), Some("s"));
}

#[test]
fn test_short_and_long_forms_agree() {
    let schemas = fixtures::schemas();
    let options = ParseOptions::default();
    let (short, _, _) = parse("Red, Sensory-event", &schemas, &options);
    let (long, _, _) = parse(
        "Event/Sensory-event, Property/Sensory-property/Red",
        &schemas,
        &options,
    );
    let (short, long) = (short.unwrap(), long.unwrap());
    assert_eq!(short.canonical_form(), long.canonical_form());
    assert_eq!(short.format(true), "Property/Sensory-property/Red, Event/Sensory-event");
    assert_eq!(long.format(false), "Sensory-event, Red");
}

#[test]
fn test_value_tag_accessors() {
    let schemas = fixtures::schemas();
    let (parsed, _, _) = parse("Width/5 mm", &schemas, &ParseOptions::default());
    let parsed = parsed.unwrap();
    let tag = parsed.tags()[0];
    assert!(tag.takes_value());
    assert_eq!(tag.term(), Some("Width"));
    assert_eq!(tag.value(), Some("5 mm"));
    let units = tag.validate_units();
    assert!(units.found && units.legal);
    assert_eq!(units.stripped, "5");
}

#[test]
fn test_placeholder_definition() {
    let schemas = fixtures::schemas();
    let (parsed, errors, _) = parse("(Definition/Speed/#, (Label/#))", &schemas, &ParseOptions::default());
    assert!(errors.is_empty());
    let parsed = parsed.unwrap();
    let definition = parsed.definitions()[0];
    let name = definition.definition_name().unwrap();
    assert_eq!(name.name, "Speed");
    assert_eq!(name.value, Some(PLACEHOLDER));
    assert!(name.has_placeholder());
}

#[test]
fn test_column_splices_are_kept() {
    let schemas = fixtures::schemas();
    let (parsed, _, _) = parse("{response}, (Red, {stim})", &schemas, &ParseOptions::default());
    let names: Vec<String> = parsed
        .unwrap()
        .column_splices()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, ["response", "stim"]);
}

#[test]
fn test_empty_string_parses_empty() {
    let schemas = fixtures::schemas();
    let (parsed, errors, warnings) = parse("", &schemas, &ParseOptions::default());
    assert!(parsed.unwrap().is_empty());
    assert!(errors.is_empty() && warnings.is_empty());
}

// =============================================================================
// Error fixtures
// =============================================================================

#[test]
fn test_lexical_errors_discard_tree() {
    let schemas = fixtures::schemas();
    for case in errors::lexical_errors() {
        let (parsed, errors, _) = parse(case.hed, &schemas, &ParseOptions::default());
        assert!(parsed.is_none(), "{}: tree survived", case.name);
        assert_eq!(codes(&errors), case.expected, "{}: {:?}", case.name, case.hed);
    }
}

#[test]
fn test_semantic_errors_keep_tree() {
    let schemas = fixtures::schemas();
    for case in errors::semantic_errors() {
        let (parsed, errors, _) = parse(case.hed, &schemas, &ParseOptions::default());
        assert!(parsed.is_some(), "{}: no tree", case.name);
        assert_eq!(codes(&errors), case.expected, "{}: {:?}", case.name, case.hed);
    }
}

#[test]
fn test_unresolved_tag_does_not_hide_siblings() {
    let schemas = fixtures::schemas();
    let (parsed, errors, _) = parse(
        "Nonexistent-tag, Width/3 s, Red",
        &schemas,
        &ParseOptions::default(),
    );
    assert_eq!(parsed.unwrap().tags().len(), 3);
    assert_eq!(
        codes(&errors),
        [IssueCode::InvalidTag, IssueCode::UnitClassInvalidUnit]
    );
}

#[test]
fn test_invalid_unit_lists_legal_units() {
    let schemas = fixtures::schemas();
    let (_, errors, _) = parse("Width/3 s", &schemas, &ParseOptions::default());
    let units = errors[0].get("unitClassUnits").unwrap();
    assert!(units.split(',').any(|u| u == "metre"));
    assert!(units.split(',').any(|u| u == "foot"));
}

#[test]
fn test_issue_limit_drops_warnings_only() {
    let schemas = fixtures::schemas();
    let options = ParseOptions::builder().max_issues(1).check_for_warnings(true).build();
    let (_, errors, warnings) = parse("Item/Widget, Item/Gadget, Nonsense-tag", &schemas, &options);
    assert_eq!(codes(&errors), [IssueCode::InvalidTag]);
    assert_eq!(codes(&warnings), [IssueCode::TagExtended, IssueCode::IssueLimitExceeded]);
}

#[test]
fn test_issue_limit_without_warnings_keeps_every_error() {
    let schemas = fixtures::schemas();
    let options = ParseOptions::builder().max_issues(2).build();
    let (_, errors, warnings) = parse("Foo, Bar, Baz, Qux", &schemas, &options);
    assert_eq!(count_code(&errors, IssueCode::InvalidTag), 4);
    assert!(warnings.is_empty());
}

#[test]
fn test_string_too_long() {
    let schemas = fixtures::schemas();
    let options = ParseOptions::builder().max_string_length(8).build();
    let (parsed, errors, _) = parse("Sensory-event", &schemas, &options);
    assert!(parsed.is_none());
    assert_eq!(codes(&errors), [IssueCode::StringTooLong]);
}

// =============================================================================
// Batch parsing
// =============================================================================

#[test]
fn test_parse_many_serial_and_parallel_agree() {
    init_tracing();
    let schemas = fixtures::schemas();
    let mut inputs: Vec<String> = fixtures::valid_strings()
        .into_iter()
        .map(|(_, hed)| hed.to_string())
        .collect();
    inputs.push("Nonexistent-tag".to_string());
    inputs.push("x,,y".to_string());

    let serial = ParseOptions::builder().parallel_threshold(usize::MAX).build();
    let parallel = ParseOptions::builder().parallel_threshold(1).build();
    let (trees_a, issues_a) = parse_many(&inputs, &schemas, &serial);
    let (trees_b, issues_b) = parse_many(&inputs, &schemas, &parallel);

    assert_eq!(trees_a.len(), inputs.len());
    assert_eq!(issues_a.keys().collect::<Vec<_>>(), issues_b.keys().collect::<Vec<_>>());
    let last = inputs.len() - 1;
    assert!(trees_a[last].is_none() && trees_b[last].is_none());
    assert_eq!(codes(&issues_a[&(last - 1)]), [IssueCode::InvalidTag]);
    for (a, b) in trees_a.iter().zip(&trees_b) {
        assert_eq!(
            a.as_ref().map(|t| t.canonical_form()),
            b.as_ref().map(|t| t.canonical_form())
        );
    }
}
