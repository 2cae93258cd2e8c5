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

//! Property-based tests for tokenizing and parsing.

use hed_core::lex::{tokenize, Token};
use hed_core::{parse, IssueCode, Limits, ParseOptions};
use hed_test::fixtures;
use hed_test::{codes, count_code};
use proptest::prelude::*;

const TERMS: &[&str] = &[
    "Sensory-event",
    "Agent-action",
    "Red",
    "Green",
    "Blue",
    "Walk",
    "Press",
    "Computer-screen",
    "Human-agent",
    "Label/Trial-1",
    "Width/5 mm",
    "Item/Widget",
];

fn item() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => proptest::sample::select(TERMS).prop_map(str::to_string),
        1 => Just(String::new()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: the tokenizer never panics and every tag span slices the input.
    #[test]
    fn prop_tokenizer_bounds_slice_input(input in "\\PC{0,64}") {
        let (tokens, _) = tokenize(&input, &Limits::default());
        for token in tokens {
            if let Token::Tag(spec) = token {
                prop_assert!(spec.bounds().slice(&input).is_some());
            }
        }
    }

    /// Property: each empty span between delimiters is reported once.
    #[test]
    fn prop_one_issue_per_empty_span(items in proptest::collection::vec(item(), 2..8)) {
        let input = items.join(",");
        let expected = items.iter().filter(|i| i.is_empty()).count();
        let (_, issues) = tokenize(&input, &Limits::default());
        prop_assert_eq!(count_code(&issues, IssueCode::EmptyTagFound), expected);
        prop_assert_eq!(issues.len(), expected);
    }

    /// Property: nesting up to the depth limit is accepted and one level more is not.
    #[test]
    fn prop_group_depth_limit(limit in 1_usize..12, extra in 0_usize..3) {
        let depth = limit + extra;
        let input = format!("{}Red{}", "(".repeat(depth), ")".repeat(depth));
        let limits = Limits { max_group_depth: limit, ..Limits::default() };
        let (_, issues) = tokenize(&input, &limits);
        if extra == 0 {
            prop_assert!(issues.is_empty());
        } else {
            prop_assert_eq!(codes(&issues), vec![IssueCode::GroupTooDeep]);
        }
    }

    /// Property: unbalanced parentheses always produce a parenthesis error.
    #[test]
    fn prop_unbalanced_parentheses(open in 0_usize..6, close in 0_usize..6) {
        prop_assume!(open != close);
        let input = format!("{}Red{}", "(".repeat(open), ")".repeat(close));
        let (_, issues) = tokenize(&input, &Limits::default());
        let code = if close > open {
            IssueCode::UnopenedParenthesis
        } else {
            IssueCode::UnclosedParenthesis
        };
        prop_assert_eq!(codes(&issues), vec![code]);
    }

    /// Property: formatting in short form and reparsing is idempotent.
    #[test]
    fn prop_short_format_reparses(terms in proptest::sample::subsequence(TERMS, 1..6), grouped in any::<bool>()) {
        let schemas = fixtures::schemas();
        let options = ParseOptions::default();
        let input = if grouped {
            format!("({})", terms.join(", "))
        } else {
            terms.join(", ")
        };
        let (first, errors, _) = parse(&input, &schemas, &options);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let first = first.unwrap();

        let (second, errors, _) = parse(&first.format(false), &schemas, &options);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let second = second.unwrap();
        prop_assert_eq!(first.canonical_form(), second.canonical_form());
        prop_assert_eq!(first.format(false), second.format(false));

        let (long, errors, _) = parse(&first.format(true), &schemas, &options);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(first.canonical_form(), long.unwrap().canonical_form());
    }

    /// Property: the longest unit spelling wins and the number is stripped.
    #[test]
    fn prop_longest_unit_match(number in 0_u32..100_000, unit in proptest::sample::select(&["m", "mm", "km", "metre", "millimetres", "foot"][..])) {
        let schemas = fixtures::schemas();
        let input = format!("Width/{} {}", number, unit);
        let (parsed, errors, _) = parse(&input, &schemas, &ParseOptions::default());
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let parsed = parsed.unwrap();
        let units = parsed.tags()[0].validate_units();
        prop_assert!(units.found);
        prop_assert!(units.legal);
        prop_assert_eq!(units.stripped, number.to_string());
    }
}
