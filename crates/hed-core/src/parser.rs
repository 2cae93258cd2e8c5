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

//! Entry points for parsing annotation strings.
//!
//! # Pipeline
//!
//! 1. [`tokenize`] the raw string; any lexical issue ends here with no tree
//! 2. Resolve each tag span against the schemas and run per-tag checks
//! 3. Assemble groups and run the string-level structural checks
//!
//! Semantic failures never discard the tree: an unresolved tag stays in
//! place in its original form so its siblings are still validated.

use crate::issue::{Issue, IssueSink};
use crate::lex::tokenize;
use crate::limits::Limits;
use crate::schema::Schemas;
use crate::string::ParsedString;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Options for parsing annotation strings.
///
/// # Examples
///
/// ```
/// use hed_core::ParseOptions;
///
/// let opts = ParseOptions::builder()
///     .check_for_warnings(true)
///     .max_group_depth(20)
///     .parallel_threshold(64)
///     .build();
/// assert!(opts.check_for_warnings);
/// assert_eq!(opts.limits.max_group_depth, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Report warnings as well as errors.
    pub check_for_warnings: bool,
    /// Resource limits.
    pub limits: Limits,
    /// Minimum batch size for parallel parsing in [`parse_many`].
    pub parallel_threshold: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            check_for_warnings: false,
            limits: Limits::default(),
            parallel_threshold: 10,
        }
    }
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }

    fn sink(&self) -> IssueSink {
        IssueSink::new(self.check_for_warnings, self.limits.max_issues)
    }
}

/// Builder for ergonomic construction of ParseOptions.
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_for_warnings(mut self, enabled: bool) -> Self {
        self.options.check_for_warnings = enabled;
        self
    }

    /// Replace all limits at once.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.options.limits = limits;
        self
    }

    pub fn max_string_length(mut self, bytes: usize) -> Self {
        self.options.limits.max_string_length = bytes;
        self
    }

    pub fn max_group_depth(mut self, depth: usize) -> Self {
        self.options.limits.max_group_depth = depth;
        self
    }

    pub fn max_issues(mut self, count: usize) -> Self {
        self.options.limits.max_issues = count;
        self
    }

    /// Batches of at least this many strings are parsed in parallel.
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.options.parallel_threshold = threshold;
        self
    }

    pub fn build(self) -> ParseOptions {
        self.options
    }
}

/// Parse one annotation string.
///
/// Returns the tree (absent if the string is lexically invalid), the error
/// issues and the warning issues. Warnings are only reported when
/// `check_for_warnings` is set. The string is valid iff the error list is empty.
///
/// # Examples
///
/// ```
/// use hed_core::schema::{Schemas, SchemaBuilder, TagDefinition};
/// use hed_core::{parse, ParseOptions};
///
/// let schema = SchemaBuilder::new("8.3.0")
///     .tag(TagDefinition::new("Event"))
///     .tag(TagDefinition::new("Event/Sensory-event"))
///     .build()
///     .unwrap();
/// let schemas = Schemas::single(schema);
///
/// let (parsed, errors, _) = parse("Sensory-event, (Event)", &schemas, &ParseOptions::default());
/// assert!(errors.is_empty());
/// assert_eq!(parsed.unwrap().tags().len(), 2);
///
/// let (parsed, errors, _) = parse("x,y,", &schemas, &ParseOptions::default());
/// assert!(parsed.is_none());
/// assert_eq!(errors[0].code().as_str(), "emptyTagFound");
/// ```
pub fn parse(
    hed_string: &str,
    schemas: &Schemas,
    options: &ParseOptions,
) -> (Option<ParsedString>, Vec<Issue>, Vec<Issue>) {
    let mut sink = options.sink();
    let (tokens, lexical) = tokenize(hed_string, &options.limits);
    if !lexical.is_empty() {
        trace!(
            "Lexical issues in string of {} bytes: {}",
            hed_string.len(),
            lexical.len()
        );
        sink.extend(lexical);
        let (errors, warnings) = sink.split();
        return (None, errors, warnings);
    }

    let parsed = ParsedString::assemble(hed_string, tokens, schemas, &mut sink);
    trace!(
        "Parsed string: {} tags, {} groups, {} issues",
        parsed.tags().len(),
        parsed.all_groups().len(),
        sink.len()
    );
    let (errors, warnings) = sink.split();
    (Some(parsed), errors, warnings)
}

/// Parse many strings independently.
///
/// Batches of at least `parallel_threshold` strings are parsed on the rayon
/// pool. Results are returned in input order; the issue map holds errors
/// then warnings for each input index that had any.
pub fn parse_many<S>(
    hed_strings: &[S],
    schemas: &Schemas,
    options: &ParseOptions,
) -> (Vec<Option<ParsedString>>, BTreeMap<usize, Vec<Issue>>)
where
    S: AsRef<str> + Sync,
{
    let parse_one = |s: &S| parse(s.as_ref(), schemas, options);
    let outcomes: Vec<_> = if hed_strings.len() < options.parallel_threshold {
        debug!("Parsing {} strings serially", hed_strings.len());
        hed_strings.iter().map(parse_one).collect()
    } else {
        debug!("Parsing {} strings in parallel", hed_strings.len());
        hed_strings.par_iter().map(parse_one).collect()
    };

    let mut parsed = Vec::with_capacity(outcomes.len());
    let mut issues = BTreeMap::new();
    for (index, (tree, mut errors, warnings)) in outcomes.into_iter().enumerate() {
        parsed.push(tree);
        errors.extend(warnings);
        if !errors.is_empty() {
            issues.insert(index, errors);
        }
    }
    debug!(
        "Batch parse complete: {} strings, {} with issues",
        parsed.len(),
        issues.len()
    );
    (parsed, issues)
}
