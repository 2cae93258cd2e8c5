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

//! Shared test fixtures for HED validation.
//!
//! This crate provides a small schema shaped like the standard HED
//! vocabulary, a library schema, canonical valid strings, invalid strings
//! with their expected issue codes, and builders for annotation strings.
//!
//! # Quick Start
//!
//! ```rust
//! use hed_core::{parse, ParseOptions};
//! use hed_test::fixtures;
//!
//! let schemas = fixtures::schemas();
//! for (name, hed) in fixtures::valid_strings() {
//!     let (parsed, errors, _) = parse(hed, &schemas, &ParseOptions::default());
//!     assert!(errors.is_empty(), "{}: {:?}", name, errors);
//!     assert!(parsed.is_some());
//! }
//!
//! use hed_test::fixtures::builders::HedStringBuilder;
//!
//! let hed = HedStringBuilder::new()
//!     .onset("MyDef")
//!     .tag("Sensory-event")
//!     .build();
//! assert_eq!(hed, "(Onset, Def/MyDef), Sensory-event");
//! ```

pub mod fixtures;

use hed_core::{Issue, IssueCode};

/// Issue codes of a list, in order.
pub fn codes(issues: &[Issue]) -> Vec<IssueCode> {
    issues.iter().map(Issue::code).collect()
}

/// Number of issues carrying `code`.
pub fn count_code(issues: &[Issue], code: IssueCode) -> usize {
    issues.iter().filter(|issue| issue.code() == code).count()
}
