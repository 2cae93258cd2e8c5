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

//! Parsing and schema resolution for HED annotation strings.
//!
//! HED (Hierarchical Event Descriptors) annotations are comma-delimited,
//! parenthetically grouped tag expressions checked against a versioned
//! vocabulary. This crate turns one annotation string into a validated tree:
//!
//! - [`lex`] tokenizes the raw text and enforces the lexical rules
//! - [`schema`] holds the immutable vocabulary and the reserved-tag catalog
//! - [`TagConverter`] resolves each tag span to a schema entry plus remainder
//! - [`ParsedTag`], [`ParsedGroup`] and [`ParsedString`] form the tree
//! - [`Issue`] and [`IssueSink`] carry every finding as plain data
//!
//! Dataset-level checks (definitions, onset/offset scoping) live in the
//! `hed-validate` crate.
//!
//! # Examples
//!
//! ```
//! use hed_core::schema::{Schemas, SchemaBuilder, TagDefinition};
//! use hed_core::{parse, ParseOptions};
//!
//! let schema = SchemaBuilder::new("8.3.0")
//!     .tag(TagDefinition::new("Event"))
//!     .tag(TagDefinition::new("Event/Sensory-event"))
//!     .build()
//!     .unwrap();
//! let schemas = Schemas::single(schema);
//!
//! let (parsed, errors, warnings) = parse("Sensory-event", &schemas, &ParseOptions::default());
//! assert!(errors.is_empty() && warnings.is_empty());
//! assert_eq!(parsed.unwrap().tags()[0].canonical(), Some("Event/Sensory-event"));
//! ```

mod converter;
mod error;
mod group;
mod issue;
pub mod lex;
mod limits;
mod parser;
pub mod schema;
mod string;
mod tag;

pub use converter::{convert_tag, Conversion, TagConverter};
pub use error::{HedError, HedErrorKind, HedResult};
pub use group::{DefinitionName, GroupChild, GroupKind, ParsedGroup};
pub use issue::{split_issues, Issue, IssueCode, IssueSink, Severity, MAX_ISSUES};
pub use limits::Limits;
pub use parser::{parse, parse_many, ParseOptions, ParseOptionsBuilder};
pub use string::ParsedString;
pub use tag::{ParsedTag, UnitMatch, PLACEHOLDER};
