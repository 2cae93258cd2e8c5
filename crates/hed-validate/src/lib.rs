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

//! Dataset-level validation of HED annotations.
//!
//! Single strings are parsed by `hed-core`. The checks here need more than
//! one string at a time:
//!
//! - [`extract_definitions`] builds a [`DefinitionTable`] and reports
//!   conflicting re-declarations
//! - [`validate_temporal`] runs the Onset/Offset/Inset scope state machine
//!   over the rows of a time-indexed table
//! - [`DatasetValidator`] chains row parsing, the table-level checks and the
//!   temporal pass the way an event table is validated
//!
//! # Examples
//!
//! ```
//! use hed_core::schema::{SchemaBuilder, Schemas, TagDefinition};
//! use hed_validate::{DatasetValidator, DefinitionTable, EventRow, Onset, ValidatorConfig};
//!
//! let schema = SchemaBuilder::new("8.3.0")
//!     .tags([
//!         TagDefinition::new("Red"),
//!         TagDefinition::new("Def"),
//!         TagDefinition::new("Def/#"),
//!         TagDefinition::new("Onset"),
//!         TagDefinition::new("Offset"),
//!     ])
//!     .build()
//!     .unwrap();
//! let schemas = Schemas::single(schema);
//! let validator = DatasetValidator::new(&schemas, ValidatorConfig::default());
//!
//! let rows = vec![
//!     EventRow::new("(Onset, Def/Trial)", Onset::Time(0.0), 2),
//!     EventRow::new("Red", Onset::Time(0.5), 3),
//!     EventRow::new("(Offset, Def/Trial)", Onset::Time(1.0), 4),
//! ];
//! let report = validator.validate(&rows, &DefinitionTable::new());
//! assert!(report.is_valid());
//! ```

mod dataset;
mod definitions;
mod temporal;

pub use dataset::{DatasetReport, DatasetValidator, EventRow, ValidatorConfig};
pub use definitions::{extract_definitions, Definition, DefinitionTable};
pub use temporal::{validate_temporal, EventManager, Onset, TemporalEvent, TemporalKind, TemporalRow};
