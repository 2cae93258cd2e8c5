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

//! Error types for schema construction and other hard failures.
//!
//! Problems found in annotation data are reported as [`Issue`](crate::Issue)
//! values. A [`HedError`] is reserved for violations of the schema contract,
//! which abort the whole validation run.

use std::fmt;
use thiserror::Error;

/// The kind of hard error that occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HedErrorKind {
    /// Schema entries contradict each other (missing parent, unknown class).
    Schema,
    /// Two schema entries claim the same name.
    Collision,
    /// A value-class or name-class pattern failed to compile.
    Pattern,
    /// A typed input, such as an onset time, could not be read.
    Value,
}

impl fmt::Display for HedErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "SchemaError"),
            Self::Collision => write!(f, "CollisionError"),
            Self::Pattern => write!(f, "PatternError"),
            Self::Value => write!(f, "ValueError"),
        }
    }
}

/// A hard error raised while building or using a schema.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct HedError {
    /// The kind of error.
    pub kind: HedErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Additional context (e.g., the schema version being built).
    pub context: Option<String>,
}

impl HedError {
    /// Create a new error.
    pub fn new(kind: HedErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::Schema, message)
    }

    pub fn collision(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::Collision, message)
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::Pattern, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::Value, message)
    }
}

impl From<regex::Error> for HedError {
    fn from(err: regex::Error) -> Self {
        Self::pattern(err.to_string())
    }
}

/// Result type for HED operations that can fail hard.
pub type HedResult<T> = Result<T, HedError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== HedErrorKind Display tests ====================

    #[test]
    fn test_error_kind_display() {
        assert_eq!(format!("{}", HedErrorKind::Schema), "SchemaError");
        assert_eq!(format!("{}", HedErrorKind::Collision), "CollisionError");
        assert_eq!(format!("{}", HedErrorKind::Pattern), "PatternError");
        assert_eq!(format!("{}", HedErrorKind::Value), "ValueError");
    }

    // ==================== HedError constructor tests ====================

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(HedError::schema("x").kind, HedErrorKind::Schema);
        assert_eq!(HedError::collision("x").kind, HedErrorKind::Collision);
        assert_eq!(HedError::pattern("x").kind, HedErrorKind::Pattern);
        assert_eq!(HedError::value("x").kind, HedErrorKind::Value);
    }

    #[test]
    fn test_with_context() {
        let err = HedError::collision("duplicate tag 'Event'").with_context("schema 8.3.0");
        assert_eq!(err.context.as_deref(), Some("schema 8.3.0"));
    }

    #[test]
    fn test_display_format() {
        let err = HedError::schema("tag 'Foo/Bar' has no parent 'Foo'");
        assert_eq!(err.to_string(), "SchemaError: tag 'Foo/Bar' has no parent 'Foo'");
    }

    #[test]
    fn test_from_regex_error() {
        let err: HedError = regex::Regex::new("(").unwrap_err().into();
        assert_eq!(err.kind, HedErrorKind::Pattern);
    }
}
