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

//! Validation issues and the sink that collects them.
//!
//! An [`Issue`] is pure data: a stable [`IssueCode`], a [`Severity`] and a
//! context map used to render messages and to cross-reference source rows.
//! Every stage of the pipeline returns issues rather than failing.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Informational, never affects validity.
    Warning,
    /// The annotation is invalid.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

macro_rules! issue_codes {
    ($($variant:ident => $name:literal, $hed:literal, $severity:ident;)*) => {
        /// Stable identifier of an issue kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum IssueCode {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $name))]
                $variant,
            )*
        }

        impl IssueCode {
            /// Every code, in declaration order.
            pub const ALL: &'static [IssueCode] = &[$(IssueCode::$variant),*];

            /// The camelCase code string exposed to reporting layers.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// The standard HED error code this issue maps to.
            pub fn hed_code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $hed,)*
                }
            }

            /// Severity an issue of this kind carries.
            pub fn severity(&self) -> Severity {
                match self {
                    $(Self::$variant => Severity::$severity,)*
                }
            }

            /// Look a code up by its camelCase string.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

issue_codes! {
    // Lexical
    EmptyTagFound => "emptyTagFound", "TAG_EMPTY", Error;
    ExtraSlash => "extraSlash", "TAG_INVALID", Error;
    ExtraBlank => "extraBlank", "TAG_INVALID", Error;
    InvalidCharacter => "invalidCharacter", "CHARACTER_INVALID", Error;
    UnclosedParenthesis => "unclosedParenthesis", "PARENTHESES_MISMATCH", Error;
    UnopenedParenthesis => "unopenedParenthesis", "PARENTHESES_MISMATCH", Error;
    CommaMissing => "commaMissing", "COMMA_MISSING", Error;
    UnclosedCurlyBrace => "unclosedCurlyBrace", "SIDECAR_BRACES_INVALID", Error;
    NestedCurlyBrace => "nestedCurlyBrace", "SIDECAR_BRACES_INVALID", Error;
    EmptyCurlyBrace => "emptyCurlyBrace", "SIDECAR_BRACES_INVALID", Error;
    StringTooLong => "stringTooLong", "TAG_INVALID", Error;
    GroupTooDeep => "groupTooDeep", "TAG_GROUP_ERROR", Error;
    // Schema resolution
    InvalidTag => "invalidTag", "TAG_INVALID", Error;
    InvalidParentNode => "invalidParentNode", "TAG_EXTENSION_INVALID", Error;
    UnmatchedBaseSchema => "unmatchedBaseSchema", "TAG_PREFIX_INVALID", Error;
    UnmatchedLibrarySchema => "unmatchedLibrarySchema", "TAG_PREFIX_INVALID", Error;
    ExtensionNotAllowed => "extensionNotAllowed", "TAG_EXTENSION_INVALID", Error;
    InvalidExtension => "invalidExtension", "TAG_EXTENSION_INVALID", Error;
    TagExtended => "tagExtended", "TAG_EXTENDED", Warning;
    UnitClassInvalidUnit => "unitClassInvalidUnit", "UNITS_INVALID", Error;
    UnitClassDefaultUsed => "unitClassDefaultUsed", "UNITS_MISSING", Warning;
    InvalidValue => "invalidValue", "VALUE_INVALID", Error;
    // String structure
    DuplicateTag => "duplicateTag", "TAG_EXPRESSION_REPEATED", Error;
    ConflictingReservedTags => "conflictingReservedTags", "TAG_GROUP_ERROR", Error;
    InvalidTopLevelTag => "invalidTopLevelTag", "TAG_GROUP_ERROR", Error;
    // Definitions
    InvalidDefinition => "invalidDefinition", "DEFINITION_INVALID", Error;
    DuplicateDefinition => "duplicateDefinition", "DEFINITION_INVALID", Error;
    // Temporal
    InactiveOnset => "inactiveOnset", "TEMPORAL_TAG_ERROR", Error;
    TemporalTagError => "temporalTagError", "TEMPORAL_TAG_ERROR", Error;
    DuplicateTemporalEvent => "duplicateTemporalEvent", "TEMPORAL_TAG_ERROR", Error;
    TemporalTagInNonTemporalContext => "temporalTagInNonTemporalContext", "TEMPORAL_TAG_ERROR", Error;
    // Dataset
    CurlyBracesInHedColumn => "curlyBracesInHedColumn", "SIDECAR_BRACES_INVALID", Error;
    IssueLimitExceeded => "issueLimitExceeded", "GENERIC_ERROR", Warning;
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Issue {
    code: IssueCode,
    severity: Severity,
    context: BTreeMap<String, String>,
}

impl Issue {
    /// Create an issue with the code's default severity and an empty context.
    pub fn new(code: IssueCode) -> Self {
        Self {
            code,
            severity: code.severity(),
            context: BTreeMap::new(),
        }
    }

    /// Add a context entry.
    pub fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    /// Set a context entry in place.
    pub fn set_context(&mut self, key: &str, value: impl ToString) {
        self.context.insert(key.to_string(), value.to_string());
    }

    pub fn code(&self) -> IssueCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    /// Look up one context value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Render a human-readable message from the context.
    pub fn message(&self) -> String {
        let c = |key: &str| self.get(key).unwrap_or("");
        match self.code {
            IssueCode::EmptyTagFound => format!("Empty tag at index {}.", c("index")),
            IssueCode::ExtraSlash => format!("Tag \"{}\" has extra slashes.", c("tag")),
            IssueCode::ExtraBlank => {
                format!("Tag \"{}\" has blanks next to a slash.", c("tag"))
            }
            IssueCode::InvalidCharacter => format!(
                "Invalid character \"{}\" at index {}.",
                c("character"),
                c("index")
            ),
            IssueCode::UnclosedParenthesis => {
                format!("Unclosed parenthesis opened at index {}.", c("index"))
            }
            IssueCode::UnopenedParenthesis => {
                format!("Closing parenthesis at index {} was never opened.", c("index"))
            }
            IssueCode::CommaMissing => format!("Comma missing after \"{}\".", c("tag")),
            IssueCode::UnclosedCurlyBrace => {
                format!("Unmatched curly brace at index {}.", c("index"))
            }
            IssueCode::NestedCurlyBrace => format!("Nested curly brace at index {}.", c("index")),
            IssueCode::EmptyCurlyBrace => format!("Empty curly braces at index {}.", c("index")),
            IssueCode::StringTooLong => format!(
                "String length {} exceeds the limit of {} bytes.",
                c("length"),
                c("limit")
            ),
            IssueCode::GroupTooDeep => {
                format!("Group nesting exceeds the limit of {} levels.", c("limit"))
            }
            IssueCode::InvalidTag => format!("Invalid tag \"{}\".", c("tag")),
            IssueCode::InvalidParentNode => format!(
                "\"{}\" appears as \"{}\" and cannot be used as an extension.",
                c("tag"),
                c("parentTag")
            ),
            IssueCode::UnmatchedBaseSchema => {
                format!("Tag \"{}\" is declared to use a base schema, but none was loaded.", c("tag"))
            }
            IssueCode::UnmatchedLibrarySchema => format!(
                "Tag \"{}\" uses library prefix \"{}\", which has no loaded schema.",
                c("tag"),
                c("library")
            ),
            IssueCode::ExtensionNotAllowed => {
                format!("Tag \"{}\" extends a term that does not allow extension.", c("tag"))
            }
            IssueCode::InvalidExtension => format!(
                "Tag \"{}\" has an invalid extension \"{}\".",
                c("tag"),
                c("extension")
            ),
            IssueCode::TagExtended => format!("Tag \"{}\" extends the schema.", c("tag")),
            IssueCode::UnitClassInvalidUnit => format!(
                "Invalid unit in \"{}\"; valid units are \"{}\".",
                c("tag"),
                c("unitClassUnits")
            ),
            IssueCode::UnitClassDefaultUsed => format!(
                "No unit given for \"{}\"; the default unit \"{}\" applies.",
                c("tag"),
                c("defaultUnit")
            ),
            IssueCode::InvalidValue => format!("Invalid value in tag \"{}\".", c("tag")),
            IssueCode::DuplicateTag => format!("Duplicate tag \"{}\".", c("tag")),
            IssueCode::ConflictingReservedTags => {
                format!("Group \"{}\" carries conflicting reserved tags.", c("group"))
            }
            IssueCode::InvalidTopLevelTag => {
                format!("Tag \"{}\" must appear inside a top-level tag group.", c("tag"))
            }
            IssueCode::InvalidDefinition => format!(
                "Definition \"{}\" is invalid: {}.",
                c("definition"),
                c("reason")
            ),
            IssueCode::DuplicateDefinition => {
                format!("Definition \"{}\" is declared more than once.", c("definition"))
            }
            IssueCode::InactiveOnset => format!(
                "\"{}\" closes definition \"{}\", which has no open onset.",
                c("tag"),
                c("definition")
            ),
            IssueCode::TemporalTagError => {
                format!("Temporal group \"{}\" is malformed: {}.", c("group"), c("reason"))
            }
            IssueCode::DuplicateTemporalEvent => format!(
                "Definition \"{}\" has more than one temporal event at the same onset.",
                c("definition")
            ),
            IssueCode::TemporalTagInNonTemporalContext => {
                format!("Temporal tag \"{}\" used without a timeline.", c("tag"))
            }
            IssueCode::CurlyBracesInHedColumn => {
                format!("Column splices are not allowed in \"{}\".", c("string"))
            }
            IssueCode::IssueLimitExceeded => format!(
                "Stopped after {} issues; further warnings were dropped.",
                c("limit")
            ),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message())
    }
}

/// Partition issues into `(errors, warnings)`, preserving order.
pub fn split_issues(issues: Vec<Issue>) -> (Vec<Issue>, Vec<Issue>) {
    issues.into_iter().partition(Issue::is_error)
}

/// Default cap on collected issues.
pub const MAX_ISSUES: usize = 10_000;

/// Ordered accumulator for issues.
///
/// Warnings are dropped unless `check_for_warnings` is set. Errors are always
/// kept. Once `max_issues` issues are held, further warnings are discarded and
/// one [`IssueCode::IssueLimitExceeded`] note is appended in their place.
#[derive(Debug, Clone)]
pub struct IssueSink {
    issues: Vec<Issue>,
    check_for_warnings: bool,
    max_issues: usize,
    truncated: bool,
}

impl Default for IssueSink {
    fn default() -> Self {
        Self::new(false, MAX_ISSUES)
    }
}

impl IssueSink {
    pub fn new(check_for_warnings: bool, max_issues: usize) -> Self {
        Self {
            issues: Vec::new(),
            check_for_warnings,
            max_issues,
            truncated: false,
        }
    }

    /// Record one issue.
    pub fn push(&mut self, issue: Issue) {
        if issue.is_error() {
            self.issues.push(issue);
            return;
        }
        if !self.check_for_warnings {
            return;
        }
        if self.issues.len() >= self.max_issues {
            if !self.truncated {
                self.truncated = true;
                self.issues.push(
                    Issue::new(IssueCode::IssueLimitExceeded).with_context("limit", self.max_issues),
                );
            }
            return;
        }
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Consume the sink, returning `(errors, warnings)`.
    pub fn split(self) -> (Vec<Issue>, Vec<Issue>) {
        split_issues(self.issues)
    }
}

impl Extend<Issue> for IssueSink {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        for issue in iter {
            self.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== IssueCode tests ====================

    #[test]
    fn test_code_strings_are_unique() {
        let mut names: Vec<&str> = IssueCode::ALL.iter().map(IssueCode::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), IssueCode::ALL.len());
    }

    #[test]
    fn test_code_from_name_inverts_as_str() {
        for code in IssueCode::ALL {
            assert_eq!(IssueCode::from_name(code.as_str()), Some(*code));
        }
        assert_eq!(IssueCode::from_name("noSuchCode"), None);
    }

    #[test]
    fn test_hed_codes() {
        assert_eq!(IssueCode::EmptyTagFound.hed_code(), "TAG_EMPTY");
        assert_eq!(IssueCode::ExtraSlash.hed_code(), "TAG_INVALID");
        assert_eq!(IssueCode::NestedCurlyBrace.hed_code(), "SIDECAR_BRACES_INVALID");
        assert_eq!(IssueCode::InactiveOnset.hed_code(), "TEMPORAL_TAG_ERROR");
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(IssueCode::TagExtended.severity(), Severity::Warning);
        assert_eq!(IssueCode::UnitClassDefaultUsed.severity(), Severity::Warning);
        assert_eq!(IssueCode::DuplicateDefinition.severity(), Severity::Error);
    }

    // ==================== Issue tests ====================

    #[test]
    fn test_issue_context_and_message() {
        let issue = Issue::new(IssueCode::ExtraSlash).with_context("tag", "x//y");
        assert_eq!(issue.get("tag"), Some("x//y"));
        assert!(issue.message().contains("x//y"));
        assert_eq!(
            issue.to_string(),
            "[extraSlash] error: Tag \"x//y\" has extra slashes."
        );
    }

    #[test]
    fn test_set_context_overwrites() {
        let mut issue = Issue::new(IssueCode::InvalidTag).with_context("tag", "a");
        issue.set_context("tag", "b");
        assert_eq!(issue.get("tag"), Some("b"));
    }

    #[test]
    fn test_split_issues_preserves_order() {
        let issues = vec![
            Issue::new(IssueCode::TagExtended).with_context("tag", "1"),
            Issue::new(IssueCode::InvalidTag).with_context("tag", "2"),
            Issue::new(IssueCode::ExtraSlash).with_context("tag", "3"),
        ];
        let (errors, warnings) = split_issues(issues);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].get("tag"), Some("2"));
        assert_eq!(errors[1].get("tag"), Some("3"));
        assert_eq!(warnings.len(), 1);
    }

    // ==================== IssueSink tests ====================

    #[test]
    fn test_sink_drops_warnings_by_default() {
        let mut sink = IssueSink::default();
        sink.push(Issue::new(IssueCode::TagExtended));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_keeps_warnings_when_requested() {
        let mut sink = IssueSink::new(true, MAX_ISSUES);
        sink.push(Issue::new(IssueCode::TagExtended));
        assert_eq!(sink.len(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_sink_limit_drops_warnings() {
        let mut sink = IssueSink::new(true, 2);
        sink.extend((0..5).map(|_| Issue::new(IssueCode::TagExtended)));
        assert_eq!(sink.len(), 3);
        assert!(sink.is_truncated());
        assert_eq!(sink.issues()[2].code(), IssueCode::IssueLimitExceeded);
    }

    #[test]
    fn test_sink_limit_keeps_errors() {
        let mut sink = IssueSink::new(true, 1);
        sink.push(Issue::new(IssueCode::TagExtended));
        sink.push(Issue::new(IssueCode::TagExtended));
        sink.push(Issue::new(IssueCode::InvalidTag));
        sink.push(Issue::new(IssueCode::ExtraSlash));
        let (errors, warnings) = sink.split();
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].code(), IssueCode::IssueLimitExceeded);
    }

    #[test]
    fn test_sink_limit_without_warnings_adds_no_note() {
        let mut sink = IssueSink::new(false, 1);
        sink.extend((0..3).map(|_| Issue::new(IssueCode::InvalidTag)));
        sink.push(Issue::new(IssueCode::TagExtended));
        assert_eq!(sink.len(), 3);
        assert!(!sink.is_truncated());
        assert!(sink.issues().iter().all(Issue::is_error));
    }

    #[test]
    fn test_sink_split() {
        let mut sink = IssueSink::new(true, MAX_ISSUES);
        sink.push(Issue::new(IssueCode::InvalidTag));
        sink.push(Issue::new(IssueCode::UnitClassDefaultUsed));
        let (errors, warnings) = sink.split();
        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_issue_serializes_with_camel_case_code() {
        let issue = Issue::new(IssueCode::InactiveOnset).with_context("definition", "mydef");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"inactiveOnset\""));
        assert!(json.contains("\"error\""));
        let back: Issue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issue);
    }
}
