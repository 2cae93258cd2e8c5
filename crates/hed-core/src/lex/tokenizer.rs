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

//! Single-pass tokenizer for HED annotation strings.
//!
//! The tokenizer turns a raw string into a flat, source-ordered list of
//! [`Token`]s: tag spans, group boundaries and column splices. It never
//! fails; problems become [`Issue`]s. Structural problems (parentheses,
//! braces, limits) stop the scan, every other problem is reported and the
//! scan continues.
//!
//! # Examples
//!
//! ```
//! use hed_core::lex::{tokenize, Token};
//! use hed_core::Limits;
//!
//! let (tokens, issues) = tokenize("Event, (Action, sc:Seizure)", &Limits::default());
//! assert!(issues.is_empty());
//! assert_eq!(tokens.len(), 5);
//! match &tokens[3] {
//!     Token::Tag(spec) => {
//!         assert_eq!(spec.library(), "sc");
//!         assert_eq!(spec.path(), "Seizure");
//!     }
//!     other => panic!("unexpected token {:?}", other),
//! }
//! ```

use super::span::Bounds;
use crate::issue::{Issue, IssueCode};
use crate::limits::Limits;

/// One tag as written, before schema resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    text: String,
    library: String,
    path_offset: usize,
    bounds: Bounds,
}

impl TagSpec {
    /// Build a tag spec from already-trimmed tag text, splitting off any `prefix:` marker.
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        let text = text.into();
        let (library, path_offset) = match split_library(&text) {
            Some(prefix) => (prefix.to_string(), prefix.len() + 1),
            None => (String::new(), 0),
        };
        Self {
            text,
            library,
            path_offset,
            bounds,
        }
    }

    /// The tag exactly as written, including any library prefix.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Library prefix, empty for the base schema.
    pub fn library(&self) -> &str {
        &self.library
    }

    /// The slash-delimited path after the library prefix.
    pub fn path(&self) -> &str {
        &self.text[self.path_offset..]
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A `{name}` placeholder resolved later against other columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSplice {
    name: String,
    bounds: Bounds,
}

impl ColumnSplice {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Output unit of the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Tag(TagSpec),
    /// `(` at the given byte index.
    GroupOpen(usize),
    /// `)` at the given byte index.
    GroupClose(usize),
    Splice(ColumnSplice),
}

/// `prefix:` marker at the start of a tag, if any.
fn split_library(text: &str) -> Option<&str> {
    let colon = text.find(':')?;
    let prefix = &text[..colon];
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    Some(prefix)
}

/// What the scanner saw last, used for empty-tag and missing-comma detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Delimiter,
    GroupOpen,
    GroupClose,
    Tag,
    Splice,
}

impl Last {
    /// A tag may not start here without a comma first.
    fn needs_comma(self) -> bool {
        matches!(self, Last::Tag | Last::GroupClose | Last::Splice)
    }

    /// A delimiter here closes an empty span.
    fn opens_span(self) -> bool {
        matches!(self, Last::Start | Last::Delimiter | Last::GroupOpen)
    }
}

/// Scanner state.
struct Tokenizer<'a> {
    input: &'a str,
    limits: &'a Limits,
    tokens: Vec<Token>,
    issues: Vec<Issue>,
    open_groups: Vec<usize>,
    buffer: String,
    tag_start: Option<usize>,
    tag_end: usize,
    brace_open: Option<usize>,
    last: Last,
}

/// Tokenize one annotation string.
///
/// Returns the tokens scanned (possibly partial after a structural error)
/// and every lexical issue found, in source order.
pub fn tokenize(input: &str, limits: &Limits) -> (Vec<Token>, Vec<Issue>) {
    let mut tokenizer = Tokenizer {
        input,
        limits,
        tokens: Vec::new(),
        issues: Vec::new(),
        open_groups: Vec::new(),
        buffer: String::new(),
        tag_start: None,
        tag_end: 0,
        brace_open: None,
        last: Last::Start,
    };
    tokenizer.run();
    (tokenizer.tokens, tokenizer.issues)
}

impl<'a> Tokenizer<'a> {
    fn run(&mut self) {
        if self.input.len() > self.limits.max_string_length {
            self.issues.push(
                Issue::new(IssueCode::StringTooLong)
                    .with_context("length", self.input.len())
                    .with_context("limit", self.limits.max_string_length),
            );
            return;
        }

        for (i, ch) in self.input.char_indices() {
            let keep_going = match self.brace_open {
                Some(open) => self.in_brace(open, i, ch),
                None => self.step(i, ch),
            };
            if !keep_going {
                return;
            }
        }
        self.finish();
    }

    /// Handle one character inside `{...}`. Returns false on a structural error.
    fn in_brace(&mut self, open: usize, i: usize, ch: char) -> bool {
        match ch {
            '}' => {
                let name = self.input[open + 1..i].trim();
                let bounds = Bounds::new(open, i + 1);
                if name.is_empty() {
                    self.issues.push(
                        Issue::new(IssueCode::EmptyCurlyBrace)
                            .with_context("index", open)
                            .with_context("string", self.input),
                    );
                } else {
                    self.tokens.push(Token::Splice(ColumnSplice::new(name, bounds)));
                }
                self.brace_open = None;
                self.last = Last::Splice;
                true
            }
            '{' => {
                self.fatal(IssueCode::NestedCurlyBrace, i);
                false
            }
            ',' | '(' | ')' => {
                self.fatal(IssueCode::UnclosedCurlyBrace, open);
                false
            }
            _ => true,
        }
    }

    /// Handle one character outside braces. Returns false on a structural error.
    fn step(&mut self, i: usize, ch: char) -> bool {
        match ch {
            '"' => {}
            ',' => {
                let had_tag = self.flush_tag();
                if !had_tag && self.last.opens_span() {
                    self.empty_tag(i);
                }
                self.last = Last::Delimiter;
            }
            '(' => {
                let had_tag = self.flush_tag();
                if had_tag || self.last.needs_comma() {
                    self.comma_missing(i);
                }
                self.open_groups.push(i);
                if self.open_groups.len() > self.limits.max_group_depth {
                    self.issues.push(
                        Issue::new(IssueCode::GroupTooDeep)
                            .with_context("index", i)
                            .with_context("limit", self.limits.max_group_depth),
                    );
                    return false;
                }
                self.tokens.push(Token::GroupOpen(i));
                self.last = Last::GroupOpen;
            }
            ')' => {
                let had_tag = self.flush_tag();
                if self.open_groups.pop().is_none() {
                    self.fatal(IssueCode::UnopenedParenthesis, i);
                    return false;
                }
                if !had_tag && self.last.opens_span() {
                    self.empty_tag(i);
                }
                self.tokens.push(Token::GroupClose(i));
                self.last = Last::GroupClose;
            }
            '{' => {
                let had_tag = self.flush_tag();
                if had_tag || self.last.needs_comma() {
                    self.comma_missing(i);
                }
                self.brace_open = Some(i);
            }
            '}' => {
                self.fatal(IssueCode::UnclosedCurlyBrace, i);
                return false;
            }
            '[' | ']' | '~' => self.invalid_character(i, ch),
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => self.invalid_character(i, c),
            c if c.is_whitespace() => {
                if self.tag_start.is_some() {
                    self.buffer.push(c);
                }
            }
            c => {
                if self.tag_start.is_none() {
                    if self.last.needs_comma() {
                        self.comma_missing(i);
                    }
                    self.tag_start = Some(i);
                }
                self.buffer.push(c);
                self.tag_end = i + c.len_utf8();
            }
        }
        true
    }

    fn finish(&mut self) {
        if let Some(open) = self.brace_open {
            self.fatal(IssueCode::UnclosedCurlyBrace, open);
            return;
        }
        let had_tag = self.flush_tag();
        if !had_tag && self.last == Last::Delimiter {
            self.empty_tag(self.input.len());
        }
        if let Some(&open) = self.open_groups.first() {
            self.fatal(IssueCode::UnclosedParenthesis, open);
        }
    }

    /// Emit the tag under construction, if any. Returns whether one was emitted.
    fn flush_tag(&mut self) -> bool {
        let Some(start) = self.tag_start.take() else {
            return false;
        };
        let text = self.buffer.trim_end().to_string();
        self.buffer.clear();
        let bounds = Bounds::new(start, self.tag_end);
        self.check_slashes(&text, bounds);
        self.tokens.push(Token::Tag(TagSpec::new(text, bounds)));
        self.last = Last::Tag;
        true
    }

    /// One `extraSlash` per leading, trailing or repeated run of slashes and
    /// one `extraBlank` per run touching whitespace.
    fn check_slashes(&mut self, text: &str, bounds: Bounds) {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut k = 0;
        while k < chars.len() {
            if chars[k].1 != '/' {
                k += 1;
                continue;
            }
            let run_start = k;
            while k < chars.len() && chars[k].1 == '/' {
                k += 1;
            }
            let run_len = k - run_start;
            let offset = bounds.start() + chars[run_start].0;
            if run_len > 1 || run_start == 0 || k == chars.len() {
                self.issues.push(
                    Issue::new(IssueCode::ExtraSlash)
                        .with_context("tag", text)
                        .with_context("index", offset),
                );
            }
            let blank_before = run_start > 0 && chars[run_start - 1].1.is_whitespace();
            let blank_after = k < chars.len() && chars[k].1.is_whitespace();
            if blank_before || blank_after {
                self.issues.push(
                    Issue::new(IssueCode::ExtraBlank)
                        .with_context("tag", text)
                        .with_context("index", offset),
                );
            }
        }
    }

    fn empty_tag(&mut self, index: usize) {
        self.issues.push(
            Issue::new(IssueCode::EmptyTagFound)
                .with_context("index", index)
                .with_context("string", self.input),
        );
    }

    fn comma_missing(&mut self, index: usize) {
        let previous = self
            .tokens
            .iter()
            .rev()
            .find_map(|t| match t {
                Token::Tag(spec) => Some(spec.text().to_string()),
                Token::Splice(splice) => Some(format!("{{{}}}", splice.name())),
                _ => None,
            })
            .unwrap_or_default();
        self.issues.push(
            Issue::new(IssueCode::CommaMissing)
                .with_context("tag", previous)
                .with_context("index", index),
        );
    }

    fn invalid_character(&mut self, index: usize, ch: char) {
        self.issues.push(
            Issue::new(IssueCode::InvalidCharacter)
                .with_context("character", ch)
                .with_context("index", index)
                .with_context("string", self.input),
        );
    }

    fn fatal(&mut self, code: IssueCode, index: usize) {
        self.issues.push(
            Issue::new(code)
                .with_context("index", index)
                .with_context("string", self.input),
        );
    }
}
