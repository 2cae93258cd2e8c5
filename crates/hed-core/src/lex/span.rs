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

//! Byte-offset spans into the original annotation string.
//!
//! # Examples
//!
//! ```
//! use hed_core::lex::Bounds;
//!
//! let text = "Event, Action";
//! let bounds = Bounds::new(7, 13);
//! assert_eq!(bounds.slice(text), Some("Action"));
//! assert_eq!(bounds.to_string(), "[7, 13)");
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` byte range in the original (untrimmed) string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    start: usize,
    end: usize,
}

impl Bounds {
    /// Creates a new range. `end` is clamped to be at least `start`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &Bounds) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both.
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The covered text, or `None` if the range is out of bounds or splits a character.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }

    /// Shift the range right by `offset` bytes.
    pub fn offset(&self, offset: usize) -> Bounds {
        Bounds::new(self.start + offset, self.end + offset)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_end() {
        let bounds = Bounds::new(5, 2);
        assert_eq!(bounds.start(), 5);
        assert_eq!(bounds.end(), 5);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_len_and_slice() {
        let bounds = Bounds::new(2, 5);
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds.slice("abcdefg"), Some("cde"));
        assert_eq!(Bounds::new(2, 50).slice("abc"), None);
    }

    #[test]
    fn test_contains_and_merge() {
        let outer = Bounds::new(0, 10);
        let inner = Bounds::new(3, 4);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert_eq!(inner.merge(&Bounds::new(8, 12)), Bounds::new(3, 12));
    }

    #[test]
    fn test_offset() {
        assert_eq!(Bounds::new(1, 3).offset(10), Bounds::new(11, 13));
    }

    #[test]
    fn test_ordering_by_start() {
        let mut spans = vec![Bounds::new(4, 5), Bounds::new(0, 2)];
        spans.sort();
        assert_eq!(spans[0].start(), 0);
    }
}
