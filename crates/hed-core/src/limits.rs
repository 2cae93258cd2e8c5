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

//! Resource limits for HED string parsing.

use crate::issue::MAX_ISSUES;

/// Configurable limits for parser resources.
///
/// These bound the work done on a single annotation string and the number
/// of issues collected for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum annotation string length in bytes (default: 1MB).
    pub max_string_length: usize,
    /// Maximum parenthesis nesting depth (default: 100).
    pub max_group_depth: usize,
    /// Issue count past which warnings are dropped; errors are always kept (default: 10k).
    pub max_issues: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_length: 1024 * 1024, // 1MB
            max_group_depth: 100,
            max_issues: MAX_ISSUES,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_string_length: usize::MAX,
            max_group_depth: usize::MAX,
            max_issues: usize::MAX,
        }
    }
}
