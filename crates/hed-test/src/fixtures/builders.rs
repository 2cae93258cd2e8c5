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

//! Builders for annotation strings.

/// Fluent builder joining top-level items with `", "`.
///
/// # Examples
///
/// ```
/// use hed_test::fixtures::builders::HedStringBuilder;
///
/// let hed = HedStringBuilder::new()
///     .definition("MyDef", &["Sensory-event", "Red"])
///     .build();
/// assert_eq!(hed, "(Definition/MyDef, (Sensory-event, Red))");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HedStringBuilder {
    items: Vec<String>,
}

impl HedStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.items.push(tag.into());
        self
    }

    /// A parenthesized group of tags.
    pub fn group(mut self, tags: &[&str]) -> Self {
        self.items.push(format!("({})", tags.join(", ")));
        self
    }

    /// `(Definition/<name>, (<content>))`. Empty content leaves out the inner group.
    pub fn definition(mut self, name: &str, content: &[&str]) -> Self {
        if content.is_empty() {
            self.items.push(format!("(Definition/{})", name));
        } else {
            self.items.push(format!("(Definition/{}, ({}))", name, content.join(", ")));
        }
        self
    }

    pub fn onset(self, def: &str) -> Self {
        self.temporal("Onset", def, &[])
    }

    /// `(Onset, Def/<def>, (<content>))`.
    pub fn onset_with(self, def: &str, content: &[&str]) -> Self {
        self.temporal("Onset", def, content)
    }

    pub fn offset(self, def: &str) -> Self {
        self.temporal("Offset", def, &[])
    }

    pub fn inset(self, def: &str) -> Self {
        self.temporal("Inset", def, &[])
    }

    fn temporal(mut self, marker: &str, def: &str, content: &[&str]) -> Self {
        let mut item = format!("({}, Def/{}", marker, def);
        if !content.is_empty() {
            item.push_str(&format!(", ({})", content.join(", ")));
        }
        item.push(')');
        self.items.push(item);
        self
    }

    pub fn build(self) -> String {
        self.items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporal_groups() {
        let hed = HedStringBuilder::new()
            .onset_with("MyDef", &["Red"])
            .offset("MyDef")
            .build();
        assert_eq!(hed, "(Onset, Def/MyDef, (Red)), (Offset, Def/MyDef)");
    }

    #[test]
    fn test_plain_items() {
        let hed = HedStringBuilder::new().tag("Red").group(&["Blue", "Green"]).build();
        assert_eq!(hed, "Red, (Blue, Green)");
    }
}
