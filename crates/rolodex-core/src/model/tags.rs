//! Tag sets and their comma-joined wire encoding.
//!
//! The contact service stores tags as a single string such as
//! `"friend,work"`. Inside the client a contact's tags are a [`TagSet`]; the
//! string form only exists at the serialization boundary ([`TagSet::encode`] /
//! [`TagSet::decode`]).
//!
//! [`TagChecklist`] is the checkbox state of the add and edit forms: one box
//! per vocabulary tag, in vocabulary order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Tags offered when no vocabulary is configured.
pub const DEFAULT_VOCABULARY: [&str; 4] = ["family", "friend", "work", "classmate"];

const SEPARATOR: char = ',';

/// Trim a raw label; empty labels and labels containing the separator are rejected.
fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() || tag.contains(SEPARATOR) {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Normalize a configured vocabulary: trim entries, drop blanks and duplicates,
/// keep first-seen order.
#[must_use]
pub fn normalize_vocabulary<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .filter_map(|entry| normalize_tag(entry.as_ref()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// An unordered set of short labels attached to a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse the comma-joined wire form. Pieces are trimmed and blanks dropped,
    /// so `""`, `" , "` and a missing field all decode to the empty set.
    #[must_use]
    pub fn decode(joined: &str) -> Self {
        Self(joined.split(SEPARATOR).filter_map(normalize_tag).collect())
    }

    /// Comma-joined wire form; the empty set encodes to `""`.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (idx, tag) in self.0.iter().enumerate() {
            if idx > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(tag);
        }
        out
    }

    /// Insert a single label. Returns `false` when the label was already
    /// present or cannot be represented in the wire form.
    pub fn insert(&mut self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|tag| self.0.insert(tag))
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(tag.trim())
    }

    /// Exact membership test; `"wo"` is not contained in `{"work"}`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.0.extend(Self::decode(item.as_ref()).0);
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Option::<Wire>::deserialize(deserializer)? {
            None => Self::new(),
            Some(Wire::Joined(joined)) => Self::decode(&joined),
            Some(Wire::List(items)) => items.into_iter().collect(),
        })
    }
}

/// One checkbox in a form's tag group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCheckbox {
    pub label: String,
    pub checked: bool,
}

/// Checkbox state for the tag group of the add/edit forms.
///
/// Boxes beyond the vocabulary are created when a contact carrying an
/// unknown tag is loaded into the form, so editing never drops tags the
/// service already stores. [`TagChecklist::clear`] removes them again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChecklist {
    boxes: Vec<TagCheckbox>,
    vocabulary_len: usize,
}

impl TagChecklist {
    #[must_use]
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Self {
        let boxes: Vec<TagCheckbox> = normalize_vocabulary(vocabulary)
            .into_iter()
            .map(|label| TagCheckbox {
                label,
                checked: false,
            })
            .collect();
        let vocabulary_len = boxes.len();
        Self {
            boxes,
            vocabulary_len,
        }
    }

    #[must_use]
    pub fn boxes(&self) -> &[TagCheckbox] {
        &self.boxes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Flip one box. Returns the new state, or `false` for an out-of-range index.
    pub fn toggle(&mut self, index: usize) -> bool {
        self.boxes.get_mut(index).is_some_and(|checkbox| {
            checkbox.checked = !checkbox.checked;
            checkbox.checked
        })
    }

    /// Uncheck every box and drop boxes that are not part of the vocabulary.
    pub fn clear(&mut self) {
        self.boxes.truncate(self.vocabulary_len);
        for checkbox in &mut self.boxes {
            checkbox.checked = false;
        }
    }

    /// Check exactly the boxes named by `tags`.
    pub fn apply(&mut self, tags: &TagSet) {
        self.clear();
        for tag in tags.iter() {
            if let Some(checkbox) = self.boxes.iter_mut().find(|b| b.label == tag) {
                checkbox.checked = true;
            } else {
                self.boxes.push(TagCheckbox {
                    label: tag.to_string(),
                    checked: true,
                });
            }
        }
    }

    /// Restore checkbox state from the stored comma-joined string.
    pub fn apply_joined(&mut self, joined: &str) {
        self.apply(&TagSet::decode(joined));
    }

    #[must_use]
    pub fn selected(&self) -> TagSet {
        let mut tags = TagSet::new();
        for checkbox in self.boxes.iter().filter(|b| b.checked) {
            tags.insert(&checkbox.label);
        }
        tags
    }

    /// Comma-joined string of the checked boxes.
    #[must_use]
    pub fn encode_selected(&self) -> String {
        self.selected().encode()
    }
}
