//! Inverted-index abstracts.
//!
//! OpenAlex ships abstracts as a map from each word to the positions where it
//! occurs. [`AbstractIndex`] keeps the map in document order so that words
//! sharing a position are emitted in the order the API listed them.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::sources::SourceError;

/// Largest word position accepted when rebuilding an abstract
pub const MAX_POSITION: usize = 100_000;

/// Word to 0-based positions, in the order the words were encountered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractIndex {
    entries: Vec<(String, Vec<usize>)>,
}

impl AbstractIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word and its positions
    pub fn insert(&mut self, word: impl Into<String>, positions: Vec<usize>) {
        self.entries.push((word.into(), positions));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rebuild the abstract text.
    ///
    /// Words are placed in position order. Moving from position `p` to `q`
    /// inserts `q - p` spaces, so skipped positions survive as extra
    /// whitespace. A word repeating an already placed position is appended
    /// after a single space. The result is trimmed at both ends.
    ///
    /// Positions above [`MAX_POSITION`] are rejected with
    /// [`SourceError::Parse`].
    pub fn reconstruct(&self) -> Result<String, SourceError> {
        let mut postings: Vec<(usize, &str)> = self
            .entries
            .iter()
            .flat_map(|(word, positions)| positions.iter().map(move |&p| (p, word.as_str())))
            .collect();
        // sort_by_key is stable: ties keep encounter order
        postings.sort_by_key(|&(position, _)| position);

        if let Some(&(position, word)) = postings.last() {
            if position > MAX_POSITION {
                return Err(SourceError::Parse(format!(
                    "abstract position {} for {:?} exceeds {}",
                    position, word, MAX_POSITION
                )));
            }
        }

        let mut text = String::new();
        let mut previous: Option<usize> = None;
        for (position, word) in postings {
            let gap = match previous {
                Some(prev) if prev == position => 1,
                Some(prev) => position - prev,
                None => position + 1,
            };
            text.extend(std::iter::repeat(' ').take(gap));
            text.push_str(word);
            previous = Some(position);
        }

        Ok(text.trim().to_string())
    }
}

impl<W: Into<String>> FromIterator<(W, Vec<usize>)> for AbstractIndex {
    fn from_iter<I: IntoIterator<Item = (W, Vec<usize>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(w, p)| (w.into(), p)).collect(),
        }
    }
}

impl Serialize for AbstractIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, positions) in &self.entries {
            map.serialize_entry(word, positions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AbstractIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = AbstractIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from words to lists of positions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((word, positions)) = access.next_entry::<String, Vec<usize>>()? {
                    entries.push((word, positions));
                }
                Ok(AbstractIndex { entries })
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}
