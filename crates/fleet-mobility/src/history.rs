//! Bounded, oldest-first message history.

use std::collections::VecDeque;

/// Keeps at most `limit` entries; pushing past the limit drops the oldest.
#[derive(Clone, Debug, PartialEq)]
pub struct History<T> {
    items: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn new(limit: usize) -> Self {
        Self { items: VecDeque::with_capacity(limit.min(64)), limit: limit.max(1) }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.limit {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// The `n` most recent entries, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

// Serialized as a plain sequence; the limit is a runtime setting, not data.
#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for History<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for History<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items: Vec<T> = Vec::deserialize(deserializer)?;
        let mut history = History::new(items.len().max(Self::DEFAULT_LIMIT));
        for item in items {
            history.push(item);
        }
        Ok(history)
    }
}
