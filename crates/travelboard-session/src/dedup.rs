//! Accumulated search results, unique by photo id.

use std::collections::HashSet;

use travelboard_core::models::Photo;

/// How a fetched page is merged into the accumulated results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeMode {
    /// Discard everything accumulated so far.
    Replace,
    /// Keep what is accumulated and add unseen photos after it.
    Append,
}

impl MergeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

impl std::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered photo list plus the identity set of every admitted id.
///
/// No id appears twice in `items`, and photos keep the order in which their
/// id was first seen.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    items: Vec<Photo>,
    seen: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `incoming` according to `mode`. Returns how many photos were
    /// admitted.
    pub fn merge(&mut self, incoming: Vec<Photo>, mode: MergeMode) -> usize {
        if mode == MergeMode::Replace {
            self.clear();
        }
        let before = self.items.len();
        for photo in incoming {
            if self.seen.insert(photo.id.clone()) {
                self.items.push(photo);
            }
        }
        self.items.len() - before
    }

    /// Drop all photos and forget every id.
    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn items(&self) -> &[Photo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
