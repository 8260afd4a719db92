//! Memory-efficient index entry: a single id, or a small set of ids.
//!
//! The vast majority of index keys in a word-based bibliographic index point
//! to exactly one publication; storing those as a bare `u32` instead of a
//! heap-allocated set is the dominant memory saving in the whole indexer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A compact container for the set of publication ids that map to one index
/// key. Stays inline (no heap allocation) for the single-id case and the
/// first few multi-id collisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum IndexEntry {
    /// No ids yet.
    #[default]
    Empty,
    /// Exactly one id maps to this key.
    Single(u32),
    /// More than one id maps to this key.
    Many(SmallVec<[u32; 4]>),
}

impl IndexEntry {
    /// Add `id` to this entry, promoting `Empty` -> `Single` -> `Many` as
    /// needed. Duplicate ids are not added twice.
    pub fn insert(&mut self, id: u32) {
        match self {
            IndexEntry::Empty => *self = IndexEntry::Single(id),
            IndexEntry::Single(existing) => {
                if *existing != id {
                    let mut many = SmallVec::new();
                    many.push(*existing);
                    many.push(id);
                    *self = IndexEntry::Many(many);
                }
            }
            IndexEntry::Many(ids) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }

    /// Whether this entry holds no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, IndexEntry::Empty)
    }

    /// Iterate over the ids held by this entry.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        match self {
            IndexEntry::Empty => EntryIter::Empty,
            IndexEntry::Single(id) => EntryIter::Single(*id),
            IndexEntry::Many(ids) => EntryIter::Many(ids.iter()),
        }
    }
}

enum EntryIter<'a> {
    Empty,
    Single(u32),
    Many(std::slice::Iter<'a, u32>),
}

impl Iterator for EntryIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            EntryIter::Empty => None,
            EntryIter::Single(id) => {
                let id = *id;
                *self = EntryIter::Empty;
                Some(id)
            }
            EntryIter::Many(iter) => iter.next().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_insert_stays_inline() {
        let mut entry = IndexEntry::default();
        entry.insert(7);
        assert!(matches!(entry, IndexEntry::Single(7)));
        assert_eq!(entry.iter().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn second_distinct_id_promotes_to_many() {
        let mut entry = IndexEntry::default();
        entry.insert(1);
        entry.insert(2);
        assert!(matches!(entry, IndexEntry::Many(_)));
        let mut ids: Vec<u32> = entry.iter().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn duplicate_insert_does_not_grow() {
        let mut entry = IndexEntry::default();
        entry.insert(3);
        entry.insert(3);
        assert!(matches!(entry, IndexEntry::Single(3)));
    }

    #[test]
    fn empty_entry_iterates_nothing() {
        let entry = IndexEntry::default();
        assert!(entry.is_empty());
        assert_eq!(entry.iter().count(), 0);
    }
}
