use crate::entities::Author;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use uuid::Uuid;

/// Anything that can live in an [`OrderedIdSet`], keyed by its identity.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Uuid {
    fn key(&self) -> Uuid {
        *self
    }
}

impl Keyed for Author {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Duplicate-free collection that iterates in insertion order.
///
/// Membership checks go through a hash index; the backing vector keeps the
/// order callers observe. Inserting an element whose key is already present
/// leaves the set untouched.
#[derive(Debug, Clone)]
pub struct OrderedIdSet<T> {
    items: Vec<T>,
    index: HashSet<Uuid>,
}

/// Authors attached to one book.
pub type AuthorSet = OrderedIdSet<Author>;

/// Book identifiers held by one reading list.
pub type BookIdSet = OrderedIdSet<Uuid>;

impl<T> Default for OrderedIdSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }
}

impl<T: Keyed> OrderedIdSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the element was not present before.
    pub fn insert(&mut self, item: T) -> bool {
        if !self.index.insert(item.key()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Inserts every element, skipping duplicates. Returns how many were new.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items
            .into_iter()
            .map(|item| self.insert(item))
            .filter(|inserted| *inserted)
            .count()
    }

    pub fn remove(&mut self, key: Uuid) -> Option<T> {
        if !self.index.remove(&key) {
            return None;
        }
        let position = self.items.iter().position(|item| item.key() == key)?;
        Some(self.items.remove(position))
    }

    pub fn contains(&self, key: Uuid) -> bool {
        self.index.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.items.iter().map(Keyed::key)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Keyed> FromIterator<T> for OrderedIdSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}

impl<T: Keyed> From<Vec<T>> for OrderedIdSet<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a OrderedIdSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Equality ignores the index, which is derived from `items`.
impl<T: PartialEq> PartialEq for OrderedIdSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Serialize> Serialize for OrderedIdSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Keyed + Deserialize<'de>> Deserialize<'de> for OrderedIdSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let id = Uuid::new_v4();
        let mut set = BookIdSet::new();

        assert!(set.insert(id));
        assert!(!set.insert(id));
        assert!(!set.insert(id));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn keeps_insertion_order() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let set: BookIdSet = ids.iter().rev().copied().collect();

        let expected: Vec<Uuid> = ids.into_iter().rev().collect();
        assert_eq!(set.as_slice(), expected.as_slice());
    }

    #[test]
    fn insert_all_counts_only_new_entries() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut set = BookIdSet::new();
        set.insert(a);

        assert_eq!(set.insert_all(vec![a, b, b]), 1);
        assert_eq!(set.as_slice(), &[a, b]);
    }

    #[test]
    fn remove_then_reinsert_moves_to_end() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut set: BookIdSet = vec![a, b].into();

        assert_eq!(set.remove(a), Some(a));
        assert_eq!(set.remove(a), None);
        assert!(set.insert(a));
        assert_eq!(set.as_slice(), &[b, a]);
    }

    #[test]
    fn authors_are_keyed_by_identity_not_name() {
        let herbert = Author::new("Frank Herbert").unwrap();
        let namesake = Author::new("Frank Herbert").unwrap();
        let mut set = AuthorSet::new();

        set.insert(herbert.clone());
        set.insert(herbert.clone());
        set.insert(namesake);

        assert_eq!(set.len(), 2);
        assert!(set.contains(herbert.id));
    }

    #[test]
    fn serializes_as_plain_array() {
        let id = Uuid::nil();
        let set: BookIdSet = vec![id, id].into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, format!("[\"{}\"]", id));

        let back: BookIdSet = serde_json::from_str(&format!("[\"{id}\",\"{id}\"]")).unwrap();
        assert_eq!(back.len(), 1);
    }
}
