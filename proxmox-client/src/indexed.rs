//! Numbered parameter families such as `net0`, `net1`, `ide2`.

use std::collections::btree_map::{self, BTreeMap};

use serde_json::{Map, Value};

/// A sparse set of numbered configuration slots sharing one prefix (network devices, disks,
/// NUMA nodes, ...).
///
/// The prefix is only attached when the family is flattened into a
/// [`ParameterSet`](crate::ParameterSet) via
/// [`indexed_args`](crate::ParameterSet::indexed_args). No upper bound is enforced here, the
/// remote schema decides which indices are valid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexedFamily<T = String> {
    inner: BTreeMap<usize, T>,
}

impl<T> Default for IndexedFamily<T> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<T> IndexedFamily<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.inner.get_mut(&index)
    }

    /// Put an element into a specific slot, returning the previous occupant.
    pub fn insert(&mut self, index: usize, item: T) -> Option<T> {
        self.inner.insert(index, item)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.inner.remove(&index)
    }

    pub fn values(&self) -> btree_map::Values<'_, usize, T> {
        self.inner.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, T> {
        self.inner.iter()
    }

    fn lowest_unused_index(&self) -> usize {
        let mut next = 0;
        for key in self.inner.keys().copied() {
            if key != next {
                break;
            }
            next += 1;
        }
        next
    }

    /// Put an element into the lowest free slot and return its index.
    pub fn add(&mut self, item: T) -> usize {
        let index = self.lowest_unused_index();
        self.inner.insert(index, item);
        index
    }
}

impl IndexedFamily<String> {
    /// Collect the `{prefix}{index}` members of a configuration object as returned by the API.
    ///
    /// Keys which merely share the prefix (`scsihw` for `scsi`) are ignored, as is anything that
    /// is not an object. Non-string values are kept in their JSON text form.
    pub fn from_config(config: &Value, prefix: &str) -> Self {
        match config.as_object() {
            Some(object) => Self::from_object(object, prefix),
            None => Self::new(),
        }
    }

    /// Like [`from_config`](Self::from_config) for an already destructured object.
    pub fn from_object(object: &Map<String, Value>, prefix: &str) -> Self {
        let mut this = Self::new();

        for (key, value) in object {
            let Some(index) = key.strip_prefix(prefix) else {
                continue;
            };
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let Ok(index) = index.parse::<usize>() else {
                continue;
            };
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            this.inner.insert(index, value);
        }

        this
    }
}

impl<T> FromIterator<(usize, T)> for IndexedFamily<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<(usize, T)> for IndexedFamily<T> {
    fn extend<I: IntoIterator<Item = (usize, T)>>(&mut self, iter: I) {
        self.inner.extend(iter)
    }
}

impl<T> IntoIterator for IndexedFamily<T> {
    type Item = (usize, T);
    type IntoIter = btree_map::IntoIter<usize, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a IndexedFamily<T> {
    type Item = (&'a usize, &'a T);
    type IntoIter = btree_map::Iter<'a, usize, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
