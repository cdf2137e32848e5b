//! Insertion-ordered multi-valued key store and its tile expansion.
//!
//! The iteration order of an [`OrderedMultiMap`] is load-bearing: the
//! last declared key varies fastest when tiles are produced, the first
//! declared key slowest.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;
use std::ops::Index;
use std::sync::Arc;

/// Ordered mapping from key to an ordered list of candidate values.
///
/// Value lists are immutable and shared between clones, so cloning a
/// matrix for a child never lets one branch observe another's writes.
#[derive(Debug, Clone, Default)]
pub struct OrderedMultiMap {
    entries: IndexMap<String, Arc<[Value]>>,
}

impl OrderedMultiMap {
    /// An empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `values`, moving it to the most recent position.
    pub fn set(&mut self, key: impl Into<String>, values: impl Into<Arc<[Value]>>) {
        let key = key.into();
        self.entries.shift_remove(&key);
        self.entries.insert(key, values.into());
    }

    /// Candidate values of `key`.
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.entries.get(key).map(|values| &**values)
    }

    /// True when `key` has been declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys with their candidate values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), &**v))
    }

    /// Number of tiles the matrix expands to, `None` on overflow.
    pub fn tile_count(&self) -> Option<usize> {
        self.entries
            .values()
            .try_fold(1usize, |acc, values| acc.checked_mul(values.len()))
    }

    /// Fresh iterator over every combination of candidate values.
    pub fn tiles(&self) -> Tiles {
        Tiles::new(self)
    }
}

/// One concrete combination: every key bound to a single value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tile(IndexMap<String, Value>);

impl Tile {
    /// Value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Deserialize the value of `key` into `T`.
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Result<T, serde_yaml::Error> {
        match self.0.get(key) {
            Some(value) => serde_yaml::from_value(value.clone()),
            None => Err(serde::de::Error::custom(format!(
                "missing tile key '{}'",
                key
            ))),
        }
    }

    /// True when the tile binds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the tile binds nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in matrix order, slowest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Bound keys with their values, in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Index<&str> for Tile {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.0.get(key) {
            Some(value) => value,
            None => panic!("tile has no key '{}'", key),
        }
    }
}

impl<K: Into<String>> std::iter::FromIterator<(K, Value)> for Tile {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Tile(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Mixed-radix counter over a matrix.
///
/// Digit `i` counts through the values of the `i`-th declared key. The
/// last digit is the least significant; the first tile takes the first
/// value of every key and iteration ends when the first digit wraps.
#[derive(Debug, Clone)]
pub struct Tiles {
    keys: Vec<String>,
    columns: Vec<Arc<[Value]>>,
    digits: Vec<usize>,
    total: Option<usize>,
    emitted: usize,
    done: bool,
}

impl Tiles {
    fn new(map: &OrderedMultiMap) -> Self {
        let keys: Vec<String> = map.entries.keys().cloned().collect();
        let columns: Vec<Arc<[Value]>> = map.entries.values().cloned().collect();
        let done = columns.iter().any(|values| values.is_empty());
        Self {
            digits: vec![0; keys.len()],
            keys,
            columns,
            total: map.tile_count(),
            emitted: 0,
            done,
        }
    }

    fn advance(&mut self) {
        for i in (0..self.digits.len()).rev() {
            self.digits[i] += 1;
            if self.digits[i] < self.columns[i].len() {
                return;
            }
            self.digits[i] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.done {
            return None;
        }

        let tile = self
            .keys
            .iter()
            .zip(&self.columns)
            .zip(&self.digits)
            .map(|((key, values), &digit)| (key.clone(), values[digit].clone()))
            .collect();

        self.emitted += 1;
        self.advance();
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        match self.total {
            Some(total) => {
                let remaining = total - self.emitted;
                (remaining, Some(remaining))
            }
            None => (usize::MAX, None),
        }
    }
}
