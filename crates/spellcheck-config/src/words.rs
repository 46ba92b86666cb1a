//! Word collections and the cascade merge rule applied to them.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// How entries of a collection are compared.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaseMode {
    /// Comparison ignoring case (words, folders). Keys are folded with
    /// [`str::to_lowercase`], the locale-independent Unicode lowercase
    /// mapping, so e.g. `İ` and `I` fold to different keys.
    Insensitive,
    /// Ordinal comparison (classification, element and attribute names).
    Sensitive,
}

impl CaseMode {
    fn key<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            CaseMode::Insensitive => Cow::Owned(value.to_lowercase()),
            CaseMode::Sensitive => Cow::Borrowed(value),
        }
    }
}

/// Insertion-ordered set of strings with a fixed comparison mode.
#[derive(Clone, Debug)]
pub struct WordSet {
    mode: CaseMode,
    words: Vec<String>,
    index: HashSet<String>,
}

impl WordSet {
    pub fn new(mode: CaseMode) -> Self {
        WordSet {
            mode,
            words: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub fn case_insensitive() -> Self {
        WordSet::new(CaseMode::Insensitive)
    }

    pub fn case_sensitive() -> Self {
        WordSet::new(CaseMode::Sensitive)
    }

    pub fn from_words<I, S>(mode: CaseMode, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = WordSet::new(mode);
        for word in words {
            set.insert(word);
        }
        set
    }

    pub fn mode(&self) -> CaseMode {
        self.mode
    }

    /// Adds `word`; the first spelling seen is the one kept.
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        let word = word.into();
        let key = self.mode.key(&word).into_owned();
        if !self.index.insert(key) {
            return false;
        }
        self.words.push(word);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(self.mode.key(word).as_ref())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// New set holding the entries of `self` followed by the new entries of `other`.
    pub fn union(&self, other: &WordSet) -> WordSet {
        let mut result = self.clone();
        for word in other.iter() {
            result.insert(word);
        }
        result
    }
}

impl PartialEq for WordSet {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.index == other.index
    }
}

impl Eq for WordSet {}

impl Extend<String> for WordSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for word in iter {
            self.insert(word);
        }
    }
}

impl Serialize for WordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.words)
    }
}

/// Merges the collection contributed by one source into the running one.
///
/// Returns `incoming` unchanged when the group does not inherit or the source
/// is the outermost scope, otherwise `existing ∪ incoming`. An empty
/// `incoming` therefore clears the collection when replacing.
pub fn merge_words(
    existing: &WordSet,
    incoming: WordSet,
    inherit: bool,
    is_outermost: bool,
) -> WordSet {
    if !inherit || is_outermost {
        return incoming;
    }
    existing.union(&incoming)
}

/// Insertion-ordered map keyed by word, compared ignoring case. Inserting an
/// existing key replaces both the stored spelling and the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for WordMap<V> {
    fn default() -> Self {
        WordMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> WordMap<V> {
    pub fn new() -> Self {
        WordMap::default()
    }

    pub fn insert(&mut self, word: impl Into<String>, value: V) {
        let word = word.into();
        let key = word.to_lowercase();
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot] = (word, value),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((word, value));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&V> {
        self.index
            .get(&word.to_lowercase())
            .map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, word: &str) -> bool {
        self.index.contains_key(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(word, value)| (word.as_str(), value))
    }
}

impl<V: Serialize> Serialize for WordMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, value) in &self.entries {
            map.serialize_entry(word, value)?;
        }
        map.end()
    }
}
