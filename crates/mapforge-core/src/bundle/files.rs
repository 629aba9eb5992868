use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Compare two file names the way end users expect: ignoring case.
pub fn same_file_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-folded form of a file name, used as the lookup key.
pub fn fold_file_name(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

/// File-name keyed map with case-insensitive lookup.
///
/// Entries are keyed by the folded name. The name a file was inserted under
/// is kept beside its value and used when writing.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMap<V> {
    entries: BTreeMap<String, (String, V)>,
}

impl<V> Default for FileMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> FileMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored spelling of `name`, if present under any casing.
    pub fn find_key(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&fold_file_name(name))
            .map(|(stored, _)| stored.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold_file_name(name))
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(&fold_file_name(name)).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries
            .get_mut(&fold_file_name(name))
            .map(|(_, value)| value)
    }

    /// Insert `value`, replacing any entry whose name matches ignoring case.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        self.entries
            .insert(fold_file_name(&name), (name, value))
            .map(|(_, previous)| previous)
    }

    /// Insert `value` only if no entry matches `name` ignoring case.
    ///
    /// On a collision the map is left untouched and the stored spelling of
    /// the existing entry is returned with the rejected value.
    pub fn try_insert(&mut self, name: impl Into<String>, value: V) -> Result<(), (String, V)> {
        let name = name.into();
        match self.entries.entry(fold_file_name(&name)) {
            Entry::Occupied(existing) => Err((existing.get().0.clone(), value)),
            Entry::Vacant(slot) => {
                slot.insert((name, value));
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.entries
            .remove(&fold_file_name(name))
            .map(|(_, value)| value)
    }

    /// Remove and return the entry, keeping its stored spelling.
    pub fn remove_entry(&mut self, name: &str) -> Option<(String, V)> {
        self.entries.remove(&fold_file_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .values_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for FileMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
