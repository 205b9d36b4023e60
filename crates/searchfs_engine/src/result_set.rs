/* 📖 # Why a linear scan for de-duplication?

A ResultSet is built by one search call and usually holds a handful of names. A linear scan
keeps insertion order trivially and avoids a second copy of every string in a hash set.
*/

/// Ordered, duplicate-free list of relative paths produced by one search call.
///
/// Identity is exact, case-sensitive string equality. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless an identical entry is already present.
    ///
    /// Returns whether the path was added.
    pub fn insert(&mut self, path: &str) -> bool {
        if self.contains(path) {
            return false;
        }
        self.entries.push(path.to_string());
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Sort entries by byte order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
