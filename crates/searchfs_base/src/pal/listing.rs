use std::fmt;

/// Entry names found directly inside one directory.
///
/// A listing is a scoped resource: whoever produced it may attach a release hook, which
/// runs exactly once when the listing is dropped.
pub struct DirectoryListing {
    entries: Vec<String>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl DirectoryListing {
    /// Build a listing from raw names in discovery order.
    ///
    /// Exact duplicates are always dropped. With `case_insensitive`, names equal ignoring
    /// ASCII case are collapsed to the first spelling seen.
    pub fn new(names: impl IntoIterator<Item = String>, case_insensitive: bool) -> Self {
        let mut entries: Vec<String> = Vec::new();
        for name in names {
            let duplicate = entries.iter().any(|existing| {
                if case_insensitive {
                    existing.eq_ignore_ascii_case(&name)
                } else {
                    *existing == name
                }
            });
            if !duplicate {
                entries.push(name);
            }
        }
        Self {
            entries,
            release: None,
        }
    }

    /// An empty listing (missing or unreadable directory).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            release: None,
        }
    }

    /// Attach a hook that runs when the listing is dropped.
    pub fn on_release(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DirectoryListing {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Drop for DirectoryListing {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryListing")
            .field("entries", &self.entries)
            .field("tracked", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_discovery_order() {
        let listing = DirectoryListing::new(names(&["b.wav", "a.wav", "c.wav"]), false);
        assert_eq!(listing.entries(), ["b.wav", "a.wav", "c.wav"]);
    }

    #[test]
    fn test_drops_exact_duplicates() {
        let listing = DirectoryListing::new(names(&["a.wav", "a.wav"]), false);
        assert_eq!(listing.len(), 1);
    }

    #[test]
    fn test_case_sensitive_keeps_case_variants() {
        let listing = DirectoryListing::new(names(&["BASE.WAD", "base.wad"]), false);
        assert_eq!(listing.entries(), ["BASE.WAD", "base.wad"]);
    }

    #[test]
    fn test_case_insensitive_collapses_to_first_spelling() {
        let listing = DirectoryListing::new(names(&["BASE.WAD", "base.wad", "Game.CFG"]), true);
        assert_eq!(listing.entries(), ["BASE.WAD", "Game.CFG"]);
    }

    #[test]
    fn test_release_hook_runs_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let listing = DirectoryListing::empty().on_release(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(listing.is_empty());
        assert_eq!(released.load(Ordering::SeqCst), 0);
        drop(listing);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
