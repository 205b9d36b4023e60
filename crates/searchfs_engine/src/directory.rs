use std::time::SystemTime;

use searchfs_base::bounded::{PATH_SEPARATORS, ends_with_separator, truncate_to};
use searchfs_base::{FileHandle, GlobMatcher, OpenMode, Pal, SearchfsResult};
use tracing::{debug, instrument};

use crate::flags::SearchPathFlags;
use crate::result_set::ResultSet;
use crate::search_path::{SearchPath, SearchPathKind};

/// Append a trailing `/` unless the path already ends in a separator.
///
/// An empty path means the current directory and becomes `./`.
pub fn normalize_base_path(path: &str) -> String {
    if path.is_empty() {
        "./".to_string()
    } else if ends_with_separator(path) {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Directory part of a pattern: everything up to and including the last `/`, `\` or `:`.
///
/// Empty when the pattern has no separator.
pub fn pattern_directory(pattern: &str) -> &str {
    match pattern.rfind(PATH_SEPARATORS) {
        Some(pos) => &pattern[..=pos],
        None => "",
    }
}

/// A search path rooted at one directory on the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryBackend {
    base_path: String,
    flags: SearchPathFlags,
}

impl DirectoryBackend {
    /// Bind a backend to `path`, which is normalized to end in a separator.
    pub fn new(path: &str, flags: SearchPathFlags) -> Self {
        Self {
            base_path: normalize_base_path(path),
            flags,
        }
    }

    /// Physical path of `relative_path` inside this directory.
    fn physical_path(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_path, relative_path)
    }
}

impl SearchPath for DirectoryBackend {
    fn kind(&self) -> SearchPathKind {
        SearchPathKind::Directory
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn flags(&self) -> SearchPathFlags {
        self.flags
    }

    fn close(&mut self) {}

    fn describe(&self, limit: usize) -> String {
        truncate_to(&self.base_path, limit).to_string()
    }

    fn find_file(&self, pal: &dyn Pal, relative_path: &str) -> Option<usize> {
        // custom paths hold mod data and are matched exactly
        let case_insensitive = !self.flags.contains(SearchPathFlags::CUSTOM);
        pal.file_exists(&self.physical_path(relative_path), case_insensitive)
            .then_some(0)
    }

    fn file_time(&self, pal: &dyn Pal, relative_path: &str) -> Option<SystemTime> {
        pal.file_time(&self.physical_path(relative_path))
    }

    fn open_file(
        &self,
        pal: &dyn Pal,
        relative_path: &str,
        mode: OpenMode,
        _pack_index: usize,
    ) -> SearchfsResult<Box<dyn FileHandle>> {
        pal.open_file(&self.physical_path(relative_path), mode)
    }

    #[instrument(skip(self, pal, results), fields(base = %self.base_path))]
    fn search(
        &self,
        pal: &dyn Pal,
        results: &mut ResultSet,
        pattern: &str,
        case_insensitive: bool,
    ) -> SearchfsResult<()> {
        let matcher = GlobMatcher::new(pattern, case_insensitive)?;
        let prefix = pattern_directory(pattern);

        let listing = pal.list_directory(&self.physical_path(prefix), case_insensitive);
        let mut candidate = String::with_capacity(prefix.len() + 64);
        let mut added = 0;
        for entry in &listing {
            candidate.clear();
            candidate.push_str(prefix);
            candidate.push_str(entry);
            if matcher.is_match(&candidate) && results.insert(&candidate) {
                added += 1;
            }
        }
        debug!(listed = listing.len(), added, "searched directory");
        Ok(())
    }
}
