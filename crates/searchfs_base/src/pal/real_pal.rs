use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::SearchfsResult;
use crate::error::SearchfsError;

use super::listing::DirectoryListing;
use super::open_mode::OpenMode;
use super::traits::{FileHandle, Pal};

/* 📖 # Why does RealPal emulate case-insensitive lookups?

Game data is frequently authored on case-insensitive filesystems, so a path such as
`maps/C1A0.bsp` may be requested while the file on disk is `maps/c1a0.bsp`. On
case-sensitive filesystems RealPal first tries the exact path, and only if that misses does
it resolve the path one component at a time, comparing names ignoring ASCII case.
*/

/// Concrete PAL implementation using the real filesystem via std::fs.
#[derive(Debug, Default)]
pub struct RealPal {}

impl RealPal {
    pub fn new() -> Self {
        Self {}
    }

    /// Resolve `path` component by component, ignoring ASCII case.
    fn resolve_ignoring_case(path: &Path) -> Option<PathBuf> {
        let mut resolved = PathBuf::new();
        for component in path.components() {
            let candidate = resolved.join(component);
            if candidate.exists() {
                resolved = candidate;
                continue;
            }
            let wanted = component.as_os_str().to_str()?;
            let parent = if resolved.as_os_str().is_empty() {
                Path::new(".")
            } else {
                resolved.as_path()
            };
            let found = fs::read_dir(parent).ok()?.find_map(|entry| {
                let entry = entry.ok()?;
                let name = entry.file_name();
                let name = name.to_str()?;
                name.eq_ignore_ascii_case(wanted).then(|| name.to_string())
            })?;
            resolved.push(found);
        }
        Some(resolved)
    }
}

impl Pal for RealPal {
    #[instrument(skip(self))]
    fn file_exists(&self, path: &str, case_insensitive: bool) -> bool {
        let exact = Path::new(path);
        let exists = exact.is_file()
            || (case_insensitive
                && Self::resolve_ignoring_case(exact).is_some_and(|resolved| resolved.is_file()));
        debug!(exists, "checked file existence");
        exists
    }

    #[instrument(skip(self))]
    fn file_time(&self, path: &str) -> Option<SystemTime> {
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(time) => Some(time),
            Err(e) => {
                debug!(error = %e, "modification time unavailable");
                None
            }
        }
    }

    #[instrument(skip(self))]
    fn open_file(&self, path: &str, mode: OpenMode) -> SearchfsResult<Box<dyn FileHandle>> {
        let file = mode.to_open_options().open(path).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(SearchfsError::file_error(path, e))
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self))]
    fn list_directory(&self, path: &str, case_insensitive: bool) -> DirectoryListing {
        let root = if path.is_empty() { "." } else { path };
        if !Path::new(root).is_dir() {
            debug!("directory not found");
            return DirectoryListing::empty();
        }

        let names = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => entry.file_name().to_str().map(str::to_string),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable directory entry");
                    None
                }
            });
        let listing = DirectoryListing::new(names, case_insensitive);
        debug!(entries = listing.len(), "listed directory");
        listing
    }
}
