use std::time::SystemTime;

use searchfs_base::bounded::eq_ignore_case;
use searchfs_base::{
    ErrorKind, FileHandle, OpenMode, PalHandle, ResultExt, SearchfsError, SearchfsResult, err,
};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::directory::{DirectoryBackend, normalize_base_path};
use crate::flags::SearchPathFlags;
use crate::result_set::ResultSet;
use crate::search_path::{SearchPath, SearchPathKind};

/// Upper bound for a rendered search-path description, in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Outcome of a mount request. Both variants are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    /// A new search path was inserted at the front.
    Added,
    /// A search path with the same base path was already mounted; nothing changed.
    AlreadyLoaded,
}

impl MountStatus {
    pub fn already_loaded(&self) -> bool {
        *self == MountStatus::AlreadyLoaded
    }
}

/// Where a logical path was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    /// Position of the search path in lookup order (0 is the most recently mounted).
    pub position: usize,
    /// Base path of that search path.
    pub base_path: String,
    /// Backend-specific index, handed back when opening.
    pub pack_index: usize,
}

/// Ordered collection of mounted search paths, most recently mounted first.
///
/// # Examples
///
/// ```
/// use searchfs_base::{MockPal, PalHandle};
/// use searchfs_engine::{MountStatus, SearchPathFlags, SearchPathRegistry};
///
/// let mock = MockPal::new();
/// mock.add_file("/data/config.cfg", b"".to_vec());
///
/// let mut registry = SearchPathRegistry::new(PalHandle::new(mock));
/// let status = registry.mount_directory("/data", SearchPathFlags::empty());
/// assert_eq!(status, MountStatus::Added);
/// assert!(registry.file_exists("config.cfg"));
/// ```
#[derive(Debug)]
pub struct SearchPathRegistry {
    pal: PalHandle,
    search_paths: Vec<Box<dyn SearchPath>>,
}

impl SearchPathRegistry {
    pub fn new(pal: PalHandle) -> Self {
        Self {
            pal,
            search_paths: Vec::new(),
        }
    }

    pub fn pal(&self) -> &PalHandle {
        &self.pal
    }

    /// Mount a directory in front of every existing search path.
    ///
    /// A directory whose base path equals an already mounted one, ignoring ASCII case,
    /// is not mounted twice.
    #[instrument(skip(self))]
    pub fn mount_directory(&mut self, path: &str, flags: SearchPathFlags) -> MountStatus {
        self.mount(Box::new(DirectoryBackend::new(path, flags)))
    }

    /// Mount any backend in front of every existing search path.
    ///
    /// Duplicate detection compares base paths of the same kind, ignoring ASCII case.
    pub fn mount(&mut self, search_path: Box<dyn SearchPath>) -> MountStatus {
        if self.is_mounted(search_path.kind(), search_path.base_path()) {
            debug!(base = %search_path.base_path(), "search path already loaded");
            return MountStatus::AlreadyLoaded;
        }
        match search_path.kind() {
            SearchPathKind::Directory => info!("Adding directory: {}", search_path.base_path()),
            kind => info!("Adding {}: {}", kind, search_path.base_path()),
        }
        self.search_paths.insert(0, search_path);
        MountStatus::Added
    }

    /// Whether a search path of `kind` with this base path is mounted.
    pub fn is_mounted(&self, kind: SearchPathKind, base_path: &str) -> bool {
        let wanted = match kind {
            SearchPathKind::Directory => normalize_base_path(base_path),
            _ => base_path.to_string(),
        };
        self.search_paths
            .iter()
            .any(|existing| existing.kind() == kind && eq_ignore_case(existing.base_path(), &wanted))
    }

    /// Mount every directory of `config` in file order, so the last entry ends up first.
    ///
    /// All flag names are validated before anything is mounted.
    #[instrument(skip(self, config), fields(mount_count = config.mount.len()))]
    pub fn mount_config(&mut self, config: &Config) -> SearchfsResult<Vec<MountStatus>> {
        let mounts = config.resolve_mounts()?;
        Ok(mounts
            .into_iter()
            .map(|(path, flags)| self.mount_directory(&path, flags))
            .collect())
    }

    /// First search path, in lookup order, that holds `name`.
    #[instrument(skip(self))]
    pub fn find_file(&self, name: &str) -> Option<FoundFile> {
        let found = self
            .search_paths
            .iter()
            .enumerate()
            .find_map(|(position, search_path)| {
                search_path
                    .find_file(&*self.pal, name)
                    .map(|pack_index| FoundFile {
                        position,
                        base_path: search_path.base_path().to_string(),
                        pack_index,
                    })
            });
        debug!(found = found.is_some(), "looked up file");
        found
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.find_file(name).is_some()
    }

    /// Modification time of `name` in the search path that would serve it.
    pub fn file_time(&self, name: &str) -> Option<SystemTime> {
        let found = self.find_file(name)?;
        self.search_paths[found.position].file_time(&*self.pal, name)
    }

    /// Open `name` with a C-style `mode` string.
    ///
    /// Reads are served by the first search path holding the file. Writes always go to the
    /// write directory: the first mounted directory not flagged `NOWRITE`.
    #[instrument(skip(self))]
    pub fn open_file(&self, name: &str, mode: &str) -> SearchfsResult<Box<dyn FileHandle>> {
        let open_mode = OpenMode::parse(mode)?;
        if open_mode.is_writable() {
            let write_dir = self
                .write_directory()
                .ok_or_else(|| err!("No writable directory mounted for {}", name))?;
            return write_dir
                .open_file(&*self.pal, name, open_mode, 0)
                .with_context(|| format!("Failed to open {} for writing", name));
        }

        let Some(found) = self.find_file(name) else {
            return Err(Box::new(SearchfsError::new(ErrorKind::FileError {
                path: name.into(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not found in any search path",
                ),
            })));
        };
        self.search_paths[found.position].open_file(&*self.pal, name, open_mode, found.pack_index)
    }

    /// The directory writes are redirected to.
    pub fn write_directory(&self) -> Option<&dyn SearchPath> {
        self.search_paths
            .iter()
            .find(|search_path| {
                search_path.kind() == SearchPathKind::Directory
                    && !search_path.flags().contains(SearchPathFlags::NOWRITE)
            })
            .map(|search_path| search_path.as_ref())
    }

    /// Every path matching `pattern` across all search paths, sorted and duplicate-free.
    ///
    /// With `gamedir_only`, only game directories (`gamedir`, `custom`, `rodir`) are asked.
    #[instrument(skip(self))]
    pub fn search(
        &self,
        pattern: &str,
        case_insensitive: bool,
        gamedir_only: bool,
    ) -> SearchfsResult<ResultSet> {
        let mut results = ResultSet::new();
        for search_path in &self.search_paths {
            if gamedir_only && !search_path.flags().intersects(SearchPathFlags::GAMEDIR_ONLY) {
                continue;
            }
            search_path
                .search(&*self.pal, &mut results, pattern, case_insensitive)
                .with_context(|| format!("Failed to search {}", search_path.base_path()))?;
        }
        results.sort();
        debug!(matches = results.len(), "search finished");
        Ok(results)
    }

    /// One line per search path in lookup order: description plus flag annotations.
    pub fn describe_search_paths(&self) -> Vec<String> {
        let lines: Vec<String> = self
            .search_paths
            .iter()
            .map(|search_path| {
                let mut line = search_path.describe(MAX_DESCRIPTION_LEN);
                for annotation in search_path.flags().annotations() {
                    line.push_str(" (");
                    line.push_str(annotation);
                    line.push(')');
                }
                line
            })
            .collect();
        for line in &lines {
            info!("{}", line);
        }
        lines
    }

    /// Close every search path and forget them all.
    #[instrument(skip(self), fields(count = self.search_paths.len()))]
    pub fn shutdown(&mut self) {
        for mut search_path in self.search_paths.drain(..) {
            search_path.close();
        }
    }

    pub fn len(&self) -> usize {
        self.search_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.search_paths.is_empty()
    }

    /// Search paths in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SearchPath> {
        self.search_paths.iter().map(|search_path| search_path.as_ref())
    }
}
