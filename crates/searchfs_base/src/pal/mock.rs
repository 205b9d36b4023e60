use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::SearchfsResult;
use crate::error::SearchfsError;

use super::listing::DirectoryListing;
use super::open_mode::OpenMode;
use super::traits::{FileHandle, Pal};

/* 📖 # Why does MockPal count listings and handles?

Every pattern search acquires a directory listing and must release it before returning,
whether or not anything matched. MockPal hands out listings with a release hook that
decrements a live counter, so a test can assert `live_listings() == 0` after any operation.
Open file handles are counted the same way.
*/

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

type FileMap = Arc<Mutex<BTreeMap<String, MockFile>>>;

/// In-memory PAL implementation for testing.
///
/// Paths are stored as given, with `\` normalized to `/`. Directories are implied by the
/// files beneath them and can also be added explicitly (for empty directories).
///
/// # Examples
///
/// ```
/// use searchfs_base::{MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file("/data/config.cfg", b"exec autoexec.cfg".to_vec());
/// assert!(mock.file_exists("/data/config.cfg", false));
/// assert_eq!(mock.list_directory("/data/", false).entries(), ["config.cfg"]);
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: FileMap,
    directories: Arc<Mutex<BTreeSet<String>>>,
    live_listings: Arc<AtomicUsize>,
    total_listings: Arc<AtomicUsize>,
    open_handles: Arc<AtomicUsize>,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            directories: Arc::new(Mutex::new(BTreeSet::new())),
            live_listings: Arc::new(AtomicUsize::new(0)),
            total_listings: Arc::new(AtomicUsize::new(0)),
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a file with a modification time of the Unix epoch.
    pub fn add_file(&self, path: &str, content: Vec<u8>) {
        self.add_file_with_time(path, content, SystemTime::UNIX_EPOCH);
    }

    /// Add a file with an explicit modification time.
    pub fn add_file_with_time(&self, path: &str, content: Vec<u8>, modified: SystemTime) {
        self.files
            .lock()
            .unwrap()
            .insert(normalize(path), MockFile { content, modified });
    }

    /// Add a (possibly empty) directory.
    pub fn add_directory(&self, path: &str) {
        self.directories.lock().unwrap().insert(normalize(path));
    }

    /// Contents of a stored file.
    pub fn file_content(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&normalize(path))
            .map(|file| file.content.clone())
    }

    /// Listings handed out and not yet dropped.
    pub fn live_listings(&self) -> usize {
        self.live_listings.load(Ordering::SeqCst)
    }

    /// Listings handed out since creation.
    pub fn total_listings(&self) -> usize {
        self.total_listings.load(Ordering::SeqCst)
    }

    /// File handles opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// All known paths: files, explicit directories and directories implied by files.
    fn known_paths(&self) -> BTreeSet<String> {
        let mut paths: BTreeSet<String> = self.directories.lock().unwrap().clone();
        for file in self.files.lock().unwrap().keys() {
            paths.insert(file.clone());
            let mut parent = file.as_str();
            while let Some(pos) = parent.rfind('/') {
                parent = &parent[..pos];
                if parent.is_empty() {
                    break;
                }
                paths.insert(parent.to_string());
            }
        }
        paths
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

/// `\` becomes `/`, trailing separators are dropped.
fn normalize(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    match replaced.trim_end_matches('/') {
        "" if replaced.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn not_found(path: &str) -> Box<SearchfsError> {
    Box::new(SearchfsError::file_error(
        path,
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path),
        ),
    ))
}

impl Pal for MockPal {
    fn file_exists(&self, path: &str, case_insensitive: bool) -> bool {
        let wanted = normalize(path);
        let files = self.files.lock().unwrap();
        if case_insensitive {
            files.keys().any(|p| p.eq_ignore_ascii_case(&wanted))
        } else {
            files.contains_key(&wanted)
        }
    }

    fn file_time(&self, path: &str) -> Option<SystemTime> {
        let files = self.files.lock().unwrap();
        files.get(&normalize(path)).map(|file| file.modified)
    }

    fn open_file(&self, path: &str, mode: OpenMode) -> SearchfsResult<Box<dyn FileHandle>> {
        let key = normalize(path);
        let existing = self.files.lock().unwrap().get(&key).cloned();
        let content = match (existing, mode.create) {
            (Some(_), _) if mode.truncate => Vec::new(),
            (Some(file), _) => file.content,
            (None, true) => Vec::new(),
            (None, false) => return Err(not_found(path)),
        };

        let mut cursor = Cursor::new(content);
        if mode.append {
            cursor
                .seek(SeekFrom::End(0))
                .map_err(|e| Box::new(SearchfsError::file_error(path, e)))?;
        }
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockFileHandle {
            key,
            files: Arc::clone(&self.files),
            cursor,
            mode,
            dirty: mode.create,
            open_handles: Arc::clone(&self.open_handles),
        }))
    }

    fn list_directory(&self, path: &str, case_insensitive: bool) -> DirectoryListing {
        let dir = normalize(path);
        let prefix = match dir.as_str() {
            "" => String::new(),
            "/" => "/".to_string(),
            _ => format!("{}/", dir),
        };

        let children: BTreeSet<String> = self
            .known_paths()
            .iter()
            .filter_map(|known| known.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter(|child| !child.is_empty())
            .map(str::to_string)
            .collect();

        self.live_listings.fetch_add(1, Ordering::SeqCst);
        self.total_listings.fetch_add(1, Ordering::SeqCst);
        let live = Arc::clone(&self.live_listings);
        DirectoryListing::new(children, case_insensitive).on_release(move || {
            live.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

/// File handle backed by an in-memory buffer; writes are stored back when dropped.
struct MockFileHandle {
    key: String,
    files: FileMap,
    cursor: Cursor<Vec<u8>>,
    mode: OpenMode,
    dirty: bool,
    open_handles: Arc<AtomicUsize>,
}

impl Read for MockFileHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.mode.read {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file not opened for reading",
            ));
        }
        self.cursor.read(buf)
    }
}

impl Write for MockFileHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.mode.write {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file not opened for writing",
            ));
        }
        if self.mode.append {
            self.cursor.seek(SeekFrom::End(0))?;
        }
        self.dirty = true;
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for MockFileHandle {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for MockFileHandle {
    fn drop(&mut self) {
        if self.dirty {
            self.files.lock().unwrap().insert(
                self.key.clone(),
                MockFile {
                    content: self.cursor.get_ref().clone(),
                    modified: SystemTime::now(),
                },
            );
        }
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
