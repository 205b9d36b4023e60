use std::io::{Read, Seek, Write};
use std::sync::Arc;
use std::time::SystemTime;

use crate::SearchfsResult;

use super::listing::DirectoryListing;
use super::open_mode::OpenMode;

/// An open file: readable, writable and seekable, whatever the mode allowed.
///
/// Operations the mode does not permit fail with an I/O error from the underlying handle.
pub trait FileHandle: Read + Write + Seek + Send {}
impl<T: Read + Write + Seek + Send> FileHandle for T {}

/* 📖 # Why do the PAL methods take plain string paths?

Search paths store their base path as a string with a trailing separator and build
physical paths by direct concatenation (`base + relative`). Separators inside relative
paths may be `/`, `\` or `:`, so the PAL receives the concatenated string as-is rather than
a normalized path type.
*/

/// Platform Abstraction Layer (PAL) trait providing the filesystem primitives.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs` and `walkdir`
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check whether a regular file exists at `path`. Directories do not count.
    ///
    /// With `case_insensitive`, a path whose components only differ in ASCII case from an
    /// existing entry also counts as existing.
    fn file_exists(&self, path: &str, case_insensitive: bool) -> bool;

    /// Modification time of `path`, or `None` when it cannot be determined.
    fn file_time(&self, path: &str) -> Option<SystemTime>;

    /// Open `path` with the given mode.
    fn open_file(&self, path: &str, mode: OpenMode) -> SearchfsResult<Box<dyn FileHandle>>;

    /// List the entries directly inside the directory `path`.
    ///
    /// Entries are sorted and duplicate-free; with `case_insensitive`, names that only
    /// differ in ASCII case are collapsed to the first one. A missing or unreadable
    /// directory yields an empty listing.
    fn list_directory(&self, path: &str, case_insensitive: bool) -> DirectoryListing;

    /// Read an entire file as UTF-8.
    fn read_file_to_string(&self, path: &str) -> SearchfsResult<String> {
        let mut handle = self.open_file(path, OpenMode::read())?;
        let mut contents = String::new();
        handle.read_to_string(&mut contents).map_err(|e| {
            Box::new(crate::SearchfsError::file_error(path, e).context("reading file to string"))
        })?;
        Ok(contents)
    }
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use searchfs_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new());
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
