use std::fmt;
use std::time::SystemTime;

use searchfs_base::{FileHandle, OpenMode, Pal, SearchfsResult};

use crate::flags::SearchPathFlags;
use crate::result_set::ResultSet;

/// Which kind of backend a search path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPathKind {
    /// A plain directory on the filesystem.
    Directory,
    /// A Quake-style `.pak` archive.
    Pak,
    /// A `.pk3`/`.zip` archive.
    Zip,
    /// A `.wad` texture archive.
    Wad,
}

impl fmt::Display for SearchPathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchPathKind::Directory => "directory",
            SearchPathKind::Pak => "pak",
            SearchPathKind::Zip => "zip",
            SearchPathKind::Wad => "wad",
        };
        f.write_str(name)
    }
}

/* 📖 # Why is the PAL passed into every call instead of stored in the backend?

A mounted search path owns nothing but its own description (base path and flags). The
registry owns the PAL handle and lends it to whichever backend it is consulting, so backends
stay plain data and the same backend can be exercised against MockPal or RealPal.
*/

/// The contract every mounted backend implements.
///
/// Relative paths are appended to the backend's base path as-is; they may use `/`, `\` or
/// `:` as separators.
pub trait SearchPath: fmt::Debug + Send + Sync {
    fn kind(&self) -> SearchPathKind;

    /// Root of the backend: a directory with trailing separator, or an archive file name.
    fn base_path(&self) -> &str;

    fn flags(&self) -> SearchPathFlags;

    /// Release resources held by the backend.
    fn close(&mut self);

    /// Human-readable identifier, truncated to at most `limit` bytes.
    fn describe(&self, limit: usize) -> String;

    /// Look up `relative_path`; `Some(pack_index)` when present.
    ///
    /// The pack index is backend-specific (an entry index inside an archive) and is handed
    /// back to [`SearchPath::open_file`].
    fn find_file(&self, pal: &dyn Pal, relative_path: &str) -> Option<usize>;

    /// Modification time of `relative_path`, if known.
    fn file_time(&self, pal: &dyn Pal, relative_path: &str) -> Option<SystemTime>;

    fn open_file(
        &self,
        pal: &dyn Pal,
        relative_path: &str,
        mode: OpenMode,
        pack_index: usize,
    ) -> SearchfsResult<Box<dyn FileHandle>>;

    /// Append every path matching `pattern` to `results`, relative to the base path.
    fn search(
        &self,
        pal: &dyn Pal,
        results: &mut ResultSet,
        pattern: &str,
        case_insensitive: bool,
    ) -> SearchfsResult<()>;
}
