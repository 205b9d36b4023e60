/* 📖 # Why have searchfs_base as a separate library?

searchfs_base holds everything the search-path engine treats as an external collaborator:
the platform abstraction layer (existence checks, modification times, opening files,
directory listings), the glob matcher, bounded string helpers, logging and the error type.
The engine only depends on these abstractions, which keeps it testable against MockPal.
*/

pub mod bounded;
pub mod error;
pub mod glob;
pub mod pal;
mod pal_tests;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, ResultExt, SearchfsError, SearchfsResult};
pub use glob::GlobMatcher;
pub use pal::{DirectoryListing, FileHandle, MockPal, OpenMode, Pal, PalHandle, RealPal};
