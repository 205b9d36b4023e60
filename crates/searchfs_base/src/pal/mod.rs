/* 📖 # What is the Platform Abstraction Layer?

The PAL is the set of primitives the search-path engine consumes but does not implement:
existence checks, modification times, opening files and listing a directory.
- RealPal answers them from the real filesystem
- MockPal answers them from memory and counts live listings and open handles, so tests can
  prove that a search released everything it acquired

The engine depends on the Pal trait only.
*/

mod listing;
pub mod mock;
mod open_mode;
pub mod real_pal;
mod traits;

pub use listing::DirectoryListing;
pub use mock::MockPal;
pub use open_mode::OpenMode;
pub use real_pal::RealPal;
pub use traits::{FileHandle, Pal, PalHandle};
