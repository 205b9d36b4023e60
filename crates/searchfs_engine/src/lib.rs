/* 📖 # How is a logical path resolved?

A SearchPathRegistry holds mounted search paths, most recently mounted first. Lookups
(find, time, open) walk that order and stop at the first backend that has the file, so a
later mount overrides files of an earlier one. Pattern searches ask every backend in the same
order and merge their answers into one duplicate-free ResultSet.

DirectoryBackend is the search path implemented here; other kinds (pak, zip and wad archives)
implement the same SearchPath trait and can be mounted next to it.
*/

pub mod config;
pub mod directory;
pub mod flags;
pub mod registry;
mod registry_tests;
pub mod result_set;
pub mod search_path;

pub use config::{Config, MountConfig, load_config, parse_config};
pub use directory::{DirectoryBackend, normalize_base_path, pattern_directory};
pub use flags::SearchPathFlags;
pub use registry::{FoundFile, MountStatus, SearchPathRegistry};
pub use result_set::ResultSet;
pub use search_path::{SearchPath, SearchPathKind};
