use searchfs_base::{ErrorKind, Pal, ResultExt, SearchfsError, SearchfsResult};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::flags::SearchPathFlags;

/// Search paths to mount at startup, read from `searchfs.toml`.
///
/// ```toml
/// [[mount]]
/// path = "/games/half-life/valve"
/// flags = ["gamerodir", "nowrite"]
///
/// [[mount]]
/// path = "/home/player/.xash/valve"
/// flags = ["gamedir"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Directories in mount order; the last one gets the highest priority.
    #[serde(default)]
    pub mount: Vec<MountConfig>,
}

/// One directory to mount.
#[derive(Debug, Deserialize)]
pub struct MountConfig {
    pub path: String,
    /// Flag names, matched case-insensitively: `static`, `nowrite`, `gamedir`, `custom`, `gamerodir`.
    #[serde(default)]
    pub flags: Vec<String>,
}

impl MountConfig {
    pub fn parse_flags(&self) -> SearchfsResult<SearchPathFlags> {
        self.flags
            .iter()
            .try_fold(SearchPathFlags::empty(), |flags, name| {
                match SearchPathFlags::parse_name(name) {
                    Some(flag) => Ok(flags | flag),
                    None => Err(Box::new(SearchfsError::new(ErrorKind::Config {
                        message: format!("unknown flag '{}' for mount {}", name, self.path),
                    }))),
                }
            })
    }
}

impl Config {
    /// Every mount with its parsed flags, or all flag errors at once.
    pub fn resolve_mounts(&self) -> SearchfsResult<Vec<(String, SearchPathFlags)>> {
        let mut mounts = Vec::with_capacity(self.mount.len());
        let mut errors = Vec::new();
        for mount in &self.mount {
            match mount.parse_flags() {
                Ok(flags) => mounts.push((mount.path.clone(), flags)),
                Err(e) => errors.push(*e),
            }
        }
        match errors.len() {
            0 => Ok(mounts),
            1 => Err(Box::new(errors.remove(0))),
            count => Err(Box::new(SearchfsError::new(ErrorKind::Multiple { errors, count }))),
        }
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(text: &str) -> SearchfsResult<Config> {
    toml::from_str(text).map_err(|e| {
        Box::new(SearchfsError::new(ErrorKind::Config {
            message: e.message().to_string(),
        }))
    })
}

/// Read and parse a configuration file through the PAL.
#[instrument(skip(pal))]
pub fn load_config(pal: &dyn Pal, path: &str) -> SearchfsResult<Config> {
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path))?;
    let config = parse_config(&text).with_context(|| format!("Failed to parse {}", path))?;
    debug!(mounts = config.mount.len(), "configuration loaded");
    Ok(config)
}
