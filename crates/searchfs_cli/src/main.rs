/* 📖 # What does the searchfs CLI do?

It builds a search-path registry the way an engine would at startup and answers one query
against it. Directories come from a configuration file (`searchfs.toml` in the current
directory unless `--config` names another one) followed by any `--mount` arguments, so a
`--mount` directory takes priority over everything in the configuration.

Commands:
- `path`: list the mounted search paths in lookup order
- `find <name>`: print the search path that serves a logical file
- `time <name>`: print its modification time (seconds since the Unix epoch)
- `search <pattern>`: list every logical path matching a glob pattern

Exit codes:
- 0: Success
- 1: Configuration error, invalid pattern, or the file was not found
*/

use std::process;
use std::time::UNIX_EPOCH;

use clap::{Parser, Subcommand};
use searchfs_base::tracing::init_tracing;
use searchfs_base::{Pal, PalHandle, RealPal, SearchfsResult};
use searchfs_engine::{SearchPathFlags, SearchPathRegistry, load_config};
use tracing::debug;

const DEFAULT_CONFIG: &str = "searchfs.toml";

#[derive(Parser, Debug)]
#[command(
    name = "searchfs",
    about = "Resolve and search logical paths across mounted game directories",
    version
)]
struct Cli {
    /// Configuration file listing the directories to mount.
    #[arg(long)]
    config: Option<String>,

    /// Extra directory to mount after the configuration (may be repeated).
    #[arg(long = "mount", value_name = "DIR")]
    mounts: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List mounted search paths, highest priority first.
    Path,
    /// Show which search path serves a file.
    Find { name: String },
    /// Show the modification time of a file.
    Time { name: String },
    /// List logical paths matching a glob pattern.
    Search {
        pattern: String,
        /// Match names ignoring ASCII case.
        #[arg(long)]
        ignore_case: bool,
        /// Only search game directories.
        #[arg(long)]
        gamedir_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Warning: {}", e);
    }

    let pal = PalHandle::new(RealPal::new());
    let mut registry = SearchPathRegistry::new(pal.clone());

    if let Err(e) = mount_all(&pal, &mut registry, &cli) {
        eprintln!("Error: {}", e);
        debug!("{:?}", e);
        process::exit(1);
    }

    let code = match run(&registry, &cli.command) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {}", e);
            debug!("{:?}", e);
            1
        }
    };
    registry.shutdown();
    process::exit(code);
}

fn mount_all(pal: &PalHandle, registry: &mut SearchPathRegistry, cli: &Cli) -> SearchfsResult<()> {
    let config_path = match &cli.config {
        Some(path) => Some(path.as_str()),
        // the default file is optional when directories are given on the command line
        None if !cli.mounts.is_empty() && !pal.file_exists(DEFAULT_CONFIG, false) => None,
        None => Some(DEFAULT_CONFIG),
    };
    if let Some(config_path) = config_path {
        let config = load_config(&**pal, config_path)?;
        registry.mount_config(&config)?;
    }
    for dir in &cli.mounts {
        registry.mount_directory(dir, SearchPathFlags::empty());
    }
    Ok(())
}

/// Runs one command; `Ok(false)` means the file was not found.
fn run(registry: &SearchPathRegistry, command: &Command) -> SearchfsResult<bool> {
    match command {
        Command::Path => {
            for line in registry.describe_search_paths() {
                println!("{}", line);
            }
            Ok(true)
        }
        Command::Find { name } => match registry.find_file(name) {
            Some(found) => {
                println!("{}{}", found.base_path, name);
                Ok(true)
            }
            None => {
                eprintln!("{}: not found", name);
                Ok(false)
            }
        },
        Command::Time { name } => match registry.file_time(name) {
            Some(time) => {
                let seconds = time
                    .duration_since(UNIX_EPOCH)
                    .map(|duration| duration.as_secs())
                    .unwrap_or(0);
                println!("{}", seconds);
                Ok(true)
            }
            None => {
                eprintln!("{}: not found", name);
                Ok(false)
            }
        },
        Command::Search {
            pattern,
            ignore_case,
            gamedir_only,
        } => {
            let results = registry.search(pattern, *ignore_case, *gamedir_only)?;
            for path in &results {
                println!("{}", path);
            }
            Ok(true)
        }
    }
}
