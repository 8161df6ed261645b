use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::Level;

pub const CONTAINER_EXT: &str = "huf";
pub const RESTORED_EXT: &str = "out";
pub const TEMP_EXT: &str = "tmp"; // For atomic writes

/// Resolved settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: Level,
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            overwrite: false,
        }
    }
}

impl Settings {
    pub fn from_flags(verbose: u8, quiet: bool, force: bool) -> Self {
        let log_level = match (quiet, verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        };
        Self {
            log_level,
            overwrite: force,
        }
    }
}

/// `notes.txt` -> `notes.txt.huf`
pub fn compressed_path(input: &Path) -> PathBuf {
    append_ext(input, CONTAINER_EXT)
}

/// `notes.txt.huf` -> `notes.txt`; anything else gets `.out` appended.
pub fn restored_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == CONTAINER_EXT => input.with_extension(""),
        _ => append_ext(input, RESTORED_EXT),
    }
}

pub fn temp_path(dest: &Path) -> PathBuf {
    append_ext(dest, TEMP_EXT)
}

fn append_ext(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
