use std::path::PathBuf;

pub const DEFAULT_TRACKED_FILE: &str = "time.lisp";

/// Where the global scope looks for history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Working directory of the repository, not its `.git`.
    pub repo_path: PathBuf,
    /// Path of the tracked source file, relative to `repo_path`.
    pub tracked_file: PathBuf,
}

impl Config {
    pub fn new(repo_path: impl Into<PathBuf>, tracked_file: impl Into<PathBuf>) -> Self {
        Config {
            repo_path: repo_path.into(),
            tracked_file: tracked_file.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(".", DEFAULT_TRACKED_FILE)
    }
}
