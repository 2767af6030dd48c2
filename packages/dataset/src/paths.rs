//! Canonical file paths for the dashboard's data and configuration.
//!
//! All defaults are relative to the project root; environment variables
//! override them.

use std::path::{Path, PathBuf};

/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "SENTIMENT_MAP_DATA";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "SENTIMENT_MAP_CONFIG";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`, falling back to the
/// current directory when the crate is built outside the workspace layout.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default dataset path, `data/api_1_analysis.json`.
#[must_use]
pub fn default_dataset_path() -> PathBuf {
    data_dir().join("api_1_analysis.json")
}

/// Returns the default configuration path, `sentiment_map.toml` in the
/// project root.
#[must_use]
pub fn default_config_path() -> PathBuf {
    project_root().join("sentiment_map.toml")
}

/// Returns the configuration path from [`CONFIG_PATH_ENV`], or the default.
#[must_use]
pub fn config_path_from_env() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV).map_or_else(default_config_path, PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_live_under_the_project_root() {
        let root = project_root();
        assert!(default_dataset_path().starts_with(&root));
        assert!(default_dataset_path().ends_with("data/api_1_analysis.json"));
        assert_eq!(default_config_path().parent(), Some(root.as_path()));
    }
}
