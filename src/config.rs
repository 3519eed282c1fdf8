//! Store configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the storage root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Root directory of the storage tree.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Read configuration from the environment, falling back to `./data`.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        Self { data_dir }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_data() {
        assert_eq!(StoreConfig::default().data_dir, PathBuf::from("data"));
    }
}
