//! Runtime configuration resolved from the environment. Nothing here is
//! mandatory: without overrides the favorites database and the log file live
//! in the platform data directory and the bundled catalog is used.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::{BaseDirs, ProjectDirs};

use crate::catalog::{Catalog, CatalogLoadError};

/// Overrides the directory holding the database and the log file.
pub const DATA_DIR_ENV: &str = "HYMNAL_DATA_DIR";
/// Points at a JSON catalog to use instead of the bundled one.
pub const CATALOG_ENV: &str = "HYMNAL_CATALOG";

/// Fallback folder beneath the home directory when no platform data
/// directory can be determined.
const FALLBACK_DIR_NAME: &str = ".hymnal";
/// SQLite file storing the favorites.
const DB_FILE_NAME: &str = "favorites.sqlite";
const LOG_FILE_NAME: &str = "hymnal.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::resolve(env::var_os(DATA_DIR_ENV), env::var_os(CATALOG_ENV))
    }

    /// Build a configuration from raw override values. Empty values count as
    /// unset.
    pub fn resolve(data_dir: Option<OsString>, catalog: Option<OsString>) -> Result<Self> {
        let data_dir = match data_dir.filter(|value| !value.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let catalog_path = catalog
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_dir,
            catalog_path,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("failed to create data directory {}", self.data_dir.display())
        })
    }

    /// Load the override catalog when one is configured, else the bundled one.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_file(path),
            None => Catalog::bundled(),
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    if let Some(dirs) = ProjectDirs::from("org", "hymnal", "hymnal") {
        return Ok(dirs.data_dir().to_path_buf());
    }
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(FALLBACK_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::resolve(
            Some(OsString::from("/tmp/hymnal-test")),
            Some(OsString::from("/tmp/songs.json")),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/hymnal-test"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/songs.json")));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/hymnal-test/favorites.sqlite")
        );
        assert_eq!(config.log_path(), PathBuf::from("/tmp/hymnal-test/hymnal.log"));
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let config = Config::resolve(Some(OsString::new()), Some(OsString::new()));
        if let Ok(config) = config {
            assert_ne!(config.data_dir, PathBuf::new());
            assert_eq!(config.catalog_path, None);
        }
    }

    #[test]
    fn test_catalog_override_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.json");
        fs::write(
            &path,
            r#"[{"song_number": 5, "title": "Only", "verses": ["1.Solo"]}]"#,
        )
        .unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            catalog_path: Some(path),
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_number(5).is_some());
    }

    #[test]
    fn test_ensure_dirs_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("a").join("b"),
            catalog_path: None,
        };
        config.ensure_dirs().unwrap();
        assert!(config.data_dir.is_dir());
        assert!(config.load_catalog().is_ok());
    }
}
