//! JSON-file persistence for the favorites id list.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::{debug, warn};

use crate::domain::ports::FavoritesStorePort;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "cathub";
const APP_NAME: &str = "cathub";
const FAVORITES_FILE_NAME: &str = "favorites.json";

/// Favorites store backed by a JSON array file.
///
/// Reads and writes are synchronous; every save replaces the whole file
/// atomically. Failures degrade to an empty list on read and a logged
/// warning on write, so a broken disk never takes the favorites feature
/// down with it.
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    /// Creates a store at the default platform data path.
    ///
    /// Falls back to a temp-dir location when no home directory exists.
    #[must_use]
    pub fn new() -> Self {
        let path = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || std::env::temp_dir().join(APP_NAME).join(FAVORITES_FILE_NAME),
            |dirs| dirs.data_dir().join(FAVORITES_FILE_NAME),
        );
        Self { path }
    }

    /// Creates a store at a specific file path (useful for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn write_atomically(&self, content: &str) -> std::io::Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| std::io::Error::other("favorites path has no parent"))?;
        fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Default for JsonFavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStorePort for JsonFavoritesStore {
    fn load_ids(&self) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Failed to read favorites");
                }
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed favorites file");
                Vec::new()
            }
        }
    }

    fn save_ids(&self, ids: &[String]) {
        let content = match serde_json::to_string(ids) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to serialize favorites");
                return;
            }
        };

        match self.write_atomically(&content) {
            Ok(()) => debug!(count = ids.len(), "Saved favorites"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to write favorites");
            }
        }
    }
}
