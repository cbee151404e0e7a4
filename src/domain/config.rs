use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

/// Configuration for a catalog directory.
///
/// Controls where records and the request log are stored, and where id
/// assignment starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File holding one record per line, relative to the catalog root.
    books_file: PathBuf,

    /// Append-only log of borrow requests, relative to the catalog root.
    log_file: PathBuf,

    /// The id counter starts here; the first record added to an empty
    /// catalog gets `id_seed + 1`.
    ///
    /// If loaded records carry a larger id, counting continues from the
    /// largest one instead.
    id_seed: RecordId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books_file: default_books_file(),
            log_file: default_log_file(),
            id_seed: default_id_seed(),
        }
    }
}

impl Config {
    /// The name of the configuration file inside a catalog root.
    pub const FILE_NAME: &'static str = "libris.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `libris.toml` from the catalog root, falling back to the
    /// defaults if it is missing or unreadable.
    ///
    /// A missing file is expected and logged at `debug`. A file that exists
    /// but cannot be loaded is logged at `warn`.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        if !path.exists() {
            tracing::debug!("No {}, using default config", Self::FILE_NAME);
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}, using default config: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Path of the records file, relative to the catalog root.
    #[must_use]
    pub fn books_file(&self) -> &Path {
        &self.books_file
    }

    /// Path of the request log, relative to the catalog root.
    #[must_use]
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Where id assignment starts for an empty catalog.
    #[must_use]
    pub const fn id_seed(&self) -> RecordId {
        self.id_seed
    }

    /// Sets the id seed.
    pub const fn set_id_seed(&mut self, seed: RecordId) {
        self.id_seed = seed;
    }
}

fn default_books_file() -> PathBuf {
    PathBuf::from("books.txt")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("users.txt")
}

const fn default_id_seed() -> RecordId {
    100
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_books_file")]
        books_file: PathBuf,

        #[serde(default = "default_log_file")]
        log_file: PathBuf,

        #[serde(default = "default_id_seed")]
        id_seed: RecordId,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                books_file,
                log_file,
                id_seed,
            } => Self {
                books_file,
                log_file,
                id_seed,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            books_file: config.books_file,
            log_file: config.log_file,
            id_seed: config.id_seed,
        }
    }
}
