use crate::constants::{LIBRARY_DIR, LIBRARY_REF, SERVER_CONFIG_FILE, VARIABLES_FILE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level settings for a binding run.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinderyConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
}

/// Layout of the hosted server directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub dir: PathBuf,
    pub library_dir: String,
    pub library_ref: String,
    pub variables_file: String,
    pub config_file: String,
}

impl ServerConfig {
    /// Directory that holds installed client libraries.
    #[must_use]
    pub fn library_path(&self) -> PathBuf {
        self.dir.join(&self.library_dir)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(&self.config_file)
    }

    #[must_use]
    pub fn variables_path(&self) -> PathBuf {
        self.dir.join(&self.variables_file)
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = dir.as_ref().to_path_buf();
        self
    }
}

/// Service binding inputs.
///
/// `plugins` points at a descriptor file (any format the config loader reads),
/// `uris` is the catalog of download locations handlers consult.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub opt_out: Option<String>,
    pub plugins: Option<PathBuf>,
    pub uris: BTreeMap<String, String>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            library_dir: LIBRARY_DIR.to_owned(),
            library_ref: LIBRARY_REF.to_owned(),
            variables_file: VARIABLES_FILE.to_owned(),
            config_file: SERVER_CONFIG_FILE.to_owned(),
        }
    }
}
