//! JSON configuration file under the user's config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use printer_core::{ConfigError, ConfigStore};
use printer_logging::{printer_info, printer_warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::persist::AtomicFileWriter;

const APP_DIR: &str = "inventoryt-printer";
const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TEST_ENDPOINT: &str = "https://inventory.sensefinity.com/apptest";
const DEFAULT_PRINTER_SHARE: &str = "ZD420";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub test_endpoint: String,
    pub enable_file_logging: bool,
    pub log_file_path: PathBuf,
    /// Windows share name of the label printer.
    pub printer_share: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            test_endpoint: DEFAULT_TEST_ENDPOINT.to_string(),
            enable_file_logging: true,
            log_file_path: std::env::temp_dir().join("inventoryt-printer.log"),
            printer_share: DEFAULT_PRINTER_SHARE.to_string(),
        }
    }
}

pub struct JsonConfigStore {
    path: PathBuf,
    config: AppConfig,
}

impl JsonConfigStore {
    /// `<config dir>/inventoryt-printer/config.json`, or relative to the
    /// working directory when the platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILENAME)
    }

    /// Loads `path`, writing the defaults there first if it does not exist.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    config: AppConfig::default(),
                };
                store.save()?;
                printer_info!("Wrote default configuration to {:?}", store.path);
                return Ok(store);
            }
            Err(err) => {
                return Err(ConfigError::Load(format!("{}: {}", path.display(), err)));
            }
        };

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|err| ConfigError::Load(format!("{}: {}", path.display(), err)))?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn save(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|err| ConfigError::Serialize(err.to_string()))?;
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(CONFIG_FILENAME);
        AtomicFileWriter::new(dir)
            .write(filename, &content)
            .map_err(|err| ConfigError::Persist(err.to_string()))?;
        Ok(())
    }
}

impl ConfigStore for JsonConfigStore {
    fn test_endpoint(&self) -> String {
        self.config.test_endpoint.clone()
    }

    fn set_test_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError> {
        validate_endpoint(endpoint)?;
        let previous = std::mem::replace(&mut self.config.test_endpoint, endpoint.to_string());
        if let Err(err) = self.save() {
            printer_warn!("Keeping previous test endpoint {}", previous);
            self.config.test_endpoint = previous;
            return Err(err);
        }
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(endpoint).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(())
}
