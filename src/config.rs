//! Configuration loading and management
//!
//! Handles parsing of `.taskflow.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::view::SortMode;

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = ".taskflow.toml";

const MAX_LATENCY_MS: u64 = 60_000;
const MAX_TIMEOUT_MS: u64 = 600_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store behaviour
    #[serde(default)]
    pub store: StoreConfig,

    /// Board view defaults
    #[serde(default)]
    pub view: ViewConfig,
}

/// Store-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Reject tasks whose category names no existing category
    #[serde(default)]
    pub strict_categories: bool,

    /// Per-request timeout in milliseconds (0 disables it)
    #[serde(default)]
    pub request_timeout_ms: u64,

    /// Simulated round-trip latency
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Simulated latency per store operation, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_task_get_all_ms")]
    pub task_get_all_ms: u64,
    #[serde(default = "default_task_get_by_id_ms")]
    pub task_get_by_id_ms: u64,
    #[serde(default = "default_task_create_ms")]
    pub task_create_ms: u64,
    #[serde(default = "default_task_update_ms")]
    pub task_update_ms: u64,
    #[serde(default = "default_task_delete_ms")]
    pub task_delete_ms: u64,
    #[serde(default = "default_category_get_all_ms")]
    pub category_get_all_ms: u64,
    #[serde(default = "default_category_get_by_id_ms")]
    pub category_get_by_id_ms: u64,
    #[serde(default = "default_category_create_ms")]
    pub category_create_ms: u64,
    #[serde(default = "default_category_update_ms")]
    pub category_update_ms: u64,
    #[serde(default = "default_category_delete_ms")]
    pub category_delete_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_task_get_all_ms() -> u64 {
    300
}

fn default_task_get_by_id_ms() -> u64 {
    200
}

fn default_task_create_ms() -> u64 {
    400
}

fn default_task_update_ms() -> u64 {
    300
}

fn default_task_delete_ms() -> u64 {
    250
}

fn default_category_get_all_ms() -> u64 {
    200
}

fn default_category_get_by_id_ms() -> u64 {
    150
}

fn default_category_create_ms() -> u64 {
    300
}

fn default_category_update_ms() -> u64 {
    250
}

fn default_category_delete_ms() -> u64 {
    200
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            task_get_all_ms: default_task_get_all_ms(),
            task_get_by_id_ms: default_task_get_by_id_ms(),
            task_create_ms: default_task_create_ms(),
            task_update_ms: default_task_update_ms(),
            task_delete_ms: default_task_delete_ms(),
            category_get_all_ms: default_category_get_all_ms(),
            category_get_by_id_ms: default_category_get_by_id_ms(),
            category_create_ms: default_category_create_ms(),
            category_update_ms: default_category_update_ms(),
            category_delete_ms: default_category_delete_ms(),
        }
    }
}

impl LatencyConfig {
    fn entries(&self) -> [(&'static str, u64); 10] {
        [
            ("task_get_all_ms", self.task_get_all_ms),
            ("task_get_by_id_ms", self.task_get_by_id_ms),
            ("task_create_ms", self.task_create_ms),
            ("task_update_ms", self.task_update_ms),
            ("task_delete_ms", self.task_delete_ms),
            ("category_get_all_ms", self.category_get_all_ms),
            ("category_get_by_id_ms", self.category_get_by_id_ms),
            ("category_create_ms", self.category_create_ms),
            ("category_update_ms", self.category_update_ms),
            ("category_delete_ms", self.category_delete_ms),
        ]
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in self.entries() {
            if value > MAX_LATENCY_MS {
                return Err(Error::InvalidConfig(format!(
                    "store.latency.{field} must be <= {MAX_LATENCY_MS}"
                )));
            }
        }
        Ok(())
    }
}

/// Board view defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Sort mode a fresh board starts with
    #[serde(default = "default_sort")]
    pub default_sort: SortMode,

    /// Width of the due-soon window in days
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
}

fn default_sort() -> SortMode {
    SortMode::Date
}

fn default_due_soon_days() -> u32 {
    3
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            due_soon_days: default_due_soon_days(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskflow.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults when the file is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    ///
    /// Writes through a temp file in the target directory and renames it in place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(path).map_err(|err| Error::Io(err.error))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.store.latency.validate()?;
        if self.store.request_timeout_ms > MAX_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "store.request_timeout_ms must be <= {MAX_TIMEOUT_MS}"
            )));
        }
        if self.view.due_soon_days == 0 {
            return Err(Error::InvalidConfig(
                "view.due_soon_days must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
