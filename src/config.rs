use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::indexing::scheduler::FIXED_CHUNK_SIZE;

const CONFIG_DIR: &str = ".symdex";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Glob of files to scan, relative to the project root
    #[serde(default = "default_files_to_scan")]
    pub files_to_scan: String,

    /// Glob excluded from full-scan enumeration
    #[serde(default = "default_exclude")]
    pub exclude: String,

    /// Upper bound on files returned by enumeration
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Files processed between two cooperative yields
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Paths containing any of these are never indexed
    #[serde(default = "default_ignored_segments")]
    pub ignored_segments: Vec<String>,

    /// Project manifest holding `compilerOptions.paths`
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            files_to_scan: default_files_to_scan(),
            exclude: default_exclude(),
            max_files: default_max_files(),
            chunk_size: default_chunk_size(),
            ignored_segments: default_ignored_segments(),
            manifest: default_manifest(),
        }
    }
}

fn default_files_to_scan() -> String {
    "**/*.ts".to_string()
}

fn default_exclude() -> String {
    "**/node_modules/**".to_string()
}

fn default_max_files() -> usize {
    99999
}

fn default_chunk_size() -> usize {
    FIXED_CHUNK_SIZE
}

fn default_ignored_segments() -> Vec<String> {
    vec![
        "typings".to_string(),
        "node_modules".to_string(),
        "jspm_packages".to_string(),
    ]
}

fn default_manifest() -> String {
    "tsconfig.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Quiet period before a batch of changes is re-indexed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Level for the file log: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the project root unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_file_prefix() -> String {
    "symdex.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .symdex directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .symdex directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .symdex directory
    pub fn symdex_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    pub fn is_initialized(root: &Path) -> bool {
        Self::symdex_dir(root).join(CONFIG_FILE).exists()
    }
}
