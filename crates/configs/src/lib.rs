use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the two documents live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_courses_file")]
    pub courses_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), users_file: default_users_file(), courses_file: default_courses_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format(), filter: default_log_filter() }
    }
}

fn default_data_dir() -> String { ".".into() }
fn default_users_file() -> String { "users.json".into() }
fn default_courses_file() -> String { "courses.json".into() }
fn default_log_format() -> String { "compact".into() }
fn default_log_filter() -> String { "info".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read and parse a config file. A file that does not exist yields `None`.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => AppConfig::from_toml_str(&content).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(content)?;
        Ok(cfg)
    }

    /// Load and validate the config file if there is one. Without a file the
    /// built-in defaults apply; the flag tells which happened.
    pub fn load_or_default() -> Result<(Self, bool)> {
        let (mut cfg, from_file) = match load_optional(&config_path())? {
            Some(cfg) => (cfg, true),
            None => (AppConfig::default(), false),
        };
        cfg.normalize_and_validate()?;
        Ok((cfg, from_file))
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // STORE_DATA_DIR 优先于 TOML 中的 data_dir
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.logging.normalize()?;
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("STORE_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, file) in [("storage.users_file", &self.users_file), ("storage.courses_file", &self.courses_file)] {
            if file.trim().is_empty() {
                return Err(anyhow!("{name} must not be empty"));
            }
            if file.contains('/') || file.contains('\\') {
                return Err(anyhow!("{name} must be a plain file name, got {file:?}"));
            }
        }
        if self.users_file == self.courses_file {
            return Err(anyhow!("storage.users_file and storage.courses_file must differ"));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir().join(&self.users_file)
    }

    pub fn courses_path(&self) -> PathBuf {
        self.data_dir().join(&self.courses_file)
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<()> {
        self.format = self.format.trim().to_ascii_lowercase();
        if !matches!(self.format.as_str(), "compact" | "json") {
            return Err(anyhow!("logging.format must be \"compact\" or \"json\", got {:?}", self.format));
        }
        if self.filter.trim().is_empty() {
            self.filter = default_log_filter();
        }
        Ok(())
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_takes_defaults() -> Result<()> {
        let cfg = AppConfig::from_toml_str("")?;
        assert_eq!(cfg.storage.users_path(), Path::new(".").join("users.json"));
        assert_eq!(cfg.storage.courses_path(), Path::new(".").join("courses.json"));
        assert_eq!(cfg.logging.format, "compact");
        assert!(!cfg.logging.is_json());
        Ok(())
    }

    #[test]
    fn partial_sections_fill_in() -> Result<()> {
        let mut cfg = AppConfig::from_toml_str("[storage]\ndata_dir = \"data\"\n\n[logging]\nformat = \"JSON\"\n")?;
        cfg.logging.normalize()?;
        assert_eq!(cfg.storage.users_path(), Path::new("data").join("users.json"));
        assert!(cfg.logging.is_json());
        assert_eq!(cfg.logging.filter, "info");
        Ok(())
    }

    #[test]
    fn rejects_clashing_or_nested_file_names() -> Result<()> {
        let cfg = AppConfig::from_toml_str("[storage]\nusers_file = \"db.json\"\ncourses_file = \"db.json\"\n")?;
        assert!(cfg.storage.validate().is_err());
        let cfg = AppConfig::from_toml_str("[storage]\nusers_file = \"../users.json\"\n")?;
        assert!(cfg.storage.validate().is_err());
        let cfg = AppConfig::from_toml_str("[storage]\ncourses_file = \" \"\n")?;
        assert!(cfg.storage.validate().is_err());
        Ok(())
    }

    fn scratch_file(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("configs_{}_{}.toml", label, uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_is_not_an_error() -> Result<()> {
        let path = scratch_file("missing");
        assert!(load_optional(&path.to_string_lossy())?.is_none());
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.storage.users_file, "users.json");
        Ok(())
    }

    #[test]
    fn present_but_invalid_file_is_an_error() -> Result<()> {
        let path = scratch_file("invalid");
        std::fs::write(&path, "[storage\ndata_dir = ")?;
        let parsed = load_optional(&path.to_string_lossy());
        let _ = std::fs::remove_file(&path);
        assert!(parsed.is_err());

        let path = scratch_file("valid");
        std::fs::write(&path, "[logging]\nformat = \"json\"\n")?;
        let parsed = load_optional(&path.to_string_lossy());
        let _ = std::fs::remove_file(&path);
        assert!(parsed?.map(|c| c.logging.format == "json").unwrap_or(false));
        Ok(())
    }

    #[test]
    fn rejects_unknown_log_format() -> Result<()> {
        let mut cfg = AppConfig::from_toml_str("[logging]\nformat = \"xml\"\n")?;
        assert!(cfg.logging.normalize().is_err());
        Ok(())
    }
}
