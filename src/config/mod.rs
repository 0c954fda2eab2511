use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::write_atomic;

const CONFIG_DIR: &str = "cascade_core";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings a host may tune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "ListLimits::reference_contacts")]
    pub reference_contacts: ListLimits,
    #[serde(default = "ListLimits::expense_mappings")]
    pub expense_mappings: ListLimits,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub storage_keys: StorageKeys,
    /// Forget the persisted selection once the dependent entity was created.
    #[serde(default = "EngineConfig::default_clear_memento_on_create")]
    pub clear_memento_on_create: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_contacts: ListLimits::reference_contacts(),
            expense_mappings: ListLimits::expense_mappings(),
            search: SearchSettings::default(),
            storage_keys: StorageKeys::default(),
            clear_memento_on_create: Self::default_clear_memento_on_create(),
        }
    }
}

impl EngineConfig {
    fn default_clear_memento_on_create() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reference_contacts.validate("reference_contacts")?;
        self.expense_mappings.validate("expense_mappings")?;
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Row-count bounds of a mapping list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLimits {
    pub min: usize,
    pub max: usize,
}

impl ListLimits {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn reference_contacts() -> Self {
        Self::new(1, 5)
    }

    pub fn expense_mappings() -> Self {
        Self::new(1, 10)
    }

    /// Lowest row count a list may ever reach; never below one.
    pub fn floor(&self) -> usize {
        self.min.max(1)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.min == 0 {
            return Err(ConfigError::Invalid(format!("{name}.min must be at least 1")));
        }
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name}.min ({}) exceeds {name}.max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Tuning for the free-text expense lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 1,
            max_results: 20,
        }
    }
}

/// Keys under which the remembered selection is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub branch_name: String,
    pub line_name: String,
    pub area_id: String,
    pub area_name: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            branch_name: "selected_branch_name".into(),
            line_name: "selected_line_name".into(),
            area_id: "selected_area_id".into(),
            area_name: "selected_area_name".into(),
        }
    }
}

/// Loads and saves [`EngineConfig`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    pub fn default_location() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR);
        Self::with_base_dir(base)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns defaults when no file exists yet.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?
        } else {
            EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.reference_contacts, ListLimits::new(1, 5));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(
            manager.path(),
            r#"{"expense_mappings": {"min": 1, "max": 3}, "clear_memento_on_create": false}"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.expense_mappings.max, 3);
        assert!(!config.clear_memento_on_create);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.storage_keys.area_id, "selected_area_id");
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = EngineConfig::default();
        config.reference_contacts = ListLimits::new(4, 2);
        assert!(matches!(manager.save(&config), Err(ConfigError::Invalid(_))));

        config.reference_contacts = ListLimits::new(0, 2);
        assert!(matches!(manager.save(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = EngineConfig::default();
        config.search.debounce_ms = 150;
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap().search.debounce_ms, 150);
    }
}
