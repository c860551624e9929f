use cuota_config::{ConfigBackend, ConfigError, config_backend, paths};
use cuota_core::services::SplitSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// Sección `[storage]` de `cuota.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  pub pool_size: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = paths().map(|p| p.default_db_path()).unwrap_or_else(|_| PathBuf::from("catalog.db"));
    StorageConfig { db_path, journal_mode: Some("WAL".to_string()), pool_size: 4 }
  }
}

impl StorageConfig {
  /// Lee `[storage]` y la reescribe con los valores por defecto completados.
  pub fn load() -> Result<Self, ConfigError> {
    let backend = config_backend()?;
    let cfg: StorageConfig = backend.load_section_with_default("storage")?;
    backend.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    config_backend()?.save_section("storage", self)
  }

  /// `journal_mode` normalizado, o error si SQLite no lo reconoce.
  pub fn journal_mode(&self) -> Result<Option<String>, ConfigError> {
    let Some(mode) = &self.journal_mode else {
      return Ok(None);
    };

    let mode = mode.trim().to_ascii_uppercase();
    if JOURNAL_MODES.contains(&mode.as_str()) {
      Ok(Some(mode))
    } else {
      Err(ConfigError::Other(format!("unknown journal_mode {mode:?}")))
    }
  }
}

/// Lee `[splits]`. Sin sección se usa la propagación atómica.
pub fn load_split_settings() -> Result<SplitSettings, ConfigError> {
  let backend = config_backend()?;
  let settings: SplitSettings = backend.load_section_with_default("splits")?;
  backend.save_section("splits", &settings)?;
  Ok(settings)
}
