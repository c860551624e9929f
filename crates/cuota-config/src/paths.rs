use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno para el modo portable: todo cuelga de ese directorio.
pub const BASE_DIR_ENV: &str = "CUOTA_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

#[derive(Debug, Clone)]
pub struct CuotaPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl CuotaPaths {
  /// Layout portable bajo `base`: `config/` y `data/`.
  pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let base_dir = base.as_ref().to_path_buf();
    Self::create(base_dir.clone(), base_dir.join("config"), base_dir.join("data"))
  }

  pub fn detect() -> Result<Self, ConfigError> {
    if let Ok(env_base) = std::env::var(BASE_DIR_ENV) {
      return Self::at(env_base);
    }

    let proj_dirs = ProjectDirs::from("com", "cuota", "cuota").ok_or(ConfigError::Directories)?;
    Self::create(
      proj_dirs.config_dir().to_path_buf(),
      proj_dirs.config_dir().to_path_buf(),
      proj_dirs.data_dir().to_path_buf(),
    )
  }

  fn create(base_dir: PathBuf, config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(Self { base_dir, config_dir, data_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("cuota.toml")
  }

  /// Ruta por defecto de la base de datos del catálogo.
  pub fn default_db_path(&self) -> PathBuf {
    self.data_dir.join("catalog.db")
  }
}
