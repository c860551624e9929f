mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{BASE_DIR_ENV, ConfigError, CuotaPaths};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<CuotaPaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Rutas del proceso (portable con `CUOTA_BASE_DIR` o las del sistema).
///
/// Se resuelven la primera vez; si falla, el siguiente intento vuelve a probar.
pub fn paths() -> Result<&'static CuotaPaths, ConfigError> {
  PATHS.get_or_try_init(CuotaPaths::detect)
}

/// Backend de configuración compartido, sobre `cuota.toml`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| Ok(TomlConfigBackend::new(paths()?.clone())))
}
