pub mod config;
pub mod models;
pub mod schema;

mod catalog;
mod credits;
mod shares;

use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::{debug, info};

use cuota_config::ConfigError;
use cuota_core::ports::RepoError;

pub use config::{StorageConfig, load_split_settings};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MEMORY_URL: &str = ":memory:";

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Errores al abrir el almacén. Las operaciones de los ports devuelven
/// [`RepoError`].
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("config error: {0}")]
  Config(#[from] ConfigError),
  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),
  #[error("migration error: {0}")]
  Migration(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Pragmas por conexión.
#[derive(Debug)]
struct ConnectionOptions {
  journal_mode: Option<String>,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = String::from("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;");
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Catálogo sobre SQLite. Implementa los tres ports del núcleo.
pub struct CatalogStore {
  pool: SqlitePool,
}

impl CatalogStore {
  /// Abre (y migra) la base en `database_url`.
  pub fn open(database_url: &str, config: &StorageConfig) -> Result<Self, StoreError> {
    let in_memory = database_url == MEMORY_URL;
    if !in_memory {
      if let Some(parent) = Path::new(database_url).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
      }
    }

    let options = ConnectionOptions { journal_mode: if in_memory { None } else { config.journal_mode()? } };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    // Cada conexión a `:memory:` es una base distinta: una sola conexión viva.
    let builder = if in_memory {
      Pool::builder().max_size(1).min_idle(Some(1)).idle_timeout(None).max_lifetime(None)
    } else {
      Pool::builder().max_size(config.pool_size.max(1))
    };
    let pool = builder.connection_customizer(Box::new(options)).build(manager)?;

    let store = Self { pool };
    store.migrate()?;

    info!(database_url, "catalog store ready");
    Ok(store)
  }

  pub fn open_in_memory() -> Result<Self, StoreError> {
    let config = StorageConfig { db_path: MEMORY_URL.into(), journal_mode: None, pool_size: 1 };
    Self::open(MEMORY_URL, &config)
  }

  /// Abre la base indicada en `[storage]` de `cuota.toml`.
  pub fn new_from_config() -> Result<Self, StoreError> {
    let config = StorageConfig::load()?;
    let url = config.db_path.to_string_lossy().into_owned();
    Self::open(&url, &config)
  }

  fn migrate(&self) -> Result<(), StoreError> {
    let mut conn = self.pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StoreError::Migration(e.to_string()))?;
    debug!(applied = applied.len(), "migrations applied");
    Ok(())
  }

  fn conn(&self) -> Result<Conn, RepoError> {
    self.pool.get().map_err(|e| RepoError::Storage(format!("connection pool: {e}")))
  }
}

/// Traduce errores de diesel a [`RepoError`].
///
/// Las violaciones de restricciones se distinguen del resto para que el
/// núcleo pueda tratarlas como datos inválidos y no como caídas.
pub(crate) fn map_db(e: DieselError) -> RepoError {
  match e {
    DieselError::NotFound => RepoError::NotFound,
    DieselError::DatabaseError(kind, info) => match kind {
      DatabaseErrorKind::UniqueViolation
      | DatabaseErrorKind::ForeignKeyViolation
      | DatabaseErrorKind::CheckViolation
      | DatabaseErrorKind::NotNullViolation => RepoError::Constraint(info.message().to_string()),
      _ => RepoError::Storage(info.message().to_string()),
    },
    other => RepoError::Storage(other.to_string()),
  }
}
