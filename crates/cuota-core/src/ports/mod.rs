pub mod catalog;
pub mod credits;
pub mod shares;

pub use catalog::CatalogRepository;
pub use credits::CreditRepository;
pub use shares::ShareRepository;

/// Error de los adapters de persistencia.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,

  /// Violación de una restricción de datos: única, check, clave foránea…
  #[error("constraint violation: {0}")]
  Constraint(String),

  /// Fila que no se puede convertir a un registro tipado.
  #[error("corrupt row: {0}")]
  Corrupt(String),

  #[error("storage error: {0}")]
  Storage(String),
}
