// crates/cuota-core/src/errors.rs
use thiserror::Error;

use crate::ports::RepoError;

/// Error genérico del núcleo de Cuota.
///
/// Un reparto incompleto o una transición rechazada **no** son errores:
/// se devuelven como resultados. Esto queda para fallos de persistencia y
/// para entradas que no respetan las reglas básicas de porcentajes.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("repository error: {0}")]
  Repository(#[from] RepoError),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("percentage out of range [0, 100]: {0}")]
  InvalidPercent(f64),

  #[error("label share {label}% + licensor pool {pool}% must equal 100%")]
  ContractSplit { label: f64, pool: f64 },
}
