use crate::domain::{LicensorShare, NewShare, TrackId};
use crate::ports::RepoError;

/// Acceso al reparto por pista y al pool del contrato que la cubre.
pub trait ShareRepository {
  /// Reparto actual de la pista, en orden de creación.
  fn shares_for_track(&self, track_id: TrackId) -> Result<Vec<LicensorShare>, RepoError>;

  /// Reemplaza el reparto completo de la pista.
  ///
  /// Debe ser atómico: o se borran todas las filas anteriores y se insertan
  /// todas las nuevas, o no cambia nada. Una implementación que borra y
  /// luego falla al insertar deja la pista sin reparto.
  fn replace_shares_for_track(&self, track_id: TrackId, shares: &[NewShare]) -> Result<(), RepoError>;

  /// `licensor_pool_percent` del contrato principal del release de la
  /// pista; `None` si no hay contrato vinculado o no tiene pool.
  fn pool_percent_for_track(&self, track_id: TrackId) -> Result<Option<f64>, RepoError>;
}
