use crate::domain::{
  ArtistId, ContributorId, CreditCounts, CreditRole, ReleaseContributor, ReleaseId, ReleaseMainArtist, TrackContributor,
  TrackCreditBatch, TrackId, TrackMainArtist,
};
use crate::ports::RepoError;

/// Créditos de artistas a nivel de release y de pista.
pub trait CreditRepository {
  // --- Release ---
  fn release_main_artists(&self, release_id: ReleaseId) -> Result<Vec<ReleaseMainArtist>, RepoError>;
  fn insert_release_main_artist(&self, row: &ReleaseMainArtist) -> Result<(), RepoError>;
  fn delete_release_main_artist(&self, release_id: ReleaseId, artist_id: ArtistId) -> Result<(), RepoError>;

  /// Sustituye la lista completa de artistas principales del release con
  /// posiciones 1..n en el orden dado. Borra e inserta en una transacción.
  fn replace_release_main_artists(&self, release_id: ReleaseId, ordered: &[ArtistId]) -> Result<(), RepoError>;

  fn release_contributors(&self, release_id: ReleaseId) -> Result<Vec<ReleaseContributor>, RepoError>;

  /// Inserta o, si el artista ya colabora en el release, actualiza su rol.
  fn upsert_release_contributor(&self, row: &ReleaseContributor) -> Result<ReleaseContributor, RepoError>;
  fn delete_release_contributor(&self, id: ContributorId) -> Result<Option<ReleaseContributor>, RepoError>;

  /// Cambia el rol de un colaborador. `None` si el id no existe.
  fn update_release_contributor_role(
    &self,
    id: ContributorId,
    role: CreditRole,
    role_custom: Option<String>,
  ) -> Result<Option<ReleaseContributor>, RepoError>;

  // --- Pista ---
  fn track_main_artists(&self, track_id: TrackId) -> Result<Vec<TrackMainArtist>, RepoError>;
  fn track_contributors(&self, track_id: TrackId) -> Result<Vec<TrackContributor>, RepoError>;

  /// Inserta las filas heredadas del lote que no existan todavía (clave
  /// `(pista, artista)` para artistas principales y `(pista, artista, rol)`
  /// para colaboradores) e ignora el resto. Todo el lote se aplica en una
  /// sola transacción: si algo falla no se inserta nada.
  fn insert_track_credits(&self, batch: &TrackCreditBatch) -> Result<CreditCounts, RepoError>;

  /// Inserta o reemplaza un crédito manual de pista.
  fn upsert_track_main_artist(&self, row: &TrackMainArtist) -> Result<(), RepoError>;
  fn upsert_track_contributor(&self, row: &TrackContributor) -> Result<(), RepoError>;

  fn delete_track_main_artist(&self, track_id: TrackId, artist_id: ArtistId) -> Result<(), RepoError>;
  fn delete_track_contributor(&self, id: ContributorId) -> Result<(), RepoError>;

  /// Borra las filas heredadas (`inherited_from_release = true`) de esos
  /// artistas en esas pistas. Las filas manuales nunca se tocan.
  fn delete_inherited_track_main_artists(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError>;

  fn delete_inherited_track_contributors(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError>;
}
