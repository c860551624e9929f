use crate::domain::{
  ArtistId, ArtistProfile, Contact, ContactId, Contract, ContractId, Release, ReleaseId, ReleaseMainArtist,
  ReleaseStatus, Track, TrackId,
};
use crate::ports::RepoError;

/// Releases, pistas y contratos.
pub trait CatalogRepository {
  // --- Releases ---
  /// Inserta el release o actualiza sus datos editables. El estado sólo se
  /// escribe al insertar; después cambia con `set_release_status`.
  fn save_release(&self, release: &Release) -> Result<(), RepoError>;

  /// Alta completa en una sola transacción: el release, sus artistas
  /// principales y sus pistas iniciales. Si algo falla no queda nada.
  fn create_release(
    &self,
    release: &Release,
    main_artists: &[ReleaseMainArtist],
    tracks: &[Track],
  ) -> Result<(), RepoError>;

  fn find_release(&self, id: ReleaseId) -> Result<Option<Release>, RepoError>;
  fn list_releases(&self) -> Result<Vec<Release>, RepoError>;

  /// Cambia sólo el estado. `RepoError::NotFound` si el release no existe.
  fn set_release_status(&self, id: ReleaseId, status: ReleaseStatus) -> Result<(), RepoError>;

  // --- Pistas ---
  fn save_track(&self, track: &Track) -> Result<(), RepoError>;
  fn find_track(&self, id: TrackId) -> Result<Option<Track>, RepoError>;
  fn delete_track(&self, id: TrackId) -> Result<(), RepoError>;

  /// Pistas del release ordenadas por `position`.
  fn tracks_for_release(&self, release_id: ReleaseId) -> Result<Vec<Track>, RepoError>;

  /// Reescribe las posiciones (0..n) siguiendo `ordered`, en una sola
  /// unidad de trabajo.
  fn reorder_tracks(&self, release_id: ReleaseId, ordered: &[TrackId]) -> Result<(), RepoError>;

  // --- Contratos ---
  /// Guarda el contrato y reemplaza sus firmantes en la misma transacción.
  fn save_contract(&self, contract: &Contract, signatories: &[ContactId]) -> Result<(), RepoError>;
  fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, RepoError>;

  /// Firmantes del contrato en el orden en que se guardaron.
  fn contract_signatories(&self, id: ContractId) -> Result<Vec<ContactId>, RepoError>;

  fn link_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), RepoError>;
  fn unlink_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), RepoError>;

  /// Contratos vinculados, del vínculo más antiguo al más reciente. El
  /// primero es el contrato principal del release.
  fn contracts_for_release(&self, release_id: ReleaseId) -> Result<Vec<Contract>, RepoError>;

  // --- Contactos y perfiles artísticos ---
  fn save_contact(&self, contact: &Contact) -> Result<(), RepoError>;
  fn save_artist_profile(&self, profile: &ArtistProfile) -> Result<(), RepoError>;

  /// Perfiles de esos artistas. Los IDs desconocidos se omiten; el orden
  /// del resultado no está garantizado.
  fn artist_profiles(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, RepoError>;
}
