use serde::{Deserialize, Serialize};

use crate::domain::ids::{ArtistId, ContributorId, ReleaseId, TrackId};

labelled_enum! {
  /// Rol de un colaborador (no artista principal) en un release o pista.
  CreditRole as "credit role" {
    Producer => "Producer",
    Composer => "Composer",
    Remixer => "Remixer",
    FeaturedArtist => "Featured Artist",
    Manager => "Manager",
    MixEngineer => "Engineer (Mix)",
    MasterEngineer => "Engineer (Master)",
    MixMasterEngineer => "Engineer (Mix & Master)",
    Other => "Other",
  }
}

/// Artista principal a nivel de release. Es la fuente de verdad de
/// "todas las pistas deberían acreditar a este artista".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMainArtist {
  pub release_id: ReleaseId,
  pub artist_id: ArtistId,
  pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContributor {
  pub id: ContributorId,
  pub release_id: ReleaseId,
  pub artist_id: ArtistId,
  pub role: CreditRole,
  pub role_custom: Option<String>,
}

/// Artista principal de una pista.
///
/// Con `inherited_from_release = true` la fila es una copia generada desde
/// el release; con `false` es un crédito manual propio de la pista que
/// ninguna operación masiva puede tocar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMainArtist {
  pub track_id: TrackId,
  pub artist_id: ArtistId,
  pub position: i32,
  pub inherited_from_release: bool,
}

impl TrackMainArtist {
  /// Clave de de-duplicación: `(pista, artista)`.
  pub fn key(&self) -> (TrackId, ArtistId) {
    (self.track_id, self.artist_id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackContributor {
  pub id: ContributorId,
  pub track_id: TrackId,
  pub artist_id: ArtistId,
  pub role: CreditRole,
  pub role_custom: Option<String>,
  pub inherited_from_release: bool,
}

impl TrackContributor {
  /// Clave de de-duplicación: `(pista, artista, rol)`.
  pub fn key(&self) -> (TrackId, ArtistId, CreditRole) {
    (self.track_id, self.artist_id, self.role)
  }
}

/// Crédito de release a propagar a las pistas.
///
/// `role = None` es un artista principal; `Some(rol)` un colaborador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssignment {
  pub artist_id: ArtistId,
  pub role: Option<CreditRole>,
  pub role_custom: Option<String>,
}

impl CreditAssignment {
  pub fn main_artist(artist_id: ArtistId) -> Self {
    CreditAssignment { artist_id, role: None, role_custom: None }
  }

  pub fn contributor(artist_id: ArtistId, role: CreditRole) -> Self {
    CreditAssignment { artist_id, role: Some(role), role_custom: None }
  }
}

impl From<&ReleaseMainArtist> for CreditAssignment {
  fn from(a: &ReleaseMainArtist) -> Self {
    CreditAssignment::main_artist(a.artist_id)
  }
}

impl From<&ReleaseContributor> for CreditAssignment {
  fn from(c: &ReleaseContributor) -> Self {
    CreditAssignment { artist_id: c.artist_id, role: Some(c.role), role_custom: c.role_custom.clone() }
  }
}

/// Qué tipo de crédito afecta una operación masiva.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
  MainArtist,
  Contributor,
}

/// Lote de créditos heredados a insertar de una vez.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackCreditBatch {
  pub main_artists: Vec<TrackMainArtist>,
  pub contributors: Vec<TrackContributor>,
}

impl TrackCreditBatch {
  pub fn is_empty(&self) -> bool {
    self.main_artists.is_empty() && self.contributors.is_empty()
  }

  pub fn extend(&mut self, other: TrackCreditBatch) {
    self.main_artists.extend(other.main_artists);
    self.contributors.extend(other.contributors);
  }
}

/// Filas afectadas por tipo de crédito.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCounts {
  pub main_artists: usize,
  pub contributors: usize,
}

impl CreditCounts {
  pub fn total(&self) -> usize {
    self.main_artists + self.contributors
  }
}

impl std::ops::AddAssign for CreditCounts {
  fn add_assign(&mut self, rhs: Self) {
    self.main_artists += rhs.main_artists;
    self.contributors += rhs.contributors;
  }
}
