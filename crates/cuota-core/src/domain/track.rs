use serde::{Deserialize, Serialize};

use crate::domain::ids::{ReleaseId, TrackId};

/// Pista de un lanzamiento.
///
/// `position` ordena las pistas dentro del release empezando en 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
  pub id: TrackId,
  pub release_id: ReleaseId,
  pub title: String,
  pub version: Option<String>,
  pub duration_ms: Option<u32>,
  pub isrc: Option<String>,
  pub position: u32,
}

impl Track {
  pub fn new(release_id: ReleaseId, title: impl Into<String>, position: u32) -> Self {
    Track {
      id: TrackId::new(),
      release_id,
      title: title.into(),
      version: None,
      duration_ms: None,
      isrc: None,
      position,
    }
  }

  /// Título con la versión entre paréntesis, como aparece en las tiendas.
  pub fn display_title(&self) -> String {
    match self.version.as_deref().map(str::trim) {
      Some(v) if !v.is_empty() => format!("{} ({v})", self.title),
      _ => self.title.clone(),
    }
  }
}

/// Campos editables de una pista. `None` deja el valor como está.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackUpdate {
  pub title: Option<String>,
  pub version: Option<Option<String>>,
  pub duration_ms: Option<Option<u32>>,
  pub isrc: Option<Option<String>>,
}

impl TrackUpdate {
  pub fn apply(self, track: &mut Track) {
    if let Some(title) = self.title {
      track.title = title;
    }
    if let Some(version) = self.version {
      track.version = version;
    }
    if let Some(duration) = self.duration_ms {
      track.duration_ms = duration;
    }
    if let Some(isrc) = self.isrc {
      track.isrc = isrc;
    }
  }
}
