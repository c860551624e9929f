use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{
  ArtistId, ContributorId, CreditAssignment, CreditCounts, CreditKind, ReleaseId, Track, TrackContributor,
  TrackCreditBatch, TrackId, TrackMainArtist,
};
use crate::errors::CoreError;
use crate::ports::{CatalogRepository, CreditRepository};
use crate::services::settings::FanOutMode;

/// Resultado de la propagación para una pista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFanOut {
  pub track_id: TrackId,
  pub inserted: CreditCounts,
  /// Sólo en modo [`FanOutMode::PerTrack`]: por qué falló esta pista.
  pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutReport {
  pub tracks: Vec<TrackFanOut>,
}

impl FanOutReport {
  pub fn inserted(&self) -> CreditCounts {
    let mut total = CreditCounts::default();
    for t in &self.tracks {
      total += t.inserted;
    }
    total
  }

  pub fn failed_tracks(&self) -> Vec<TrackId> {
    self.tracks.iter().filter(|t| t.error.is_some()).map(|t| t.track_id).collect()
  }

  pub fn is_complete(&self) -> bool {
    self.tracks.iter().all(|t| t.error.is_none())
  }
}

/// Mantiene los créditos de las pistas alineados con los del release.
///
/// Las filas generadas llevan `inherited_from_release = true`. Las filas
/// manuales (`false`) tienen prioridad: la propagación nunca las duplica,
/// sobrescribe ni borra.
pub struct InheritanceService<'a, R> {
  repo: &'a R,
  mode: FanOutMode,
}

impl<'a, R> InheritanceService<'a, R>
where
  R: CatalogRepository + CreditRepository,
{
  pub fn new(repo: &'a R, mode: FanOutMode) -> Self {
    Self { repo, mode }
  }

  /// "Apply to Tracks": copia los créditos dados a todas las pistas del
  /// release que todavía no los tengan.
  ///
  /// Sólo añade. Llamarla dos veces con lo mismo no crea duplicados.
  pub fn fan_out_to_tracks(
    &self,
    release_id: ReleaseId,
    assignments: &[CreditAssignment],
  ) -> Result<FanOutReport, CoreError> {
    if assignments.is_empty() {
      return Ok(FanOutReport::default());
    }

    let tracks = self.repo.tracks_for_release(release_id)?;
    if tracks.is_empty() {
      return Ok(FanOutReport::default());
    }

    let report = match self.mode {
      FanOutMode::Atomic => self.fan_out_atomic(&tracks, assignments)?,
      FanOutMode::PerTrack => self.fan_out_per_track(&tracks, assignments),
    };

    let inserted = report.inserted();
    info!(
      %release_id,
      tracks = tracks.len(),
      main_artists = inserted.main_artists,
      contributors = inserted.contributors,
      failed = report.failed_tracks().len(),
      "fanned out release credits"
    );

    Ok(report)
  }

  /// Propaga todos los créditos que el release tiene ahora mismo.
  pub fn apply_release_credits(&self, release_id: ReleaseId) -> Result<FanOutReport, CoreError> {
    let mut assignments: Vec<CreditAssignment> =
      self.repo.release_main_artists(release_id)?.iter().map(CreditAssignment::from).collect();
    assignments.extend(self.repo.release_contributors(release_id)?.iter().map(CreditAssignment::from));

    self.fan_out_to_tracks(release_id, &assignments)
  }

  /// "Remove from Tracks": borra de todas las pistas del release las filas
  /// *heredadas* de esos artistas. Un crédito manual del mismo artista en
  /// una pista se conserva siempre.
  pub fn retract_inherited(
    &self,
    release_id: ReleaseId,
    kind: CreditKind,
    artist_ids: &[ArtistId],
  ) -> Result<usize, CoreError> {
    if artist_ids.is_empty() {
      return Ok(0);
    }

    let track_ids: Vec<TrackId> = self.repo.tracks_for_release(release_id)?.iter().map(|t| t.id).collect();
    if track_ids.is_empty() {
      return Ok(0);
    }

    let removed = match kind {
      CreditKind::MainArtist => self.repo.delete_inherited_track_main_artists(&track_ids, artist_ids)?,
      CreditKind::Contributor => self.repo.delete_inherited_track_contributors(&track_ids, artist_ids)?,
    };

    info!(%release_id, ?kind, artists = artist_ids.len(), removed, "retracted inherited credits");
    Ok(removed)
  }

  fn fan_out_atomic(&self, tracks: &[Track], assignments: &[CreditAssignment]) -> Result<FanOutReport, CoreError> {
    let mut batch = TrackCreditBatch::default();
    let mut planned = Vec::with_capacity(tracks.len());

    for track in tracks {
      let plan = self.plan_track(track.id, assignments)?;
      let counts = CreditCounts { main_artists: plan.main_artists.len(), contributors: plan.contributors.len() };
      planned.push((track.id, counts));
      batch.extend(plan);
    }

    if !batch.is_empty() {
      self.repo.insert_track_credits(&batch)?;
    }

    let tracks = planned
      .into_iter()
      .map(|(track_id, inserted)| TrackFanOut { track_id, inserted, error: None })
      .collect();
    Ok(FanOutReport { tracks })
  }

  fn fan_out_per_track(&self, tracks: &[Track], assignments: &[CreditAssignment]) -> FanOutReport {
    let mut report = FanOutReport::default();

    for track in tracks {
      let outcome = self.plan_track(track.id, assignments).and_then(|plan| {
        if plan.is_empty() {
          Ok(CreditCounts::default())
        } else {
          self.repo.insert_track_credits(&plan).map_err(CoreError::from)
        }
      });

      let entry = match outcome {
        Ok(inserted) => TrackFanOut { track_id: track.id, inserted, error: None },
        Err(e) => {
          warn!(track_id = %track.id, error = %e, "fan-out failed for track");
          TrackFanOut { track_id: track.id, inserted: CreditCounts::default(), error: Some(e.to_string()) }
        }
      };
      report.tracks.push(entry);
    }

    report
  }

  /// Filas que faltan en una pista para cubrir `assignments`.
  ///
  /// Los artistas principales nuevos se añaden detrás de la posición más
  /// alta que ya tenga la pista.
  fn plan_track(&self, track_id: TrackId, assignments: &[CreditAssignment]) -> Result<TrackCreditBatch, CoreError> {
    let mut batch = TrackCreditBatch::default();

    let wants_main = assignments.iter().any(|a| a.role.is_none());
    let wants_contrib = assignments.iter().any(|a| a.role.is_some());

    if wants_main {
      let existing = self.repo.track_main_artists(track_id)?;
      let mut seen: HashSet<ArtistId> = existing.iter().map(|r| r.artist_id).collect();
      let mut next = existing.iter().map(|r| r.position).max().unwrap_or(-1) + 1;

      for a in assignments.iter().filter(|a| a.role.is_none()) {
        if seen.insert(a.artist_id) {
          batch.main_artists.push(TrackMainArtist {
            track_id,
            artist_id: a.artist_id,
            position: next,
            inherited_from_release: true,
          });
          next += 1;
        }
      }
    }

    if wants_contrib {
      let existing = self.repo.track_contributors(track_id)?;
      let mut seen: HashSet<_> = existing.iter().map(|c| (c.artist_id, c.role)).collect();

      for a in assignments {
        let Some(role) = a.role else { continue };
        if seen.insert((a.artist_id, role)) {
          batch.contributors.push(TrackContributor {
            id: ContributorId::new(),
            track_id,
            artist_id: a.artist_id,
            role,
            role_custom: a.role_custom.clone(),
            inherited_from_release: true,
          });
        }
      }
    }

    debug!(
      %track_id,
      main_artists = batch.main_artists.len(),
      contributors = batch.contributors.len(),
      "planned inherited credits"
    );
    Ok(batch)
  }
}
