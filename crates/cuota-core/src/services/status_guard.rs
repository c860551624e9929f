use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{ReleaseId, ReleaseStatus, TrackId};
use crate::errors::CoreError;
use crate::ports::{CatalogRepository, ShareRepository};
use crate::services::split_validation::{ContractSplitCheck, SplitValidationService};

/// Resultado de pedir un cambio de estado.
///
/// Un rechazo es un resultado de negocio esperado, no un error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
  Applied {
    from: ReleaseStatus,
    to: ReleaseStatus,
  },
  Rejected {
    from: ReleaseStatus,
    to: ReleaseStatus,
    reason: String,
    invalid_track_ids: Vec<TrackId>,
  },
}

impl TransitionOutcome {
  pub fn is_applied(&self) -> bool {
    matches!(self, TransitionOutcome::Applied { .. })
  }

  pub fn invalid_track_ids(&self) -> &[TrackId] {
    match self {
      TransitionOutcome::Applied { .. } => &[],
      TransitionOutcome::Rejected { invalid_track_ids, .. } => invalid_track_ids,
    }
  }
}

/// Protege las transiciones a `delivered` y `released`.
///
/// El resto de transiciones (incluido `archived` desde cualquier estado)
/// se aplican sin comprobar nada.
pub struct StatusGuard<'a, R> {
  repo: &'a R,
  validation: SplitValidationService<'a, R>,
}

impl<'a, R> StatusGuard<'a, R>
where
  R: ShareRepository + CatalogRepository,
{
  pub fn new(repo: &'a R) -> Self {
    Self { repo, validation: SplitValidationService::new(repo) }
  }

  /// Evalúa la transición sin escribir nada.
  pub fn check(&self, release_id: ReleaseId, to: ReleaseStatus) -> Result<TransitionOutcome, CoreError> {
    let release = self
      .repo
      .find_release(release_id)?
      .ok_or_else(|| CoreError::NotFound(format!("release {release_id}")))?;
    let from = release.status;

    if !to.requires_valid_splits() {
      return Ok(TransitionOutcome::Applied { from, to });
    }

    let validation = self.validation.validate_release(release_id)?;
    if validation.all_valid {
      return Ok(TransitionOutcome::Applied { from, to });
    }

    let reason = match validation.contract {
      ContractSplitCheck::Invalid { label, pool } if validation.invalid_track_ids.is_empty() => {
        format!("Cannot advance status: label share {label}% + licensor pool {pool}% is not 100%")
      }
      _ => "Cannot advance status: some tracks have invalid licensor shares".to_string(),
    };

    Ok(TransitionOutcome::Rejected { from, to, reason, invalid_track_ids: validation.invalid_track_ids })
  }

  /// Aplica la transición si está permitida. Si se rechaza, el estado
  /// guardado no cambia.
  pub fn transition(&self, release_id: ReleaseId, to: ReleaseStatus) -> Result<TransitionOutcome, CoreError> {
    let outcome = self.check(release_id, to)?;

    match &outcome {
      TransitionOutcome::Applied { from, to } => {
        self.repo.set_release_status(release_id, *to)?;
        info!(%release_id, %from, %to, "release status changed");
      }
      TransitionOutcome::Rejected { to, invalid_track_ids, .. } => {
        warn!(%release_id, %to, invalid = invalid_track_ids.len(), "release status change rejected");
      }
    }

    Ok(outcome)
  }
}
