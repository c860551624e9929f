use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Contract, LicensorShare, ReleaseId, SplitState, TrackId};
use crate::errors::CoreError;
use crate::percent;
use crate::ports::{CatalogRepository, ShareRepository};

/// Resultado de validar el reparto de una pista.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackValidation {
  pub track_id: TrackId,
  pub state: SplitState,
  pub is_valid: bool,
  /// Suma de `share_percent`, redondeada a dos decimales.
  pub pool_sum: f64,
  /// Reservado para compensaciones que no son porcentajes. Siempre `false`.
  pub has_flat_fees: bool,
  pub licensor_pool_percent: Option<f64>,
}

/// Estado del reparto sello / pool del contrato principal de un release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractSplitCheck {
  /// Sin contrato vinculado. No bloquea nada.
  NoContract,
  /// Falta uno de los dos porcentajes.
  Incomplete,
  Valid { label: f64, pool: f64 },
  Invalid { label: f64, pool: f64 },
}

impl ContractSplitCheck {
  pub fn of(contract: Option<&Contract>) -> Self {
    let Some(contract) = contract else {
      return ContractSplitCheck::NoContract;
    };
    match (contract.label_share_percent, contract.licensor_pool_percent) {
      (Some(label), Some(pool)) if percent::validate_sum_to_100(&[label, pool]) => {
        ContractSplitCheck::Valid { label, pool }
      }
      (Some(label), Some(pool)) => ContractSplitCheck::Invalid { label, pool },
      _ => ContractSplitCheck::Incomplete,
    }
  }

  pub fn is_blocking(&self) -> bool {
    matches!(self, ContractSplitCheck::Invalid { .. })
  }
}

/// Resultado de validar todas las pistas de un release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseValidation {
  pub release_id: ReleaseId,
  pub all_valid: bool,
  pub invalid_track_ids: Vec<TrackId>,
  pub tracks: Vec<TrackValidation>,
  pub contract: ContractSplitCheck,
}

/// Una fila de reparto con su porcentaje efectivo sobre el total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareBreakdown {
  pub share: LicensorShare,
  pub effective_rate: f64,
}

/// Valida que los repartos sumen 100 %.
///
/// Un reparto incompleto es un estado normal mientras se edita, así que
/// nunca es un error: sólo fallan las llamadas al repositorio.
pub struct SplitValidationService<'a, R> {
  repo: &'a R,
}

impl<'a, R> SplitValidationService<'a, R>
where
  R: ShareRepository + CatalogRepository,
{
  pub fn new(repo: &'a R) -> Self {
    Self { repo }
  }

  pub fn validate_track(&self, track_id: TrackId) -> Result<TrackValidation, CoreError> {
    let shares = self.repo.shares_for_track(track_id)?;
    let licensor_pool_percent = self.repo.pool_percent_for_track(track_id)?;

    let percents: Vec<f64> = shares.iter().map(|s| s.share_percent).collect();
    let state = SplitState::of(&percents);
    let pool_sum = percent::round_to_cents(percents.iter().sum());

    debug!(%track_id, ?state, pool_sum, "validated track split");

    Ok(TrackValidation {
      track_id,
      state,
      is_valid: state == SplitState::Valid,
      pool_sum,
      has_flat_fees: false,
      licensor_pool_percent,
    })
  }

  /// Valida todas las pistas del release y el contrato principal.
  ///
  /// Un release sin pistas es válido: al principio del ciclo de vida es
  /// normal no tener pistas todavía.
  pub fn validate_release(&self, release_id: ReleaseId) -> Result<ReleaseValidation, CoreError> {
    let tracks = self.repo.tracks_for_release(release_id)?;

    let mut results = Vec::with_capacity(tracks.len());
    for track in &tracks {
      results.push(self.validate_track(track.id)?);
    }

    let invalid_track_ids: Vec<TrackId> =
      results.iter().filter(|v| !v.is_valid).map(|v| v.track_id).collect();

    let contracts = self.repo.contracts_for_release(release_id)?;
    let contract = ContractSplitCheck::of(contracts.first());

    let all_valid = invalid_track_ids.is_empty() && !contract.is_blocking();

    debug!(%release_id, tracks = results.len(), invalid = invalid_track_ids.len(), all_valid, "validated release");

    Ok(ReleaseValidation { release_id, all_valid, invalid_track_ids, tracks: results, contract })
  }

  /// Reparto de la pista con el porcentaje efectivo de cada contacto.
  ///
  /// Sin contrato vinculado el pool cuenta como 0.
  pub fn share_breakdown(&self, track_id: TrackId) -> Result<Vec<ShareBreakdown>, CoreError> {
    let pool = self.repo.pool_percent_for_track(track_id)?.unwrap_or(0.0);
    let shares = self.repo.shares_for_track(track_id)?;

    Ok(
      shares
        .into_iter()
        .map(|share| {
          let effective_rate = share.effective_rate(pool);
          ShareBreakdown { share, effective_rate }
        })
        .collect(),
    )
  }
}
