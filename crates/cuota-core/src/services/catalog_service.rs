use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::display::{DSP_MAX_ARTISTS, format_artist_display_line};
use crate::domain::{
  ArtistId, ContactId, Contract, ContractId, ContractStatus, ContributorId, CreditAssignment, CreditKind,
  CreditRole, NewShare, Release, ReleaseContributor, ReleaseId, ReleaseMainArtist, ReleaseStatus, ReleaseType,
  ReleaseUpdate, SplitDraft, Track, TrackContributor, TrackId, TrackMainArtist, TrackUpdate,
};
use crate::errors::CoreError;
use crate::percent;
use crate::ports::{CatalogRepository, CreditRepository, ShareRepository};
use crate::services::inheritance::{FanOutReport, InheritanceService};
use crate::services::settings::SplitSettings;
use crate::services::split_validation::{SplitValidationService, TrackValidation};
use crate::services::status_guard::{StatusGuard, TransitionOutcome};

/// Datos para dar de alta un release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRelease {
  pub title: String,
  pub release_type: ReleaseType,
  /// Lo genera el procedimiento externo de numeración de catálogo.
  pub catalog_id: String,
  pub release_date: Option<NaiveDate>,
  /// Artistas principales, en orden.
  pub artist_ids: Vec<ArtistId>,
}

/// Si un cambio de crédito del release se propaga también a las pistas.
///
/// La propagación es siempre una decisión explícita de quien llama.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
  #[default]
  ReleaseOnly,
  ApplyToTracks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntent {
  Primary,
  Ghost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
  pub label: String,
  pub intent: ActionIntent,
}

impl QuickAction {
  fn new(label: &str, intent: ActionIntent) -> Self {
    QuickAction { label: label.to_string(), intent }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSummary {
  pub id: ContractId,
  pub status: ContractStatus,
  pub term: String,
  pub label_share_percent: Option<f64>,
  pub licensor_pool_percent: Option<f64>,
}

/// Panel de resumen de un release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSummary {
  pub release: Release,
  pub artist_line: String,
  pub contract: Option<ContractSummary>,
  /// Pistas sin ninguna fila de reparto.
  pub tracks_missing_splits: usize,
  pub has_release_date: bool,
  pub has_contract: bool,
  pub quick_actions: Vec<QuickAction>,
}

fn quick_actions(status: ReleaseStatus) -> Vec<QuickAction> {
  let mut actions = Vec::new();
  if matches!(status, ReleaseStatus::Signed | ReleaseStatus::InProgress) {
    actions.push(QuickAction::new("Send to Mastering", ActionIntent::Primary));
  }
  if status == ReleaseStatus::ReadyForDelivery {
    actions.push(QuickAction::new("Kick Off Delivery", ActionIntent::Primary));
  }
  if matches!(status, ReleaseStatus::Planning | ReleaseStatus::Signed) {
    actions.push(QuickAction::new("Request Splits", ActionIntent::Ghost));
  }
  actions
}

/// Fachada del catálogo: operaciones de registro que alimentan la
/// validación de repartos, la herencia de créditos y el control de estados.
pub struct CatalogService<'a, R> {
  repo: &'a R,
  settings: SplitSettings,
}

impl<'a, R> CatalogService<'a, R>
where
  R: CatalogRepository + ShareRepository + CreditRepository,
{
  pub fn new(repo: &'a R, settings: SplitSettings) -> Self {
    Self { repo, settings }
  }

  pub fn validation(&self) -> SplitValidationService<'a, R> {
    SplitValidationService::new(self.repo)
  }

  pub fn inheritance(&self) -> InheritanceService<'a, R> {
    InheritanceService::new(self.repo, self.settings.fan_out_mode)
  }

  pub fn status_guard(&self) -> StatusGuard<'a, R> {
    StatusGuard::new(self.repo)
  }

  // -------- Releases --------

  /// Alta de un release en `planning`.
  ///
  /// Los artistas principales se guardan con posiciones 1..n. Un `Single`
  /// recibe una pista por defecto con el título del release. Todo se
  /// escribe en una sola transacción.
  pub fn create_release(&self, input: NewRelease) -> Result<Release, CoreError> {
    let mut release = Release::new(input.title, input.release_type, input.catalog_id);
    release.release_date = input.release_date;

    let main_artists: Vec<ReleaseMainArtist> = input
      .artist_ids
      .iter()
      .enumerate()
      .map(|(idx, &artist_id)| ReleaseMainArtist { release_id: release.id, artist_id, position: idx as i32 + 1 })
      .collect();

    let tracks = match release.release_type {
      ReleaseType::Single => vec![Track::new(release.id, release.title.clone(), 0)],
      _ => Vec::new(),
    };

    self.repo.create_release(&release, &main_artists, &tracks)?;

    info!(release_id = %release.id, catalog_id = %release.catalog_id, "release created");
    Ok(release)
  }

  pub fn get_release(&self, id: ReleaseId) -> Result<Release, CoreError> {
    self.repo.find_release(id)?.ok_or_else(|| CoreError::NotFound(format!("release {id}")))
  }

  /// Edita título, versión, fecha o UPC. El estado guardado no cambia
  /// aunque se edite a partir de una copia antigua del release.
  pub fn update_release(&self, id: ReleaseId, update: ReleaseUpdate) -> Result<Release, CoreError> {
    let mut release = self.get_release(id)?;
    update.apply(&mut release);
    self.repo.save_release(&release)?;
    Ok(release)
  }

  /// Cambio de estado pasando por el [`StatusGuard`].
  pub fn change_status(&self, id: ReleaseId, to: ReleaseStatus) -> Result<TransitionOutcome, CoreError> {
    self.status_guard().transition(id, to)
  }

  // -------- Pistas --------

  /// Añade una pista al final del release, titulada `Track N`.
  pub fn create_track(&self, release_id: ReleaseId) -> Result<Track, CoreError> {
    self.get_release(release_id)?;
    let tracks = self.repo.tracks_for_release(release_id)?;
    let position = tracks.iter().map(|t| t.position + 1).max().unwrap_or(0);

    let track = Track::new(release_id, format!("Track {}", position + 1), position);
    self.repo.save_track(&track)?;
    Ok(track)
  }

  pub fn get_track(&self, id: TrackId) -> Result<Track, CoreError> {
    self.repo.find_track(id)?.ok_or_else(|| CoreError::NotFound(format!("track {id}")))
  }

  pub fn update_track(&self, id: TrackId, update: TrackUpdate) -> Result<Track, CoreError> {
    let mut track = self.get_track(id)?;
    update.apply(&mut track);
    self.repo.save_track(&track)?;
    Ok(track)
  }

  pub fn delete_track(&self, id: TrackId) -> Result<(), CoreError> {
    Ok(self.repo.delete_track(id)?)
  }

  pub fn reorder_tracks(&self, release_id: ReleaseId, ordered: &[TrackId]) -> Result<(), CoreError> {
    Ok(self.repo.reorder_tracks(release_id, ordered)?)
  }

  // -------- Contratos --------

  /// Guarda el contrato y sus firmantes.
  ///
  /// Los dos porcentajes se normalizan a dos decimales antes de comprobar
  /// el reparto sello / pool. Devuelve el contrato tal como se guardó.
  pub fn save_contract(&self, contract: &Contract, signatories: &[ContactId]) -> Result<Contract, CoreError> {
    let mut contract = contract.clone();
    contract.label_share_percent = contract.label_share_percent.map(percent::validate_percent).transpose()?;
    contract.licensor_pool_percent = contract.licensor_pool_percent.map(percent::validate_percent).transpose()?;
    contract.check_split()?;

    self.repo.save_contract(&contract, signatories)?;
    info!(contract_id = %contract.id, signatories = signatories.len(), "contract saved");
    Ok(contract)
  }

  pub fn contract_signatories(&self, contract_id: ContractId) -> Result<Vec<ContactId>, CoreError> {
    Ok(self.repo.contract_signatories(contract_id)?)
  }

  pub fn link_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), CoreError> {
    Ok(self.repo.link_contract(contract_id, release_id)?)
  }

  pub fn unlink_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), CoreError> {
    Ok(self.repo.unlink_contract(contract_id, release_id)?)
  }

  pub fn primary_contract(&self, release_id: ReleaseId) -> Result<Option<Contract>, CoreError> {
    Ok(self.repo.contracts_for_release(release_id)?.into_iter().next())
  }

  // -------- Repartos --------

  /// Reemplaza el reparto de una pista de una sola vez.
  ///
  /// Cada porcentaje debe estar en `[0, 100]` y se normaliza a dos
  /// decimales. Guardar un reparto incompleto está permitido; el resultado
  /// devuelto dice en qué estado quedó la pista.
  pub fn replace_shares(&self, track_id: TrackId, shares: Vec<NewShare>) -> Result<TrackValidation, CoreError> {
    self.get_track(track_id)?;

    let shares = shares
      .into_iter()
      .map(|mut s| {
        s.share_percent = percent::validate_percent(s.share_percent)?;
        Ok(s)
      })
      .collect::<Result<Vec<_>, CoreError>>()?;

    self.repo.replace_shares_for_track(track_id, &shares)?;
    let validation = self.validation().validate_track(track_id)?;

    info!(%track_id, rows = shares.len(), state = ?validation.state, "track shares replaced");
    Ok(validation)
  }

  pub fn save_draft(&self, track_id: TrackId, draft: SplitDraft) -> Result<TrackValidation, CoreError> {
    self.replace_shares(track_id, draft.into_new_shares())
  }

  /// Borrador editable con el reparto guardado de la pista.
  pub fn draft_for_track(&self, track_id: TrackId) -> Result<SplitDraft, CoreError> {
    Ok(SplitDraft::from_shares(&self.repo.shares_for_track(track_id)?))
  }

  // -------- Créditos de release --------

  /// Añade un artista principal al final del release (posiciones desde 1).
  pub fn add_release_main_artist(
    &self,
    release_id: ReleaseId,
    artist_id: ArtistId,
    propagation: Propagation,
  ) -> Result<Option<FanOutReport>, CoreError> {
    let existing = self.repo.release_main_artists(release_id)?;
    let position = existing.iter().map(|a| a.position + 1).max().unwrap_or(1);
    self.repo.insert_release_main_artist(&ReleaseMainArtist { release_id, artist_id, position })?;

    match propagation {
      Propagation::ReleaseOnly => Ok(None),
      Propagation::ApplyToTracks => self
        .inheritance()
        .fan_out_to_tracks(release_id, &[CreditAssignment::main_artist(artist_id)])
        .map(Some),
    }
  }

  /// Quita un artista principal del release. Con `ApplyToTracks` devuelve
  /// cuántas filas heredadas se borraron de las pistas.
  pub fn remove_release_main_artist(
    &self,
    release_id: ReleaseId,
    artist_id: ArtistId,
    propagation: Propagation,
  ) -> Result<usize, CoreError> {
    self.repo.delete_release_main_artist(release_id, artist_id)?;

    match propagation {
      Propagation::ReleaseOnly => Ok(0),
      Propagation::ApplyToTracks => {
        self.inheritance().retract_inherited(release_id, CreditKind::MainArtist, &[artist_id])
      }
    }
  }

  /// Reescribe la lista de artistas principales en el orden dado
  /// (posiciones desde 1). Sólo afecta al release: las pistas conservan
  /// sus créditos.
  pub fn set_release_main_artists(&self, release_id: ReleaseId, ordered: &[ArtistId]) -> Result<(), CoreError> {
    self.get_release(release_id)?;
    self.repo.replace_release_main_artists(release_id, ordered)?;
    info!(%release_id, artists = ordered.len(), "release main artists replaced");
    Ok(())
  }

  pub fn add_release_contributor(
    &self,
    release_id: ReleaseId,
    artist_id: ArtistId,
    role: CreditRole,
    propagation: Propagation,
  ) -> Result<(ReleaseContributor, Option<FanOutReport>), CoreError> {
    let row = ReleaseContributor { id: ContributorId::new(), release_id, artist_id, role, role_custom: None };
    let saved = self.repo.upsert_release_contributor(&row)?;

    let report = match propagation {
      Propagation::ReleaseOnly => None,
      Propagation::ApplyToTracks => {
        Some(self.inheritance().fan_out_to_tracks(release_id, &[CreditAssignment::from(&saved)])?)
      }
    };
    Ok((saved, report))
  }

  pub fn remove_release_contributor(
    &self,
    release_id: ReleaseId,
    contributor_id: ContributorId,
    propagation: Propagation,
  ) -> Result<usize, CoreError> {
    let removed = self.repo.delete_release_contributor(contributor_id)?;

    match (propagation, removed) {
      (Propagation::ApplyToTracks, Some(row)) => {
        self.inheritance().retract_inherited(release_id, CreditKind::Contributor, &[row.artist_id])
      }
      _ => Ok(0),
    }
  }

  /// Cambia el rol de un colaborador del release.
  ///
  /// Con `ApplyToTracks` las filas heredadas del artista se retiran y se
  /// vuelven a propagar con el rol nuevo. Las filas manuales no se tocan.
  pub fn update_contributor_role(
    &self,
    contributor_id: ContributorId,
    role: CreditRole,
    role_custom: Option<String>,
    propagation: Propagation,
  ) -> Result<(ReleaseContributor, Option<FanOutReport>), CoreError> {
    let updated = self
      .repo
      .update_release_contributor_role(contributor_id, role, role_custom)?
      .ok_or_else(|| CoreError::NotFound(format!("contributor {contributor_id}")))?;

    let report = match propagation {
      Propagation::ReleaseOnly => None,
      Propagation::ApplyToTracks => {
        let inheritance = self.inheritance();
        inheritance.retract_inherited(updated.release_id, CreditKind::Contributor, &[updated.artist_id])?;
        Some(inheritance.fan_out_to_tracks(updated.release_id, &[CreditAssignment::from(&updated)])?)
      }
    };
    Ok((updated, report))
  }

  // -------- Créditos manuales de pista --------

  /// Crédito manual de artista principal, al final de la pista. Si ya
  /// existía una fila heredada para ese artista pasa a ser manual.
  pub fn add_track_main_artist(&self, track_id: TrackId, artist_id: ArtistId) -> Result<(), CoreError> {
    let existing = self.repo.track_main_artists(track_id)?;
    let position = existing.iter().map(|a| a.position + 1).max().unwrap_or(0);
    let row = TrackMainArtist { track_id, artist_id, position, inherited_from_release: false };
    Ok(self.repo.upsert_track_main_artist(&row)?)
  }

  pub fn remove_track_main_artist(&self, track_id: TrackId, artist_id: ArtistId) -> Result<(), CoreError> {
    Ok(self.repo.delete_track_main_artist(track_id, artist_id)?)
  }

  pub fn add_track_contributor(
    &self,
    track_id: TrackId,
    artist_id: ArtistId,
    role: CreditRole,
    role_custom: Option<String>,
  ) -> Result<(), CoreError> {
    let row = TrackContributor {
      id: ContributorId::new(),
      track_id,
      artist_id,
      role,
      role_custom,
      inherited_from_release: false,
    };
    Ok(self.repo.upsert_track_contributor(&row)?)
  }

  pub fn remove_track_contributor(&self, id: ContributorId) -> Result<(), CoreError> {
    Ok(self.repo.delete_track_contributor(id)?)
  }

  // -------- Consultas --------

  /// Línea de artistas principales del release, en orden de posición.
  pub fn release_artist_line(&self, release_id: ReleaseId) -> Result<String, CoreError> {
    let mut credits = self.repo.release_main_artists(release_id)?;
    credits.sort_by_key(|c| c.position);
    self.artist_line(credits.iter().map(|c| c.artist_id))
  }

  /// Línea de artistas principales de una pista, en orden de posición.
  pub fn track_artist_line(&self, track_id: TrackId) -> Result<String, CoreError> {
    let mut credits = self.repo.track_main_artists(track_id)?;
    credits.sort_by_key(|c| c.position);
    self.artist_line(credits.iter().map(|c| c.artist_id))
  }

  fn artist_line(&self, ordered: impl Iterator<Item = ArtistId>) -> Result<String, CoreError> {
    let ordered: Vec<ArtistId> = ordered.collect();
    let names: HashMap<ArtistId, String> =
      self.repo.artist_profiles(&ordered)?.into_iter().map(|p| (p.id, p.artist_name)).collect();

    let line: Vec<&str> = ordered.iter().filter_map(|id| names.get(id).map(String::as_str)).collect();
    Ok(format_artist_display_line(&line, DSP_MAX_ARTISTS))
  }

  pub fn release_summary(&self, release_id: ReleaseId) -> Result<ReleaseSummary, CoreError> {
    let release = self.get_release(release_id)?;
    let contract = self.primary_contract(release_id)?;

    let mut tracks_missing_splits = 0;
    for track in self.repo.tracks_for_release(release_id)? {
      if self.repo.shares_for_track(track.id)?.is_empty() {
        tracks_missing_splits += 1;
      }
    }

    let contract = contract.map(|c| ContractSummary {
      id: c.id,
      status: c.status,
      term: c.term.display(),
      label_share_percent: c.label_share_percent,
      licensor_pool_percent: c.licensor_pool_percent,
    });

    Ok(ReleaseSummary {
      artist_line: self.release_artist_line(release_id)?,
      has_release_date: release.release_date.is_some(),
      has_contract: contract.is_some(),
      quick_actions: quick_actions(release.status),
      tracks_missing_splits,
      contract,
      release,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quick_actions_follow_status() {
    let labels = |s| quick_actions(s).into_iter().map(|a| a.label).collect::<Vec<_>>();

    assert_eq!(labels(ReleaseStatus::Planning), vec!["Request Splits"]);
    assert_eq!(labels(ReleaseStatus::Signed), vec!["Send to Mastering", "Request Splits"]);
    assert_eq!(labels(ReleaseStatus::InProgress), vec!["Send to Mastering"]);
    assert_eq!(labels(ReleaseStatus::ReadyForDelivery), vec!["Kick Off Delivery"]);
    assert!(labels(ReleaseStatus::Released).is_empty());
  }
}
