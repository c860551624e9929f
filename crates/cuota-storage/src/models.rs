use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;

use cuota_core::domain::{
  ArtistProfile, Contact, ContactId, Contract, ContractId, ContractTerm, LicensorShare, Release, ReleaseContributor,
  ReleaseMainArtist, Track, TrackContributor, TrackMainArtist,
};
use cuota_core::ports::RepoError;

use crate::schema::{
  artist_profiles, contacts, contract_signatories, contracts, licensor_shares, release_contributors,
  release_main_artists, releases, track_contributors, track_main_artists, tracks,
};

const DATE_FMT: &str = "%Y-%m-%d";

fn parse<T>(column: &str, raw: &str) -> Result<T, RepoError>
where
  T: FromStr,
  T::Err: Display,
{
  raw.parse().map_err(|e| RepoError::Corrupt(format!("{column} = {raw:?}: {e}")))
}

fn parse_opt<T>(column: &str, raw: Option<&str>) -> Result<Option<T>, RepoError>
where
  T: FromStr,
  T::Err: Display,
{
  raw.map(|r| parse(column, r)).transpose()
}

fn parse_date(column: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, RepoError> {
  raw
    .map(|r| NaiveDate::parse_from_str(r, DATE_FMT).map_err(|e| RepoError::Corrupt(format!("{column} = {r:?}: {e}"))))
    .transpose()
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
  date.map(|d| d.format(DATE_FMT).to_string())
}

fn unsigned(column: &str, value: i32) -> Result<u32, RepoError> {
  u32::try_from(value).map_err(|_| RepoError::Corrupt(format!("{column} = {value}: negative")))
}

fn unsigned_opt(column: &str, value: Option<i32>) -> Result<Option<u32>, RepoError> {
  value.map(|v| unsigned(column, v)).transpose()
}

fn signed(column: &str, value: u32) -> Result<i32, RepoError> {
  i32::try_from(value).map_err(|_| RepoError::Constraint(format!("{column} = {value}: out of range")))
}

fn signed_opt(column: &str, value: Option<u32>) -> Result<Option<i32>, RepoError> {
  value.map(|v| signed(column, v)).transpose()
}

// -------- releases --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = releases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReleaseRow {
  pub id: String,
  pub title: String,
  pub version: Option<String>,
  pub release_type: String,
  pub catalog_id: String,
  pub upc: Option<String>,
  pub release_date: Option<String>,
  pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = releases)]
pub struct NewReleaseRow {
  pub id: String,
  pub title: String,
  pub version: Option<String>,
  pub release_type: String,
  pub catalog_id: String,
  pub upc: Option<String>,
  pub release_date: Option<String>,
  pub status: String,
}

impl From<&Release> for NewReleaseRow {
  fn from(r: &Release) -> Self {
    NewReleaseRow {
      id: r.id.to_string(),
      title: r.title.clone(),
      version: r.version.clone(),
      release_type: r.release_type.as_str().to_string(),
      catalog_id: r.catalog_id.clone(),
      upc: r.upc.clone(),
      release_date: format_date(r.release_date),
      status: r.status.as_str().to_string(),
    }
  }
}

/// Columnas que reescribe un upsert de release. El estado queda fuera:
/// sólo cambia a través de `set_release_status`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = releases)]
#[diesel(treat_none_as_null = true)]
pub struct ReleaseChangeset {
  pub title: String,
  pub version: Option<String>,
  pub release_type: String,
  pub catalog_id: String,
  pub upc: Option<String>,
  pub release_date: Option<String>,
}

impl From<&Release> for ReleaseChangeset {
  fn from(r: &Release) -> Self {
    ReleaseChangeset {
      title: r.title.clone(),
      version: r.version.clone(),
      release_type: r.release_type.as_str().to_string(),
      catalog_id: r.catalog_id.clone(),
      upc: r.upc.clone(),
      release_date: format_date(r.release_date),
    }
  }
}

impl TryFrom<ReleaseRow> for Release {
  type Error = RepoError;

  fn try_from(row: ReleaseRow) -> Result<Self, Self::Error> {
    Ok(Release {
      id: parse("releases.id", &row.id)?,
      release_type: parse("releases.release_type", &row.release_type)?,
      release_date: parse_date("releases.release_date", row.release_date.as_deref())?,
      status: parse("releases.status", &row.status)?,
      title: row.title,
      version: row.version,
      catalog_id: row.catalog_id,
      upc: row.upc,
    })
  }
}

// -------- tracks --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackRow {
  pub id: String,
  pub release_id: String,
  pub title: String,
  pub version: Option<String>,
  pub duration_ms: Option<i32>,
  pub isrc: Option<String>,
  pub position: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = tracks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTrackRow {
  pub id: String,
  pub release_id: String,
  pub title: String,
  pub version: Option<String>,
  pub duration_ms: Option<i32>,
  pub isrc: Option<String>,
  pub position: i32,
}

impl TryFrom<&Track> for NewTrackRow {
  type Error = RepoError;

  fn try_from(t: &Track) -> Result<Self, Self::Error> {
    Ok(NewTrackRow {
      id: t.id.to_string(),
      release_id: t.release_id.to_string(),
      title: t.title.clone(),
      version: t.version.clone(),
      duration_ms: signed_opt("tracks.duration_ms", t.duration_ms)?,
      isrc: t.isrc.clone(),
      position: signed("tracks.position", t.position)?,
    })
  }
}

impl TryFrom<TrackRow> for Track {
  type Error = RepoError;

  fn try_from(row: TrackRow) -> Result<Self, Self::Error> {
    Ok(Track {
      id: parse("tracks.id", &row.id)?,
      release_id: parse("tracks.release_id", &row.release_id)?,
      duration_ms: unsigned_opt("tracks.duration_ms", row.duration_ms)?,
      position: unsigned("tracks.position", row.position)?,
      title: row.title,
      version: row.version,
      isrc: row.isrc,
    })
  }
}

// -------- contracts --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = contracts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContractRow {
  pub id: String,
  pub contract_type: String,
  pub status: String,
  pub label_share_percent: Option<f64>,
  pub licensor_pool_percent: Option<f64>,
  pub territory: Option<String>,
  pub term_type: Option<String>,
  pub term_value_years: Option<i32>,
  pub auto_renew_interval_years: Option<i32>,
  pub notice_period_days: Option<i32>,
  pub effective_at: Option<String>,
  pub expires_at: Option<String>,
  pub notes: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = contracts)]
#[diesel(treat_none_as_null = true)]
pub struct NewContractRow {
  pub id: String,
  pub contract_type: String,
  pub status: String,
  pub label_share_percent: Option<f64>,
  pub licensor_pool_percent: Option<f64>,
  pub territory: Option<String>,
  pub term_type: Option<String>,
  pub term_value_years: Option<i32>,
  pub auto_renew_interval_years: Option<i32>,
  pub notice_period_days: Option<i32>,
  pub effective_at: Option<String>,
  pub expires_at: Option<String>,
  pub notes: Option<String>,
}

impl TryFrom<&Contract> for NewContractRow {
  type Error = RepoError;

  fn try_from(c: &Contract) -> Result<Self, Self::Error> {
    let term = &c.term;
    Ok(NewContractRow {
      id: c.id.to_string(),
      contract_type: c.contract_type.as_str().to_string(),
      status: c.status.as_str().to_string(),
      label_share_percent: c.label_share_percent,
      licensor_pool_percent: c.licensor_pool_percent,
      territory: c.territory.clone(),
      term_type: term.term_type.map(|t| t.as_str().to_string()),
      term_value_years: signed_opt("contracts.term_value_years", term.term_value_years)?,
      auto_renew_interval_years: signed_opt("contracts.auto_renew_interval_years", term.auto_renew_interval_years)?,
      notice_period_days: signed_opt("contracts.notice_period_days", term.notice_period_days)?,
      effective_at: format_date(term.effective_at),
      expires_at: format_date(term.expires_at),
      notes: c.notes.clone(),
    })
  }
}

impl TryFrom<ContractRow> for Contract {
  type Error = RepoError;

  fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
    let term = ContractTerm {
      term_type: parse_opt("contracts.term_type", row.term_type.as_deref())?,
      term_value_years: unsigned_opt("contracts.term_value_years", row.term_value_years)?,
      auto_renew_interval_years: unsigned_opt("contracts.auto_renew_interval_years", row.auto_renew_interval_years)?,
      notice_period_days: unsigned_opt("contracts.notice_period_days", row.notice_period_days)?,
      effective_at: parse_date("contracts.effective_at", row.effective_at.as_deref())?,
      expires_at: parse_date("contracts.expires_at", row.expires_at.as_deref())?,
    };

    Ok(Contract {
      id: parse("contracts.id", &row.id)?,
      contract_type: parse("contracts.contract_type", &row.contract_type)?,
      status: parse("contracts.status", &row.status)?,
      label_share_percent: row.label_share_percent,
      licensor_pool_percent: row.licensor_pool_percent,
      territory: row.territory,
      term,
      notes: row.notes,
    })
  }
}

// -------- contract signatories --------

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = contract_signatories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContractSignatoryRow {
  pub contract_id: String,
  pub contact_id: String,
}

impl ContractSignatoryRow {
  pub fn new(contract: ContractId, contact: ContactId) -> Self {
    ContractSignatoryRow { contract_id: contract.to_string(), contact_id: contact.to_string() }
  }
}

impl TryFrom<ContractSignatoryRow> for ContactId {
  type Error = RepoError;

  fn try_from(row: ContractSignatoryRow) -> Result<Self, Self::Error> {
    parse("contract_signatories.contact_id", &row.contact_id)
  }
}

// -------- contacts / artist profiles --------

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = contacts)]
#[diesel(treat_none_as_null = true)]
pub struct ContactRow {
  pub id: String,
  pub full_legal_name: String,
  pub email: String,
  pub company_name: Option<String>,
}

impl From<&Contact> for ContactRow {
  fn from(c: &Contact) -> Self {
    ContactRow {
      id: c.id.to_string(),
      full_legal_name: c.full_legal_name.clone(),
      email: c.email.clone(),
      company_name: c.company_name.clone(),
    }
  }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = artist_profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistProfileRow {
  pub id: String,
  pub artist_name: String,
}

impl From<&ArtistProfile> for ArtistProfileRow {
  fn from(a: &ArtistProfile) -> Self {
    ArtistProfileRow { id: a.id.to_string(), artist_name: a.artist_name.clone() }
  }
}

impl TryFrom<ArtistProfileRow> for ArtistProfile {
  type Error = RepoError;

  fn try_from(row: ArtistProfileRow) -> Result<Self, Self::Error> {
    Ok(ArtistProfile { id: parse("artist_profiles.id", &row.id)?, artist_name: row.artist_name })
  }
}

// -------- licensor shares --------

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = licensor_shares)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ShareRow {
  pub id: String,
  pub track_id: String,
  pub contact_id: String,
  pub share_percent: f64,
  pub role_context: String,
  pub role_context_custom: Option<String>,
  pub notes: Option<String>,
}

impl From<&LicensorShare> for ShareRow {
  fn from(s: &LicensorShare) -> Self {
    ShareRow {
      id: s.id.to_string(),
      track_id: s.track_id.to_string(),
      contact_id: s.contact_id.to_string(),
      share_percent: s.share_percent,
      role_context: s.role_context.as_str().to_string(),
      role_context_custom: s.role_context_custom.clone(),
      notes: s.notes.clone(),
    }
  }
}

impl TryFrom<ShareRow> for LicensorShare {
  type Error = RepoError;

  fn try_from(row: ShareRow) -> Result<Self, Self::Error> {
    Ok(LicensorShare {
      id: parse("licensor_shares.id", &row.id)?,
      track_id: parse("licensor_shares.track_id", &row.track_id)?,
      contact_id: parse("licensor_shares.contact_id", &row.contact_id)?,
      share_percent: row.share_percent,
      role_context: parse("licensor_shares.role_context", &row.role_context)?,
      role_context_custom: row.role_context_custom,
      notes: row.notes,
    })
  }
}

// -------- credits --------

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = release_main_artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReleaseMainArtistRow {
  pub release_id: String,
  pub artist_profile_id: String,
  pub position: i32,
}

impl From<&ReleaseMainArtist> for ReleaseMainArtistRow {
  fn from(r: &ReleaseMainArtist) -> Self {
    ReleaseMainArtistRow {
      release_id: r.release_id.to_string(),
      artist_profile_id: r.artist_id.to_string(),
      position: r.position,
    }
  }
}

impl TryFrom<ReleaseMainArtistRow> for ReleaseMainArtist {
  type Error = RepoError;

  fn try_from(row: ReleaseMainArtistRow) -> Result<Self, Self::Error> {
    Ok(ReleaseMainArtist {
      release_id: parse("release_main_artists.release_id", &row.release_id)?,
      artist_id: parse("release_main_artists.artist_profile_id", &row.artist_profile_id)?,
      position: row.position,
    })
  }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = release_contributors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReleaseContributorRow {
  pub id: String,
  pub release_id: String,
  pub artist_profile_id: String,
  pub role: String,
  pub role_custom: Option<String>,
}

impl From<&ReleaseContributor> for ReleaseContributorRow {
  fn from(r: &ReleaseContributor) -> Self {
    ReleaseContributorRow {
      id: r.id.to_string(),
      release_id: r.release_id.to_string(),
      artist_profile_id: r.artist_id.to_string(),
      role: r.role.as_str().to_string(),
      role_custom: r.role_custom.clone(),
    }
  }
}

impl TryFrom<ReleaseContributorRow> for ReleaseContributor {
  type Error = RepoError;

  fn try_from(row: ReleaseContributorRow) -> Result<Self, Self::Error> {
    Ok(ReleaseContributor {
      id: parse("release_contributors.id", &row.id)?,
      release_id: parse("release_contributors.release_id", &row.release_id)?,
      artist_id: parse("release_contributors.artist_profile_id", &row.artist_profile_id)?,
      role: parse("release_contributors.role", &row.role)?,
      role_custom: row.role_custom,
    })
  }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = track_main_artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackMainArtistRow {
  pub track_id: String,
  pub artist_profile_id: String,
  pub position: i32,
  pub inherited_from_release: bool,
}

impl From<&TrackMainArtist> for TrackMainArtistRow {
  fn from(r: &TrackMainArtist) -> Self {
    TrackMainArtistRow {
      track_id: r.track_id.to_string(),
      artist_profile_id: r.artist_id.to_string(),
      position: r.position,
      inherited_from_release: r.inherited_from_release,
    }
  }
}

impl TryFrom<TrackMainArtistRow> for TrackMainArtist {
  type Error = RepoError;

  fn try_from(row: TrackMainArtistRow) -> Result<Self, Self::Error> {
    Ok(TrackMainArtist {
      track_id: parse("track_main_artists.track_id", &row.track_id)?,
      artist_id: parse("track_main_artists.artist_profile_id", &row.artist_profile_id)?,
      position: row.position,
      inherited_from_release: row.inherited_from_release,
    })
  }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = track_contributors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackContributorRow {
  pub id: String,
  pub track_id: String,
  pub artist_profile_id: String,
  pub role: String,
  pub role_custom: Option<String>,
  pub inherited_from_release: bool,
}

impl From<&TrackContributor> for TrackContributorRow {
  fn from(r: &TrackContributor) -> Self {
    TrackContributorRow {
      id: r.id.to_string(),
      track_id: r.track_id.to_string(),
      artist_profile_id: r.artist_id.to_string(),
      role: r.role.as_str().to_string(),
      role_custom: r.role_custom.clone(),
      inherited_from_release: r.inherited_from_release,
    }
  }
}

impl TryFrom<TrackContributorRow> for TrackContributor {
  type Error = RepoError;

  fn try_from(row: TrackContributorRow) -> Result<Self, Self::Error> {
    Ok(TrackContributor {
      id: parse("track_contributors.id", &row.id)?,
      track_id: parse("track_contributors.track_id", &row.track_id)?,
      artist_id: parse("track_contributors.artist_profile_id", &row.artist_profile_id)?,
      role: parse("track_contributors.role", &row.role)?,
      role_custom: row.role_custom,
      inherited_from_release: row.inherited_from_release,
    })
  }
}

/// Convierte un lote de filas, fallando en la primera corrupta.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepoError>
where
  T: TryFrom<R, Error = RepoError>,
{
  rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use cuota_core::domain::{ReleaseStatus, ReleaseType};

  #[test]
  fn release_round_trips_through_row() {
    let mut release = Release::new("Echoes", ReleaseType::EP, "CUO-001");
    release.release_date = NaiveDate::from_ymd_opt(2025, 3, 14);
    release.status = ReleaseStatus::ReadyForDelivery;

    let row = NewReleaseRow::from(&release);
    assert_eq!(row.status, "ready_for_delivery");
    assert_eq!(row.release_date.as_deref(), Some("2025-03-14"));

    let back = Release::try_from(ReleaseRow {
      id: row.id,
      title: row.title,
      version: row.version,
      release_type: row.release_type,
      catalog_id: row.catalog_id,
      upc: row.upc,
      release_date: row.release_date,
      status: row.status,
    })
    .unwrap();
    assert_eq!(back, release);
  }

  #[test]
  fn unknown_labels_are_corrupt_rows() {
    let row = ReleaseRow {
      id: cuota_core::domain::ReleaseId::new().to_string(),
      title: "x".into(),
      version: None,
      release_type: "Mixtape".into(),
      catalog_id: "CUO-X".into(),
      upc: None,
      release_date: None,
      status: "planning".into(),
    };
    assert!(matches!(Release::try_from(row), Err(RepoError::Corrupt(_))));
  }

  #[test]
  fn negative_position_is_corrupt() {
    let row = TrackRow {
      id: cuota_core::domain::TrackId::new().to_string(),
      release_id: cuota_core::domain::ReleaseId::new().to_string(),
      title: "x".into(),
      version: None,
      duration_ms: None,
      isrc: None,
      position: -1,
    };
    assert!(matches!(Track::try_from(row), Err(RepoError::Corrupt(_))));
  }
}
