use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tracing::{debug, info};

use cuota_core::domain::{
  ArtistId, ArtistProfile, Contact, ContactId, Contract, ContractId, Release, ReleaseId, ReleaseMainArtist,
  ReleaseStatus, Track, TrackId,
};
use cuota_core::ports::{CatalogRepository, RepoError};

use crate::models::{
  ArtistProfileRow, ContactRow, ContractRow, ContractSignatoryRow, NewContractRow, NewReleaseRow, NewTrackRow,
  ReleaseChangeset, ReleaseMainArtistRow, ReleaseRow, TrackRow, convert_all,
};
use crate::{CatalogStore, map_db};

fn now() -> String {
  chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Contratos de un release, del vínculo más antiguo al más reciente.
pub(crate) fn linked_contracts(conn: &mut SqliteConnection, release: ReleaseId) -> Result<Vec<Contract>, RepoError> {
  use crate::schema::{contract_releases, contracts};

  let rows = contracts::table
    .inner_join(contract_releases::table)
    .filter(contract_releases::release_id.eq(release.to_string()))
    .order(sql::<BigInt>("contract_releases.rowid"))
    .select(ContractRow::as_select())
    .load::<ContractRow>(conn)
    .map_err(map_db)?;

  convert_all(rows)
}

impl CatalogRepository for CatalogStore {
  fn save_release(&self, release: &Release) -> Result<(), RepoError> {
    use crate::schema::releases::dsl::*;

    let row = NewReleaseRow::from(release);
    let changes = ReleaseChangeset::from(release);
    let mut conn = self.conn()?;

    diesel::insert_into(releases)
      .values(&row)
      .on_conflict(id)
      .do_update()
      .set((&changes, updated_at.eq(now())))
      .execute(&mut *conn)
      .map_err(map_db)?;

    debug!(release_id = %release.id, "release saved");
    Ok(())
  }

  fn create_release(
    &self,
    release: &Release,
    main_artists: &[ReleaseMainArtist],
    initial_tracks: &[Track],
  ) -> Result<(), RepoError> {
    use crate::schema::{release_main_artists, releases, tracks};

    let release_row = NewReleaseRow::from(release);
    let artist_rows: Vec<ReleaseMainArtistRow> = main_artists.iter().map(ReleaseMainArtistRow::from).collect();
    let track_rows = initial_tracks.iter().map(NewTrackRow::try_from).collect::<Result<Vec<_>, _>>()?;
    let mut conn = self.conn()?;

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(releases::table).values(&release_row).execute(conn)?;
        if !artist_rows.is_empty() {
          diesel::insert_into(release_main_artists::table).values(&artist_rows).execute(conn)?;
        }
        if !track_rows.is_empty() {
          diesel::insert_into(tracks::table).values(&track_rows).execute(conn)?;
        }
        Ok(())
      })
      .map_err(map_db)?;

    debug!(release_id = %release.id, artists = main_artists.len(), tracks = initial_tracks.len(), "release inserted");
    Ok(())
  }

  fn find_release(&self, release_id: ReleaseId) -> Result<Option<Release>, RepoError> {
    use crate::schema::releases::dsl::*;

    let mut conn = self.conn()?;
    let row = releases
      .filter(id.eq(release_id.to_string()))
      .select(ReleaseRow::as_select())
      .first::<ReleaseRow>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    row.map(Release::try_from).transpose()
  }

  fn list_releases(&self) -> Result<Vec<Release>, RepoError> {
    use crate::schema::releases::dsl::*;

    let mut conn = self.conn()?;
    let rows = releases
      .order((created_at.asc(), catalog_id.asc()))
      .select(ReleaseRow::as_select())
      .load::<ReleaseRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn set_release_status(&self, release_id: ReleaseId, new_status: ReleaseStatus) -> Result<(), RepoError> {
    use crate::schema::releases::dsl::*;

    let mut conn = self.conn()?;
    let updated = diesel::update(releases.filter(id.eq(release_id.to_string())))
      .set((status.eq(new_status.as_str()), updated_at.eq(now())))
      .execute(&mut *conn)
      .map_err(map_db)?;

    if updated == 0 {
      return Err(RepoError::NotFound);
    }
    Ok(())
  }

  fn save_track(&self, track: &Track) -> Result<(), RepoError> {
    use crate::schema::tracks::dsl::*;

    let row = NewTrackRow::try_from(track)?;
    let mut conn = self.conn()?;

    diesel::insert_into(tracks)
      .values(&row)
      .on_conflict(id)
      .do_update()
      .set(&row)
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn find_track(&self, track_id: TrackId) -> Result<Option<Track>, RepoError> {
    use crate::schema::tracks::dsl::*;

    let mut conn = self.conn()?;
    let row = tracks
      .filter(id.eq(track_id.to_string()))
      .select(TrackRow::as_select())
      .first::<TrackRow>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    row.map(Track::try_from).transpose()
  }

  fn delete_track(&self, track_id: TrackId) -> Result<(), RepoError> {
    use crate::schema::tracks::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(tracks.filter(id.eq(track_id.to_string()))).execute(&mut *conn).map_err(map_db)?;
    Ok(())
  }

  fn tracks_for_release(&self, release: ReleaseId) -> Result<Vec<Track>, RepoError> {
    use crate::schema::tracks::dsl::*;

    let mut conn = self.conn()?;
    let rows = tracks
      .filter(release_id.eq(release.to_string()))
      .order((position.asc(), created_at.asc()))
      .select(TrackRow::as_select())
      .load::<TrackRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn reorder_tracks(&self, release: ReleaseId, ordered: &[TrackId]) -> Result<(), RepoError> {
    use crate::schema::tracks::dsl::*;

    let release_key = release.to_string();
    let mut conn = self.conn()?;

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        for (pos, track_id) in ordered.iter().enumerate() {
          diesel::update(tracks.filter(id.eq(track_id.to_string())).filter(release_id.eq(&release_key)))
            .set(position.eq(pos as i32))
            .execute(conn)?;
        }
        Ok(())
      })
      .map_err(map_db)?;

    info!(release_id = %release, tracks = ordered.len(), "tracks reordered");
    Ok(())
  }

  fn save_contract(&self, contract: &Contract, signatories: &[ContactId]) -> Result<(), RepoError> {
    use crate::schema::{contract_signatories, contracts};

    let row = NewContractRow::try_from(contract)?;
    let contract_key = contract.id.to_string();
    let signatory_rows: Vec<ContractSignatoryRow> =
      signatories.iter().map(|contact| ContractSignatoryRow::new(contract.id, *contact)).collect();
    let mut conn = self.conn()?;

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(contracts::table)
          .values(&row)
          .on_conflict(contracts::id)
          .do_update()
          .set(&row)
          .execute(conn)?;

        diesel::delete(contract_signatories::table.filter(contract_signatories::contract_id.eq(&contract_key)))
          .execute(conn)?;
        if !signatory_rows.is_empty() {
          diesel::insert_into(contract_signatories::table).values(&signatory_rows).execute(conn)?;
        }
        Ok(())
      })
      .map_err(map_db)?;

    Ok(())
  }

  fn find_contract(&self, contract_id: ContractId) -> Result<Option<Contract>, RepoError> {
    use crate::schema::contracts::dsl::*;

    let mut conn = self.conn()?;
    let row = contracts
      .filter(id.eq(contract_id.to_string()))
      .select(ContractRow::as_select())
      .first::<ContractRow>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    row.map(Contract::try_from).transpose()
  }

  fn contract_signatories(&self, contract: ContractId) -> Result<Vec<ContactId>, RepoError> {
    use crate::schema::contract_signatories::dsl::*;

    let mut conn = self.conn()?;
    let rows = contract_signatories
      .filter(contract_id.eq(contract.to_string()))
      .order(sql::<BigInt>("rowid"))
      .select(ContractSignatoryRow::as_select())
      .load::<ContractSignatoryRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn link_contract(&self, contract: ContractId, release: ReleaseId) -> Result<(), RepoError> {
    use crate::schema::contract_releases::dsl::*;

    let mut conn = self.conn()?;
    diesel::insert_into(contract_releases)
      .values((contract_id.eq(contract.to_string()), release_id.eq(release.to_string()), linked_at.eq(now())))
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn unlink_contract(&self, contract: ContractId, release: ReleaseId) -> Result<(), RepoError> {
    use crate::schema::contract_releases::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(
      contract_releases.filter(contract_id.eq(contract.to_string())).filter(release_id.eq(release.to_string())),
    )
    .execute(&mut *conn)
    .map_err(map_db)?;

    Ok(())
  }

  fn contracts_for_release(&self, release: ReleaseId) -> Result<Vec<Contract>, RepoError> {
    let mut conn = self.conn()?;
    linked_contracts(&mut conn, release)
  }

  fn save_contact(&self, contact: &Contact) -> Result<(), RepoError> {
    use crate::schema::contacts::dsl::*;

    let row = ContactRow::from(contact);
    let mut conn = self.conn()?;

    diesel::insert_into(contacts)
      .values(&row)
      .on_conflict(id)
      .do_update()
      .set(&row)
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn save_artist_profile(&self, profile: &ArtistProfile) -> Result<(), RepoError> {
    use crate::schema::artist_profiles::dsl::*;

    let row = ArtistProfileRow::from(profile);
    let mut conn = self.conn()?;

    diesel::insert_into(artist_profiles)
      .values(&row)
      .on_conflict(id)
      .do_update()
      .set(artist_name.eq(&row.artist_name))
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn artist_profiles(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, RepoError> {
    use crate::schema::artist_profiles::dsl::*;

    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
    let mut conn = self.conn()?;
    let rows = artist_profiles
      .filter(id.eq_any(keys))
      .select(ArtistProfileRow::as_select())
      .load::<ArtistProfileRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }
}
