use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tracing::{debug, info};

use cuota_core::domain::{
  ArtistId, ContributorId, CreditCounts, CreditRole, ReleaseContributor, ReleaseId, ReleaseMainArtist, TrackContributor,
  TrackCreditBatch, TrackId, TrackMainArtist,
};
use cuota_core::ports::{CreditRepository, RepoError};

use crate::models::{
  ReleaseContributorRow, ReleaseMainArtistRow, TrackContributorRow, TrackMainArtistRow, convert_all,
};
use crate::{CatalogStore, map_db};

fn keys<T: ToString>(ids: &[T]) -> Vec<String> {
  ids.iter().map(ToString::to_string).collect()
}

impl CreditRepository for CatalogStore {
  fn release_main_artists(&self, release: ReleaseId) -> Result<Vec<ReleaseMainArtist>, RepoError> {
    use crate::schema::release_main_artists::dsl::*;

    let mut conn = self.conn()?;
    let rows = release_main_artists
      .filter(release_id.eq(release.to_string()))
      .order(position.asc())
      .select(ReleaseMainArtistRow::as_select())
      .load::<ReleaseMainArtistRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn insert_release_main_artist(&self, row: &ReleaseMainArtist) -> Result<(), RepoError> {
    use crate::schema::release_main_artists::dsl::*;

    let mut conn = self.conn()?;
    diesel::insert_into(release_main_artists)
      .values(ReleaseMainArtistRow::from(row))
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn delete_release_main_artist(&self, release: ReleaseId, artist: ArtistId) -> Result<(), RepoError> {
    use crate::schema::release_main_artists::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(
      release_main_artists.filter(release_id.eq(release.to_string())).filter(artist_profile_id.eq(artist.to_string())),
    )
    .execute(&mut *conn)
    .map_err(map_db)?;

    Ok(())
  }

  fn replace_release_main_artists(&self, release: ReleaseId, ordered: &[ArtistId]) -> Result<(), RepoError> {
    use crate::schema::release_main_artists::dsl::*;

    let key = release.to_string();
    let rows: Vec<ReleaseMainArtistRow> = ordered
      .iter()
      .enumerate()
      .map(|(idx, &artist_id)| {
        ReleaseMainArtistRow::from(&ReleaseMainArtist { release_id: release, artist_id, position: idx as i32 + 1 })
      })
      .collect();
    let mut conn = self.conn()?;

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(release_main_artists.filter(release_id.eq(&key))).execute(conn)?;
        if !rows.is_empty() {
          diesel::insert_into(release_main_artists).values(&rows).execute(conn)?;
        }
        Ok(())
      })
      .map_err(map_db)?;

    info!(release_id = %release, artists = rows.len(), "release main artists replaced");
    Ok(())
  }

  fn release_contributors(&self, release: ReleaseId) -> Result<Vec<ReleaseContributor>, RepoError> {
    use crate::schema::release_contributors::dsl::*;

    let mut conn = self.conn()?;
    let rows = release_contributors
      .filter(release_id.eq(release.to_string()))
      .order(sql::<BigInt>("rowid"))
      .select(ReleaseContributorRow::as_select())
      .load::<ReleaseContributorRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn upsert_release_contributor(&self, row: &ReleaseContributor) -> Result<ReleaseContributor, RepoError> {
    use crate::schema::release_contributors::dsl::*;

    let new_row = ReleaseContributorRow::from(row);
    let mut conn = self.conn()?;

    let saved = diesel::insert_into(release_contributors)
      .values(&new_row)
      .on_conflict((release_id, artist_profile_id))
      .do_update()
      .set((role.eq(&new_row.role), role_custom.eq(&new_row.role_custom)))
      .returning(ReleaseContributorRow::as_returning())
      .get_result::<ReleaseContributorRow>(&mut *conn)
      .map_err(map_db)?;

    ReleaseContributor::try_from(saved)
  }

  fn delete_release_contributor(&self, contributor: ContributorId) -> Result<Option<ReleaseContributor>, RepoError> {
    use crate::schema::release_contributors::dsl::*;

    let mut conn = self.conn()?;
    let removed = diesel::delete(release_contributors.filter(id.eq(contributor.to_string())))
      .returning(ReleaseContributorRow::as_returning())
      .get_result::<ReleaseContributorRow>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    removed.map(ReleaseContributor::try_from).transpose()
  }

  fn update_release_contributor_role(
    &self,
    contributor: ContributorId,
    new_role: CreditRole,
    new_role_custom: Option<String>,
  ) -> Result<Option<ReleaseContributor>, RepoError> {
    use crate::schema::release_contributors::dsl::*;

    let mut conn = self.conn()?;
    let updated = diesel::update(release_contributors.filter(id.eq(contributor.to_string())))
      .set((role.eq(new_role.as_str()), role_custom.eq(new_role_custom)))
      .returning(ReleaseContributorRow::as_returning())
      .get_result::<ReleaseContributorRow>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    updated.map(ReleaseContributor::try_from).transpose()
  }

  fn track_main_artists(&self, track: TrackId) -> Result<Vec<TrackMainArtist>, RepoError> {
    use crate::schema::track_main_artists::dsl::*;

    let mut conn = self.conn()?;
    let rows = track_main_artists
      .filter(track_id.eq(track.to_string()))
      .order(position.asc())
      .select(TrackMainArtistRow::as_select())
      .load::<TrackMainArtistRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  fn track_contributors(&self, track: TrackId) -> Result<Vec<TrackContributor>, RepoError> {
    use crate::schema::track_contributors::dsl::*;

    let mut conn = self.conn()?;
    let rows = track_contributors
      .filter(track_id.eq(track.to_string()))
      .order(sql::<BigInt>("rowid"))
      .select(TrackContributorRow::as_select())
      .load::<TrackContributorRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  /// Inserta el lote entero en una transacción. Las filas que ya existen
  /// (misma clave) se ignoran y no cuentan.
  fn insert_track_credits(&self, batch: &TrackCreditBatch) -> Result<CreditCounts, RepoError> {
    use crate::schema::{track_contributors, track_main_artists};

    if batch.is_empty() {
      return Ok(CreditCounts::default());
    }

    let main_rows: Vec<TrackMainArtistRow> = batch.main_artists.iter().map(TrackMainArtistRow::from).collect();
    let contrib_rows: Vec<TrackContributorRow> = batch.contributors.iter().map(TrackContributorRow::from).collect();
    let mut conn = self.conn()?;

    let counts = conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        let mut counts = CreditCounts::default();
        for row in &main_rows {
          counts.main_artists += diesel::insert_or_ignore_into(track_main_artists::table).values(row).execute(conn)?;
        }
        for row in &contrib_rows {
          counts.contributors += diesel::insert_or_ignore_into(track_contributors::table).values(row).execute(conn)?;
        }
        Ok(counts)
      })
      .map_err(map_db)?;

    info!(
      main_artists = counts.main_artists,
      contributors = counts.contributors,
      skipped = main_rows.len() + contrib_rows.len() - counts.total(),
      "inherited track credits inserted"
    );
    Ok(counts)
  }

  fn upsert_track_main_artist(&self, row: &TrackMainArtist) -> Result<(), RepoError> {
    use crate::schema::track_main_artists::dsl::*;

    let mut conn = self.conn()?;
    diesel::insert_into(track_main_artists)
      .values(TrackMainArtistRow::from(row))
      .on_conflict((track_id, artist_profile_id))
      .do_update()
      .set((position.eq(row.position), inherited_from_release.eq(row.inherited_from_release)))
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn upsert_track_contributor(&self, row: &TrackContributor) -> Result<(), RepoError> {
    use crate::schema::track_contributors::dsl::*;

    let new_row = TrackContributorRow::from(row);
    let mut conn = self.conn()?;

    diesel::insert_into(track_contributors)
      .values(&new_row)
      .on_conflict((track_id, artist_profile_id, role))
      .do_update()
      .set((role_custom.eq(&new_row.role_custom), inherited_from_release.eq(new_row.inherited_from_release)))
      .execute(&mut *conn)
      .map_err(map_db)?;

    Ok(())
  }

  fn delete_track_main_artist(&self, track: TrackId, artist: ArtistId) -> Result<(), RepoError> {
    use crate::schema::track_main_artists::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(
      track_main_artists.filter(track_id.eq(track.to_string())).filter(artist_profile_id.eq(artist.to_string())),
    )
    .execute(&mut *conn)
    .map_err(map_db)?;

    Ok(())
  }

  fn delete_track_contributor(&self, contributor: ContributorId) -> Result<(), RepoError> {
    use crate::schema::track_contributors::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(track_contributors.filter(id.eq(contributor.to_string()))).execute(&mut *conn).map_err(map_db)?;
    Ok(())
  }

  fn delete_inherited_track_main_artists(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError> {
    use crate::schema::track_main_artists::dsl::*;

    if track_ids.is_empty() || artist_ids.is_empty() {
      return Ok(0);
    }

    let mut conn = self.conn()?;
    let removed = diesel::delete(
      track_main_artists
        .filter(inherited_from_release.eq(true))
        .filter(track_id.eq_any(keys(track_ids)))
        .filter(artist_profile_id.eq_any(keys(artist_ids))),
    )
    .execute(&mut *conn)
    .map_err(map_db)?;

    debug!(removed, "inherited track main artists deleted");
    Ok(removed)
  }

  fn delete_inherited_track_contributors(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError> {
    use crate::schema::track_contributors::dsl::*;

    if track_ids.is_empty() || artist_ids.is_empty() {
      return Ok(0);
    }

    let mut conn = self.conn()?;
    let removed = diesel::delete(
      track_contributors
        .filter(inherited_from_release.eq(true))
        .filter(track_id.eq_any(keys(track_ids)))
        .filter(artist_profile_id.eq_any(keys(artist_ids))),
    )
    .execute(&mut *conn)
    .map_err(map_db)?;

    debug!(removed, "inherited track contributors deleted");
    Ok(removed)
  }
}
