use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tracing::info;

use cuota_core::domain::{LicensorShare, NewShare, ReleaseId, TrackId};
use cuota_core::ports::{RepoError, ShareRepository};

use crate::catalog::linked_contracts;
use crate::models::{ShareRow, convert_all};
use crate::{CatalogStore, map_db};

impl ShareRepository for CatalogStore {
  fn shares_for_track(&self, track: TrackId) -> Result<Vec<LicensorShare>, RepoError> {
    use crate::schema::licensor_shares::dsl::*;

    let mut conn = self.conn()?;
    let rows = licensor_shares
      .filter(track_id.eq(track.to_string()))
      .order(sql::<BigInt>("rowid"))
      .select(ShareRow::as_select())
      .load::<ShareRow>(&mut *conn)
      .map_err(map_db)?;

    convert_all(rows)
  }

  /// Borra y reinserta en una sola transacción: otro lector ve el reparto
  /// anterior completo o el nuevo completo.
  fn replace_shares_for_track(&self, track: TrackId, shares: &[NewShare]) -> Result<(), RepoError> {
    use crate::schema::licensor_shares::dsl::*;

    let rows: Vec<ShareRow> = shares.iter().cloned().map(|s| ShareRow::from(&s.into_share(track))).collect();
    let key = track.to_string();
    let mut conn = self.conn()?;

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(licensor_shares.filter(track_id.eq(&key))).execute(conn)?;
        if !rows.is_empty() {
          diesel::insert_into(licensor_shares).values(&rows).execute(conn)?;
        }
        Ok(())
      })
      .map_err(map_db)?;

    info!(track_id = %track, rows = rows.len(), "licensor shares replaced");
    Ok(())
  }

  fn pool_percent_for_track(&self, track: TrackId) -> Result<Option<f64>, RepoError> {
    use crate::schema::tracks::dsl::*;

    let mut conn = self.conn()?;
    let release = tracks
      .filter(id.eq(track.to_string()))
      .select(release_id)
      .first::<String>(&mut *conn)
      .optional()
      .map_err(map_db)?;

    let Some(release) = release else {
      return Ok(None);
    };
    let release: ReleaseId =
      release.parse().map_err(|e| RepoError::Corrupt(format!("tracks.release_id = {release:?}: {e}")))?;

    Ok(linked_contracts(&mut conn, release)?.first().and_then(|c| c.licensor_pool_percent))
  }
}
