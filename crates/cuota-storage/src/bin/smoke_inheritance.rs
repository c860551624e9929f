use cuota_core::domain::{ArtistProfile, CreditRole, ReleaseType};
use cuota_core::ports::{CatalogRepository, CreditRepository};
use cuota_core::services::{CatalogService, NewRelease, Propagation};
use cuota_storage::{CatalogStore, load_split_settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cuota=debug".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let store = CatalogStore::open_in_memory()?;
  let svc = CatalogService::new(&store, load_split_settings()?);

  let naarly = ArtistProfile::new("Naarly");
  let oova = ArtistProfile::new("OOVA");
  store.save_artist_profile(&naarly)?;
  store.save_artist_profile(&oova)?;

  let release = svc.create_release(NewRelease {
    title: "Tides".to_string(),
    release_type: ReleaseType::EP,
    catalog_id: "SMOKE-EP-1".to_string(),
    release_date: None,
    artist_ids: vec![naarly.id],
  })?;
  let tracks = (0..3).map(|_| svc.create_track(release.id)).collect::<Result<Vec<_>, _>>()?;

  // Crédito manual en la primera pista: la propagación no debe tocarlo.
  svc.add_track_main_artist(tracks[0].id, oova.id)?;

  let report = svc.inheritance().apply_release_credits(release.id)?;
  println!("apply_release_credits: {:?}", report.inserted());

  let report = svc.add_release_main_artist(release.id, oova.id, Propagation::ApplyToTracks)?;
  println!("add OOVA to release: {:?}", report.map(|r| r.inserted()));

  let (_, report) = svc.add_release_contributor(release.id, oova.id, CreditRole::Producer, Propagation::ApplyToTracks)?;
  println!("add producer: {:?}", report.map(|r| r.inserted()));

  for track in &tracks {
    println!("{} -> {}", track.display_title(), svc.track_artist_line(track.id)?);
  }

  let removed = svc.remove_release_main_artist(release.id, oova.id, Propagation::ApplyToTracks)?;
  println!("removed {removed} inherited rows");

  for track in &tracks {
    let rows = store.track_main_artists(track.id)?;
    let manual = rows.iter().any(|r| !r.inherited_from_release);
    println!("{} -> {} main artists, manual: {manual}", track.title, rows.len());
  }

  Ok(())
}
