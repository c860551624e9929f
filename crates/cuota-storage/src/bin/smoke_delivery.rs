use cuota_core::domain::{Contact, Contract, ContractType, NewShare, ReleaseStatus, ReleaseType, ShareRoleContext};
use cuota_core::ports::CatalogRepository;
use cuota_core::services::{CatalogService, NewRelease};
use cuota_storage::{CatalogStore, StorageConfig, load_split_settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cuota=info".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  // DATABASE_URL apunta a un fichero; sin ella todo queda en memoria.
  let store = match std::env::var("DATABASE_URL") {
    Ok(url) => CatalogStore::open(&url, &StorageConfig::load()?)?,
    Err(_) => CatalogStore::open_in_memory()?,
  };
  let svc = CatalogService::new(&store, load_split_settings()?);

  let release = svc.create_release(NewRelease {
    title: "Smoke Test".to_string(),
    release_type: ReleaseType::Single,
    catalog_id: format!("SMOKE-{}", chrono::Utc::now().timestamp()),
    release_date: None,
    artist_ids: vec![],
  })?;

  let (a, b) = (Contact::new("Ada Lovelace", "ada@example.com"), Contact::new("Alan Turing", "alan@example.com"));
  store.save_contact(&a)?;
  store.save_contact(&b)?;

  let contract = svc.save_contract(&Contract::new(ContractType::ReleaseSchedule, 20.0, 80.0), &[a.id, b.id])?;
  svc.link_contract(contract.id, release.id)?;

  let track = store.tracks_for_release(release.id)?.into_iter().next().ok_or("single without its default track")?;

  svc.replace_shares(
    track.id,
    vec![
      NewShare::new(a.id, 57.0, ShareRoleContext::MainArtist),
      NewShare::new(b.id, 40.0, ShareRoleContext::Producer),
    ],
  )?;
  let outcome = svc.change_status(release.id, ReleaseStatus::Delivered)?;
  println!("with 97%: {outcome:?}");

  svc.replace_shares(
    track.id,
    vec![
      NewShare::new(a.id, 60.0, ShareRoleContext::MainArtist),
      NewShare::new(b.id, 40.0, ShareRoleContext::Producer),
    ],
  )?;
  let outcome = svc.change_status(release.id, ReleaseStatus::Delivered)?;
  println!("with 100%: {outcome:?}");

  for row in svc.validation().share_breakdown(track.id)? {
    println!("  {} -> {:.2}% of total", row.share.contact_id, row.effective_rate);
  }

  Ok(())
}
