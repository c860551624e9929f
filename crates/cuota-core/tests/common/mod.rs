#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use cuota_core::domain::{
  ArtistId, ArtistProfile, Contact, ContactId, Contract, ContractId, ContributorId, CreditCounts, CreditRole,
  LicensorShare, NewShare, Release, ReleaseContributor, ReleaseId, ReleaseMainArtist, ReleaseStatus, Track,
  TrackContributor, TrackCreditBatch, TrackId, TrackMainArtist,
};
use cuota_core::ports::{CatalogRepository, CreditRepository, RepoError, ShareRepository};

#[derive(Default)]
struct State {
  releases: Vec<Release>,
  tracks: Vec<Track>,
  contracts: Vec<Contract>,
  links: Vec<(ContractId, ReleaseId)>,
  signatories: Vec<(ContractId, ContactId)>,
  contacts: Vec<Contact>,
  artists: Vec<ArtistProfile>,
  shares: Vec<LicensorShare>,
  release_main: Vec<ReleaseMainArtist>,
  release_contrib: Vec<ReleaseContributor>,
  track_main: Vec<TrackMainArtist>,
  track_contrib: Vec<TrackContributor>,
}

/// Implementación en memoria de los ports, con inyección de fallos.
#[derive(Default)]
pub struct MemoryCatalog {
  state: RefCell<State>,
  /// Cualquier lote de créditos que toque esta pista falla.
  pub poison_track: RefCell<Option<TrackId>>,
  /// La próxima llamada de lectura de reparto falla como si se cayera la conexión.
  pub fail_share_reads: RefCell<bool>,
}

impl MemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn status_of(&self, id: ReleaseId) -> ReleaseStatus {
    self.state.borrow().releases.iter().find(|r| r.id == id).map(|r| r.status).unwrap()
  }

  pub fn all_track_main(&self, track_id: TrackId) -> Vec<TrackMainArtist> {
    self.state.borrow().track_main.iter().filter(|r| r.track_id == track_id).cloned().collect()
  }
}

fn upsert<T, F: Fn(&T) -> bool>(rows: &mut Vec<T>, matches: F, row: T) {
  match rows.iter_mut().find(|r| matches(r)) {
    Some(slot) => *slot = row,
    None => rows.push(row),
  }
}

impl CatalogRepository for MemoryCatalog {
  fn save_release(&self, release: &Release) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    if s.releases.iter().any(|r| r.catalog_id == release.catalog_id && r.id != release.id) {
      return Err(RepoError::Constraint(format!("duplicate catalog id {}", release.catalog_id)));
    }
    match s.releases.iter_mut().find(|r| r.id == release.id) {
      // El estado no se reescribe en un upsert.
      Some(existing) => *existing = Release { status: existing.status, ..release.clone() },
      None => s.releases.push(release.clone()),
    }
    Ok(())
  }

  fn create_release(
    &self,
    release: &Release,
    main_artists: &[ReleaseMainArtist],
    tracks: &[Track],
  ) -> Result<(), RepoError> {
    {
      let s = self.state.borrow();
      if s.releases.iter().any(|r| r.id == release.id || r.catalog_id == release.catalog_id) {
        return Err(RepoError::Constraint(format!("duplicate release {}", release.catalog_id)));
      }
      let mut seen = HashSet::new();
      if !main_artists.iter().all(|a| seen.insert(a.artist_id)) {
        return Err(RepoError::Constraint("duplicate release main artist".into()));
      }
    }

    let mut s = self.state.borrow_mut();
    s.releases.push(release.clone());
    s.release_main.extend(main_artists.iter().cloned());
    s.tracks.extend(tracks.iter().cloned());
    Ok(())
  }

  fn find_release(&self, id: ReleaseId) -> Result<Option<Release>, RepoError> {
    Ok(self.state.borrow().releases.iter().find(|r| r.id == id).cloned())
  }

  fn list_releases(&self) -> Result<Vec<Release>, RepoError> {
    Ok(self.state.borrow().releases.clone())
  }

  fn set_release_status(&self, id: ReleaseId, status: ReleaseStatus) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    let release = s.releases.iter_mut().find(|r| r.id == id).ok_or(RepoError::NotFound)?;
    release.status = status;
    Ok(())
  }

  fn save_track(&self, track: &Track) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    if !s.releases.iter().any(|r| r.id == track.release_id) {
      return Err(RepoError::Constraint("track without release".into()));
    }
    upsert(&mut s.tracks, |t| t.id == track.id, track.clone());
    Ok(())
  }

  fn find_track(&self, id: TrackId) -> Result<Option<Track>, RepoError> {
    Ok(self.state.borrow().tracks.iter().find(|t| t.id == id).cloned())
  }

  fn delete_track(&self, id: TrackId) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    s.tracks.retain(|t| t.id != id);
    s.shares.retain(|x| x.track_id != id);
    s.track_main.retain(|x| x.track_id != id);
    s.track_contrib.retain(|x| x.track_id != id);
    Ok(())
  }

  fn tracks_for_release(&self, release_id: ReleaseId) -> Result<Vec<Track>, RepoError> {
    let mut tracks: Vec<Track> =
      self.state.borrow().tracks.iter().filter(|t| t.release_id == release_id).cloned().collect();
    tracks.sort_by_key(|t| t.position);
    Ok(tracks)
  }

  fn reorder_tracks(&self, release_id: ReleaseId, ordered: &[TrackId]) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    for (pos, id) in ordered.iter().enumerate() {
      if let Some(t) = s.tracks.iter_mut().find(|t| t.id == *id && t.release_id == release_id) {
        t.position = pos as u32;
      }
    }
    Ok(())
  }

  fn save_contract(&self, contract: &Contract, signatories: &[ContactId]) -> Result<(), RepoError> {
    contract.check_split().map_err(|e| RepoError::Constraint(e.to_string()))?;
    let mut s = self.state.borrow_mut();
    if !signatories.iter().all(|id| s.contacts.iter().any(|c| c.id == *id)) {
      return Err(RepoError::Constraint("unknown signatory".into()));
    }
    upsert(&mut s.contracts, |c| c.id == contract.id, contract.clone());
    s.signatories.retain(|(c, _)| *c != contract.id);
    s.signatories.extend(signatories.iter().map(|id| (contract.id, *id)));
    Ok(())
  }

  fn contract_signatories(&self, id: ContractId) -> Result<Vec<ContactId>, RepoError> {
    Ok(self.state.borrow().signatories.iter().filter(|(c, _)| *c == id).map(|(_, contact)| *contact).collect())
  }

  fn find_contract(&self, id: ContractId) -> Result<Option<Contract>, RepoError> {
    Ok(self.state.borrow().contracts.iter().find(|c| c.id == id).cloned())
  }

  fn link_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    if s.links.contains(&(contract_id, release_id)) {
      return Err(RepoError::Constraint("contract already linked".into()));
    }
    s.links.push((contract_id, release_id));
    Ok(())
  }

  fn unlink_contract(&self, contract_id: ContractId, release_id: ReleaseId) -> Result<(), RepoError> {
    self.state.borrow_mut().links.retain(|l| *l != (contract_id, release_id));
    Ok(())
  }

  fn contracts_for_release(&self, release_id: ReleaseId) -> Result<Vec<Contract>, RepoError> {
    let s = self.state.borrow();
    Ok(
      s.links
        .iter()
        .filter(|(_, r)| *r == release_id)
        .filter_map(|(c, _)| s.contracts.iter().find(|x| x.id == *c).cloned())
        .collect(),
    )
  }

  fn save_contact(&self, contact: &Contact) -> Result<(), RepoError> {
    upsert(&mut self.state.borrow_mut().contacts, |c| c.id == contact.id, contact.clone());
    Ok(())
  }

  fn save_artist_profile(&self, profile: &ArtistProfile) -> Result<(), RepoError> {
    upsert(&mut self.state.borrow_mut().artists, |a| a.id == profile.id, profile.clone());
    Ok(())
  }

  fn artist_profiles(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, RepoError> {
    Ok(self.state.borrow().artists.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
  }
}

impl ShareRepository for MemoryCatalog {
  fn shares_for_track(&self, track_id: TrackId) -> Result<Vec<LicensorShare>, RepoError> {
    if self.fail_share_reads.replace(false) {
      return Err(RepoError::Storage("connection reset".into()));
    }
    Ok(self.state.borrow().shares.iter().filter(|s| s.track_id == track_id).cloned().collect())
  }

  fn replace_shares_for_track(&self, track_id: TrackId, shares: &[NewShare]) -> Result<(), RepoError> {
    let mut contacts = HashSet::new();
    if !shares.iter().all(|s| contacts.insert(s.contact_id)) {
      return Err(RepoError::Constraint("duplicate contact in track shares".into()));
    }

    let mut s = self.state.borrow_mut();
    s.shares.retain(|x| x.track_id != track_id);
    s.shares.extend(shares.iter().cloned().map(|n| n.into_share(track_id)));
    Ok(())
  }

  fn pool_percent_for_track(&self, track_id: TrackId) -> Result<Option<f64>, RepoError> {
    let Some(track) = self.find_track(track_id)? else {
      return Ok(None);
    };
    Ok(self.contracts_for_release(track.release_id)?.first().and_then(|c| c.licensor_pool_percent))
  }
}

impl CreditRepository for MemoryCatalog {
  fn release_main_artists(&self, release_id: ReleaseId) -> Result<Vec<ReleaseMainArtist>, RepoError> {
    Ok(self.state.borrow().release_main.iter().filter(|r| r.release_id == release_id).cloned().collect())
  }

  fn insert_release_main_artist(&self, row: &ReleaseMainArtist) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    if s.release_main.iter().any(|r| r.release_id == row.release_id && r.artist_id == row.artist_id) {
      return Err(RepoError::Constraint("duplicate release main artist".into()));
    }
    s.release_main.push(row.clone());
    Ok(())
  }

  fn delete_release_main_artist(&self, release_id: ReleaseId, artist_id: ArtistId) -> Result<(), RepoError> {
    self.state.borrow_mut().release_main.retain(|r| !(r.release_id == release_id && r.artist_id == artist_id));
    Ok(())
  }

  fn replace_release_main_artists(&self, release_id: ReleaseId, ordered: &[ArtistId]) -> Result<(), RepoError> {
    let mut seen = HashSet::new();
    if !ordered.iter().all(|a| seen.insert(*a)) {
      return Err(RepoError::Constraint("duplicate release main artist".into()));
    }

    let mut s = self.state.borrow_mut();
    s.release_main.retain(|r| r.release_id != release_id);
    s.release_main.extend(
      ordered
        .iter()
        .enumerate()
        .map(|(idx, &artist_id)| ReleaseMainArtist { release_id, artist_id, position: idx as i32 + 1 }),
    );
    Ok(())
  }

  fn release_contributors(&self, release_id: ReleaseId) -> Result<Vec<ReleaseContributor>, RepoError> {
    Ok(self.state.borrow().release_contrib.iter().filter(|r| r.release_id == release_id).cloned().collect())
  }

  fn upsert_release_contributor(&self, row: &ReleaseContributor) -> Result<ReleaseContributor, RepoError> {
    let mut s = self.state.borrow_mut();
    if let Some(existing) =
      s.release_contrib.iter_mut().find(|r| r.release_id == row.release_id && r.artist_id == row.artist_id)
    {
      existing.role = row.role;
      existing.role_custom = row.role_custom.clone();
      return Ok(existing.clone());
    }
    s.release_contrib.push(row.clone());
    Ok(row.clone())
  }

  fn delete_release_contributor(&self, id: ContributorId) -> Result<Option<ReleaseContributor>, RepoError> {
    let mut s = self.state.borrow_mut();
    let removed = s.release_contrib.iter().find(|r| r.id == id).cloned();
    s.release_contrib.retain(|r| r.id != id);
    Ok(removed)
  }

  fn update_release_contributor_role(
    &self,
    id: ContributorId,
    role: CreditRole,
    role_custom: Option<String>,
  ) -> Result<Option<ReleaseContributor>, RepoError> {
    let mut s = self.state.borrow_mut();
    Ok(s.release_contrib.iter_mut().find(|r| r.id == id).map(|row| {
      row.role = role;
      row.role_custom = role_custom;
      row.clone()
    }))
  }

  fn track_main_artists(&self, track_id: TrackId) -> Result<Vec<TrackMainArtist>, RepoError> {
    Ok(self.all_track_main(track_id))
  }

  fn track_contributors(&self, track_id: TrackId) -> Result<Vec<TrackContributor>, RepoError> {
    Ok(self.state.borrow().track_contrib.iter().filter(|r| r.track_id == track_id).cloned().collect())
  }

  fn insert_track_credits(&self, batch: &TrackCreditBatch) -> Result<CreditCounts, RepoError> {
    if let Some(poison) = *self.poison_track.borrow() {
      let touches = batch.main_artists.iter().any(|r| r.track_id == poison)
        || batch.contributors.iter().any(|r| r.track_id == poison);
      if touches {
        return Err(RepoError::Storage(format!("write rejected for track {poison}")));
      }
    }

    let mut s = self.state.borrow_mut();
    let mut counts = CreditCounts::default();
    for row in &batch.main_artists {
      if !s.track_main.iter().any(|r| r.key() == row.key()) {
        s.track_main.push(row.clone());
        counts.main_artists += 1;
      }
    }
    for row in &batch.contributors {
      if !s.track_contrib.iter().any(|r| r.key() == row.key()) {
        s.track_contrib.push(row.clone());
        counts.contributors += 1;
      }
    }
    Ok(counts)
  }

  fn upsert_track_main_artist(&self, row: &TrackMainArtist) -> Result<(), RepoError> {
    upsert(&mut self.state.borrow_mut().track_main, |r| r.key() == row.key(), row.clone());
    Ok(())
  }

  fn upsert_track_contributor(&self, row: &TrackContributor) -> Result<(), RepoError> {
    let mut s = self.state.borrow_mut();
    match s.track_contrib.iter_mut().find(|r| r.key() == row.key()) {
      Some(existing) => {
        existing.role_custom = row.role_custom.clone();
        existing.inherited_from_release = row.inherited_from_release;
      }
      None => s.track_contrib.push(row.clone()),
    }
    Ok(())
  }

  fn delete_track_main_artist(&self, track_id: TrackId, artist_id: ArtistId) -> Result<(), RepoError> {
    self.state.borrow_mut().track_main.retain(|r| r.key() != (track_id, artist_id));
    Ok(())
  }

  fn delete_track_contributor(&self, id: ContributorId) -> Result<(), RepoError> {
    self.state.borrow_mut().track_contrib.retain(|r| r.id != id);
    Ok(())
  }

  fn delete_inherited_track_main_artists(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError> {
    let mut s = self.state.borrow_mut();
    let before = s.track_main.len();
    s.track_main.retain(|r| {
      !(r.inherited_from_release && track_ids.contains(&r.track_id) && artist_ids.contains(&r.artist_id))
    });
    Ok(before - s.track_main.len())
  }

  fn delete_inherited_track_contributors(
    &self,
    track_ids: &[TrackId],
    artist_ids: &[ArtistId],
  ) -> Result<usize, RepoError> {
    let mut s = self.state.borrow_mut();
    let before = s.track_contrib.len();
    s.track_contrib.retain(|r| {
      !(r.inherited_from_release && track_ids.contains(&r.track_id) && artist_ids.contains(&r.artist_id))
    });
    Ok(before - s.track_contrib.len())
  }
}

/// Release con `n` pistas y un contrato 20/80 vinculado.
pub fn seeded_release(repo: &MemoryCatalog, n: u32) -> (Release, Vec<Track>, Contract) {
  let release = Release::new("Echoes", cuota_core::domain::ReleaseType::EP, format!("CUO-{}", ReleaseId::new()));
  repo.save_release(&release).unwrap();

  let tracks: Vec<Track> = (0..n)
    .map(|i| {
      let t = Track::new(release.id, format!("Track {}", i + 1), i);
      repo.save_track(&t).unwrap();
      t
    })
    .collect();

  let contract = Contract::new(cuota_core::domain::ContractType::ReleaseSchedule, 20.0, 80.0);
  repo.save_contract(&contract, &[]).unwrap();
  repo.link_contract(contract.id, release.id).unwrap();

  (release, tracks, contract)
}

pub fn contacts(repo: &MemoryCatalog, n: usize) -> Vec<Contact> {
  (0..n)
    .map(|i| {
      let c = Contact::new(format!("Contact {i}"), format!("c{i}@example.com"));
      repo.save_contact(&c).unwrap();
      c
    })
    .collect()
}

pub fn counts_by_artist(rows: &[TrackMainArtist]) -> HashMap<ArtistId, usize> {
  let mut map = HashMap::new();
  for r in rows {
    *map.entry(r.artist_id).or_insert(0) += 1;
  }
  map
}
