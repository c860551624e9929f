mod common;

use common::{MemoryCatalog, counts_by_artist, seeded_release};
use cuota_core::CoreError;
use cuota_core::domain::{ArtistId, CreditAssignment, CreditKind, CreditRole, TrackMainArtist};
use cuota_core::ports::CreditRepository;
use cuota_core::services::{FanOutMode, InheritanceService};

#[test]
fn fan_out_twice_creates_one_row_per_track() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 3);
  let a = ArtistId::new();
  let svc = InheritanceService::new(&repo, FanOutMode::Atomic);

  let first = svc.fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(a)]).unwrap();
  assert_eq!(first.inserted().main_artists, 3);

  let second = svc.fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(a)]).unwrap();
  assert_eq!(second.inserted().total(), 0);

  for track in &tracks {
    let rows = repo.all_track_main(track.id);
    assert_eq!(counts_by_artist(&rows)[&a], 1);
    assert!(rows[0].inherited_from_release);
  }
}

#[test]
fn fan_out_appends_after_the_highest_position() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 1);
  let track = tracks[0].id;
  let manual = ArtistId::new();
  repo
    .upsert_track_main_artist(&TrackMainArtist {
      track_id: track,
      artist_id: manual,
      position: 4,
      inherited_from_release: false,
    })
    .unwrap();

  let (a, b) = (ArtistId::new(), ArtistId::new());
  InheritanceService::new(&repo, FanOutMode::Atomic)
    .fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(a), CreditAssignment::main_artist(b)])
    .unwrap();

  let mut rows = repo.all_track_main(track);
  rows.sort_by_key(|r| r.position);
  let order: Vec<(ArtistId, i32)> = rows.iter().map(|r| (r.artist_id, r.position)).collect();
  assert_eq!(order, vec![(manual, 4), (a, 5), (b, 6)]);
}

#[test]
fn manual_credit_wins_over_fan_out() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 2);
  let a = ArtistId::new();
  repo
    .upsert_track_main_artist(&TrackMainArtist {
      track_id: tracks[0].id,
      artist_id: a,
      position: 0,
      inherited_from_release: false,
    })
    .unwrap();

  let report = InheritanceService::new(&repo, FanOutMode::Atomic)
    .fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(a)])
    .unwrap();
  assert_eq!(report.tracks[0].inserted.main_artists, 0);
  assert_eq!(report.tracks[1].inserted.main_artists, 1);

  let rows = repo.all_track_main(tracks[0].id);
  assert_eq!(rows.len(), 1);
  assert!(!rows[0].inherited_from_release);
}

#[test]
fn retract_removes_only_inherited_rows() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 2);
  let a = ArtistId::new();
  let svc = InheritanceService::new(&repo, FanOutMode::Atomic);

  svc.fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(a)]).unwrap();
  // En la segunda pista el crédito pasa a ser manual.
  repo.delete_track_main_artist(tracks[1].id, a).unwrap();
  repo
    .upsert_track_main_artist(&TrackMainArtist {
      track_id: tracks[1].id,
      artist_id: a,
      position: 0,
      inherited_from_release: false,
    })
    .unwrap();

  let removed = svc.retract_inherited(release.id, CreditKind::MainArtist, &[a]).unwrap();
  assert_eq!(removed, 1);

  assert!(repo.all_track_main(tracks[0].id).is_empty());
  let kept = repo.all_track_main(tracks[1].id);
  assert_eq!(kept.len(), 1);
  assert!(!kept[0].inherited_from_release);
}

#[test]
fn contributors_are_keyed_by_role() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 1);
  let a = ArtistId::new();
  let svc = InheritanceService::new(&repo, FanOutMode::Atomic);

  svc.fan_out_to_tracks(release.id, &[CreditAssignment::contributor(a, CreditRole::Producer)]).unwrap();
  let report = svc
    .fan_out_to_tracks(
      release.id,
      &[CreditAssignment::contributor(a, CreditRole::Producer), CreditAssignment::contributor(a, CreditRole::Composer)],
    )
    .unwrap();
  assert_eq!(report.inserted().contributors, 1);

  let rows = repo.track_contributors(tracks[0].id).unwrap();
  assert_eq!(rows.len(), 2);
  assert!(rows.iter().all(|r| r.inherited_from_release));

  let removed = svc.retract_inherited(release.id, CreditKind::Contributor, &[a]).unwrap();
  assert_eq!(removed, 2);
  assert!(repo.track_contributors(tracks[0].id).unwrap().is_empty());
}

#[test]
fn retracting_main_artists_leaves_contributor_rows() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 1);
  let a = ArtistId::new();
  let svc = InheritanceService::new(&repo, FanOutMode::Atomic);

  svc
    .fan_out_to_tracks(
      release.id,
      &[CreditAssignment::main_artist(a), CreditAssignment::contributor(a, CreditRole::Remixer)],
    )
    .unwrap();
  svc.retract_inherited(release.id, CreditKind::MainArtist, &[a]).unwrap();

  assert!(repo.all_track_main(tracks[0].id).is_empty());
  assert_eq!(repo.track_contributors(tracks[0].id).unwrap().len(), 1);
}

#[test]
fn atomic_fan_out_is_all_or_nothing() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 3);
  *repo.poison_track.borrow_mut() = Some(tracks[1].id);

  let err = InheritanceService::new(&repo, FanOutMode::Atomic)
    .fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(ArtistId::new())])
    .unwrap_err();
  assert!(matches!(err, CoreError::Repository(_)));

  for track in &tracks {
    assert!(repo.all_track_main(track.id).is_empty());
  }
}

#[test]
fn per_track_fan_out_reports_partial_success() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 3);
  *repo.poison_track.borrow_mut() = Some(tracks[1].id);

  let report = InheritanceService::new(&repo, FanOutMode::PerTrack)
    .fan_out_to_tracks(release.id, &[CreditAssignment::main_artist(ArtistId::new())])
    .unwrap();

  assert!(!report.is_complete());
  assert_eq!(report.failed_tracks(), vec![tracks[1].id]);
  assert_eq!(report.inserted().main_artists, 2);
  assert_eq!(repo.all_track_main(tracks[0].id).len(), 1);
  assert!(repo.all_track_main(tracks[1].id).is_empty());
  assert_eq!(repo.all_track_main(tracks[2].id).len(), 1);
}

#[test]
fn empty_inputs_are_no_ops() {
  let repo = MemoryCatalog::new();
  let (release, _, _) = seeded_release(&repo, 2);
  let svc = InheritanceService::new(&repo, FanOutMode::Atomic);

  assert!(svc.fan_out_to_tracks(release.id, &[]).unwrap().tracks.is_empty());
  assert_eq!(svc.retract_inherited(release.id, CreditKind::MainArtist, &[]).unwrap(), 0);

  let (empty_release, _, _) = seeded_release(&repo, 0);
  let report = svc.fan_out_to_tracks(empty_release.id, &[CreditAssignment::main_artist(ArtistId::new())]).unwrap();
  assert!(report.tracks.is_empty());
}
