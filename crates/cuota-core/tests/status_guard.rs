mod common;

use common::{MemoryCatalog, contacts, seeded_release};
use cuota_core::CoreError;
use cuota_core::domain::{NewShare, ReleaseId, ReleaseStatus, ShareRoleContext};
use cuota_core::ports::ShareRepository;
use cuota_core::services::{StatusGuard, TransitionOutcome};

#[test]
fn delivery_is_blocked_until_every_track_sums_to_100() {
  let repo = MemoryCatalog::new();
  let (release, tracks, _) = seeded_release(&repo, 2);
  let people = contacts(&repo, 2);
  let guard = StatusGuard::new(&repo);

  repo
    .replace_shares_for_track(tracks[0].id, &[NewShare::new(people[0].id, 100.0, ShareRoleContext::MainArtist)])
    .unwrap();
  repo
    .replace_shares_for_track(
      tracks[1].id,
      &[
        NewShare::new(people[0].id, 57.0, ShareRoleContext::MainArtist),
        NewShare::new(people[1].id, 40.0, ShareRoleContext::Producer),
      ],
    )
    .unwrap();

  let outcome = guard.transition(release.id, ReleaseStatus::Delivered).unwrap();
  assert!(!outcome.is_applied());
  assert_eq!(outcome.invalid_track_ids(), &[tracks[1].id]);
  assert_eq!(repo.status_of(release.id), ReleaseStatus::Planning);

  repo
    .replace_shares_for_track(
      tracks[1].id,
      &[
        NewShare::new(people[0].id, 60.0, ShareRoleContext::MainArtist),
        NewShare::new(people[1].id, 40.0, ShareRoleContext::Producer),
      ],
    )
    .unwrap();

  let outcome = guard.transition(release.id, ReleaseStatus::Delivered).unwrap();
  assert_eq!(outcome, TransitionOutcome::Applied { from: ReleaseStatus::Planning, to: ReleaseStatus::Delivered });
  assert_eq!(repo.status_of(release.id), ReleaseStatus::Delivered);
}

#[test]
fn released_is_guarded_too() {
  let repo = MemoryCatalog::new();
  let (release, _, _) = seeded_release(&repo, 1);

  let outcome = StatusGuard::new(&repo).transition(release.id, ReleaseStatus::Released).unwrap();
  match outcome {
    TransitionOutcome::Rejected { reason, .. } => assert!(reason.contains("invalid licensor shares")),
    other => panic!("expected rejection, got {other:?}"),
  }
}

#[test]
fn unguarded_targets_ignore_splits() {
  let repo = MemoryCatalog::new();
  let (release, _, _) = seeded_release(&repo, 3);
  let guard = StatusGuard::new(&repo);

  let path =
    [ReleaseStatus::Signed, ReleaseStatus::InProgress, ReleaseStatus::ReadyForDelivery, ReleaseStatus::Archived];
  for to in path {
    assert!(guard.transition(release.id, to).unwrap().is_applied(), "{to}");
    assert_eq!(repo.status_of(release.id), to);
  }
}

#[test]
fn check_does_not_write() {
  let repo = MemoryCatalog::new();
  let (release, _, _) = seeded_release(&repo, 0);

  let outcome = StatusGuard::new(&repo).check(release.id, ReleaseStatus::Released).unwrap();
  assert!(outcome.is_applied());
  assert_eq!(repo.status_of(release.id), ReleaseStatus::Planning);
}

#[test]
fn unknown_release_is_not_found() {
  let repo = MemoryCatalog::new();
  let err = StatusGuard::new(&repo).transition(ReleaseId::new(), ReleaseStatus::Archived).unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn read_failure_aborts_the_transition() {
  let repo = MemoryCatalog::new();
  let (release, _, _) = seeded_release(&repo, 1);
  *repo.fail_share_reads.borrow_mut() = true;

  let err = StatusGuard::new(&repo).transition(release.id, ReleaseStatus::Delivered).unwrap_err();
  assert!(matches!(err, CoreError::Repository(_)));
  assert_eq!(repo.status_of(release.id), ReleaseStatus::Planning);
}
