#[macro_use]
pub mod labels;

pub mod contract;
pub mod credit;
pub mod display;
pub mod draft;
pub mod ids;
pub mod party;
pub mod release;
pub mod share;
pub mod track;

pub use contract::{Contract, ContractStatus, ContractTerm, ContractTermType, ContractType};
pub use credit::{
  CreditAssignment, CreditCounts, CreditKind, CreditRole, ReleaseContributor, ReleaseMainArtist, TrackContributor,
  TrackCreditBatch, TrackMainArtist,
};
pub use draft::SplitDraft;
pub use ids::{ArtistId, ContactId, ContractId, ContributorId, ReleaseId, ShareId, TrackId};
pub use labels::UnknownLabel;
pub use party::{ArtistProfile, Contact};
pub use release::{Release, ReleaseStatus, ReleaseType, ReleaseUpdate};
pub use share::{LicensorShare, NewShare, ShareRoleContext, SplitState};
pub use track::{Track, TrackUpdate};
