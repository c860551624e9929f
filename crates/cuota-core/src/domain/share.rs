use serde::{Deserialize, Serialize};

use crate::domain::ids::{ContactId, ShareId, TrackId};
use crate::percent;

labelled_enum! {
  /// En calidad de qué cobra un contacto su parte del pool.
  ShareRoleContext as "share role context" {
    MainArtist => "Main Artist",
    Producer => "Producer",
    Composer => "Composer",
    Manager => "Manager",
    Other => "Other",
    FeaturedArtist => "Featured Artist",
    SampleClearance => "Sample Clearance",
    RemixRights => "Remix Rights",
  }
}

/// Parte de un contacto en el pool de licenciantes de una pista.
///
/// `share_percent` es un porcentaje *del pool*, no del total. El porcentaje
/// sobre el total se deriva con [`percent::effective_rate`] y nunca se guarda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensorShare {
  pub id: ShareId,
  pub track_id: TrackId,
  pub contact_id: ContactId,
  pub share_percent: f64,
  pub role_context: ShareRoleContext,
  pub role_context_custom: Option<String>,
  pub notes: Option<String>,
}

impl LicensorShare {
  pub fn effective_rate(&self, pool_percent: f64) -> f64 {
    percent::effective_rate(self.share_percent, pool_percent)
  }
}

/// Fila a insertar al reemplazar el reparto de una pista.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShare {
  pub contact_id: ContactId,
  pub share_percent: f64,
  pub role_context: ShareRoleContext,
  pub role_context_custom: Option<String>,
}

impl NewShare {
  pub fn new(contact_id: ContactId, share_percent: f64, role_context: ShareRoleContext) -> Self {
    NewShare { contact_id, share_percent, role_context, role_context_custom: None }
  }

  pub fn into_share(self, track_id: TrackId) -> LicensorShare {
    LicensorShare {
      id: ShareId::new(),
      track_id,
      contact_id: self.contact_id,
      share_percent: self.share_percent,
      role_context: self.role_context,
      role_context_custom: self.role_context_custom,
      notes: None,
    }
  }
}

/// Estado del reparto de una pista.
///
/// Sólo cambia a través de `replace_shares_for_track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitState {
  /// No hay ninguna fila de reparto.
  Unallocated,
  /// Hay filas pero no suman 100.00.
  Incomplete,
  /// Hay filas y suman 100.00.
  Valid,
}

impl SplitState {
  pub fn of(percents: &[f64]) -> Self {
    if percents.is_empty() {
      SplitState::Unallocated
    } else if percent::validate_sum_to_100(percents) {
      SplitState::Valid
    } else {
      SplitState::Incomplete
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_follows_the_sum() {
    assert_eq!(SplitState::of(&[]), SplitState::Unallocated);
    assert_eq!(SplitState::of(&[97.0]), SplitState::Incomplete);
    assert_eq!(SplitState::of(&[60.0, 40.0]), SplitState::Valid);
  }

  #[test]
  fn role_context_uses_display_labels() {
    assert_eq!(ShareRoleContext::SampleClearance.to_string(), "Sample Clearance");
    assert_eq!("Remix Rights".parse::<ShareRoleContext>().unwrap(), ShareRoleContext::RemixRights);
  }
}
