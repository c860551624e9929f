use serde::{Deserialize, Serialize};

use crate::domain::ids::ContactId;
use crate::domain::share::{LicensorShare, NewShare, ShareRoleContext};
use crate::percent;

/// Reparto de una pista en edición, todavía sin guardar.
///
/// Refleja lo que hace el editor de splits: añadir contactos (sin repetir),
/// quitar, editar porcentajes y repartir a partes iguales. Guardar un
/// borrador incompleto está permitido; la completitud sólo se exige al
/// entregar el release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitDraft {
  rows: Vec<NewShare>,
}

impl SplitDraft {
  pub fn new() -> Self {
    Self::default()
  }

  /// Borrador a partir del reparto guardado, en el mismo orden.
  pub fn from_shares(shares: &[LicensorShare]) -> Self {
    let rows = shares
      .iter()
      .map(|s| NewShare {
        contact_id: s.contact_id,
        share_percent: s.share_percent,
        role_context: s.role_context,
        role_context_custom: s.role_context_custom.clone(),
      })
      .collect();
    SplitDraft { rows }
  }

  pub fn rows(&self) -> &[NewShare] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Añade un contacto con 0.00 %. Devuelve `false` si ya estaba.
  pub fn add(&mut self, contact_id: ContactId, role_context: ShareRoleContext) -> bool {
    if self.rows.iter().any(|r| r.contact_id == contact_id) {
      return false;
    }
    self.rows.push(NewShare::new(contact_id, 0.0, role_context));
    true
  }

  pub fn remove(&mut self, index: usize) -> Option<NewShare> {
    (index < self.rows.len()).then(|| self.rows.remove(index))
  }

  /// Fija el porcentaje de una fila. Índices fuera de rango se ignoran.
  pub fn set_percent(&mut self, index: usize, share_percent: f64) {
    if let Some(row) = self.rows.get_mut(index) {
      row.share_percent = share_percent;
    }
  }

  /// Aplica [`percent::split_evenly`] a todas las filas, en orden.
  pub fn split_evenly(&mut self) {
    let parts = percent::split_evenly(self.rows.len());
    for (row, part) in self.rows.iter_mut().zip(parts) {
      row.share_percent = part;
    }
  }

  pub fn total(&self) -> f64 {
    self.rows.iter().map(|r| r.share_percent).sum()
  }

  pub fn is_complete(&self) -> bool {
    percent::validate_sum_to_100(&self.rows.iter().map(|r| r.share_percent).collect::<Vec<_>>())
  }

  /// Lo que aún falta (o sobra, si es negativo) para llegar a 100.00.
  pub fn remaining(&self) -> f64 {
    percent::from_cents(percent::FULL_CENTS - percent::to_cents(self.total()))
  }

  pub fn into_new_shares(self) -> Vec<NewShare> {
    self.rows
  }
}
