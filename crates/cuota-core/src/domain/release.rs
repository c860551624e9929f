use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::ReleaseId;

labelled_enum! {
  /// Formato comercial del lanzamiento.
  ReleaseType as "release type" {
    Single => "Single",
    EP => "EP",
    Album => "Album",
  }
}

labelled_enum! {
  /// Ciclo de vida de un lanzamiento.
  ///
  /// El orden natural es `planning -> signed -> in_progress ->
  /// ready_for_delivery -> delivered -> released`, y `archived` es
  /// alcanzable desde cualquier estado. No es una máquina lineal: sólo
  /// `delivered` y `released` están protegidos (ver
  /// [`StatusGuard`](crate::services::StatusGuard)).
  ReleaseStatus as "release status" {
    Planning => "planning",
    Signed => "signed",
    InProgress => "in_progress",
    ReadyForDelivery => "ready_for_delivery",
    Delivered => "delivered",
    Released => "released",
    Archived => "archived",
  }
}

impl ReleaseStatus {
  /// `true` si entrar en este estado exige que todas las pistas tengan
  /// el reparto completo.
  pub fn requires_valid_splits(&self) -> bool {
    matches!(self, ReleaseStatus::Delivered | ReleaseStatus::Released)
  }
}

/// Un lanzamiento del catálogo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
  pub id: ReleaseId,
  pub title: String,
  pub version: Option<String>,
  pub release_type: ReleaseType,

  /// Identificador interno de catálogo. Lo genera un proceso externo al
  /// crear el lanzamiento; aquí sólo se transporta.
  pub catalog_id: String,

  pub upc: Option<String>,
  pub release_date: Option<NaiveDate>,
  pub status: ReleaseStatus,
}

impl Release {
  /// Lanzamiento nuevo en estado `planning`.
  pub fn new(title: impl Into<String>, release_type: ReleaseType, catalog_id: impl Into<String>) -> Self {
    Release {
      id: ReleaseId::new(),
      title: title.into(),
      version: None,
      release_type,
      catalog_id: catalog_id.into(),
      upc: None,
      release_date: None,
      status: ReleaseStatus::Planning,
    }
  }
}

/// Campos editables de un release. `None` deja el valor como está.
///
/// El estado no está aquí: los cambios de estado pasan por el
/// [`StatusGuard`](crate::services::StatusGuard).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseUpdate {
  pub title: Option<String>,
  pub version: Option<Option<String>>,
  pub release_date: Option<Option<NaiveDate>>,
  pub upc: Option<Option<String>>,
}

impl ReleaseUpdate {
  pub fn apply(self, release: &mut Release) {
    if let Some(title) = self.title {
      release.title = title;
    }
    if let Some(version) = self.version {
      release.version = version;
    }
    if let Some(date) = self.release_date {
      release.release_date = date;
    }
    if let Some(upc) = self.upc {
      release.upc = upc;
    }
  }
}
