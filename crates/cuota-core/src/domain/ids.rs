use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Genera un identificador opaco respaldado por un UUID v4.
///
/// Todos los IDs del catálogo comparten la misma forma: se persisten como
/// texto y se comparan por valor. Tenerlos como tipos distintos evita pasar
/// un `TrackId` donde se espera un `ReleaseId`.
macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct $name(Uuid);

    impl $name {
      pub fn new() -> Self {
        $name(Uuid::new_v4())
      }

      pub fn from_uuid(u: Uuid) -> Self {
        $name(u)
      }

      pub fn as_uuid(&self) -> Uuid {
        self.0
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl From<Uuid> for $name {
      fn from(u: Uuid) -> Self {
        $name(u)
      }
    }

    impl From<$name> for Uuid {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl FromStr for $name {
      type Err = uuid::Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map($name)
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

uuid_id!(
  /// Lanzamiento (Single / EP / Album).
  ReleaseId
);
uuid_id!(
  /// Pista concreta dentro de un lanzamiento.
  TrackId
);
uuid_id!(
  /// Contrato o "Release Schedule".
  ContractId
);
uuid_id!(
  /// Contacto legal: la persona o empresa que cobra.
  ContactId
);
uuid_id!(
  /// Perfil artístico (nombre de escenario).
  ArtistId
);
uuid_id!(ShareId);
uuid_id!(ContributorId);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_roundtrip_through_text() {
    let id = TrackId::new();
    let parsed: TrackId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
  }

  #[test]
  fn garbage_is_rejected() {
    assert!("not-a-uuid".parse::<ReleaseId>().is_err());
  }
}
