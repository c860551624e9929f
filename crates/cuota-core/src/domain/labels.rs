/// Etiqueta desconocida al convertir texto a uno de los enums del catálogo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {value:?}")]
pub struct UnknownLabel {
  pub kind: &'static str,
  pub value: String,
}

/// Enum cerrado con una etiqueta canónica por variante.
///
/// Las etiquetas son las mismas que usa la base de datos, así que
/// `as_str` / `FromStr` sirven tanto para persistir como para serializar.
macro_rules! labelled_enum {
  (
    $(#[$meta:meta])*
    $name:ident as $kind:literal {
      $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub enum $name {
      $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn as_str(&self) -> &'static str {
        match self {
          $( $name::$variant => $label ),+
        }
      }
    }

    impl std::str::FromStr for $name {
      type Err = $crate::domain::labels::UnknownLabel;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $( $label => Ok($name::$variant), )+
          other => Err($crate::domain::labels::UnknownLabel { kind: $kind, value: other.to_string() }),
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }
  };
}
