use serde::{Deserialize, Serialize};

/// Cómo se aplica la propagación de créditos a las pistas de un release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutMode {
  /// Todo el lote en una transacción: o se actualizan todas las pistas o
  /// ninguna, y el fallo se devuelve como error.
  #[default]
  Atomic,
  /// Una escritura por pista. Los fallos quedan anotados en el informe
  /// por pista y el resto de pistas sigue adelante.
  PerTrack,
}

/// Ajustes del subsistema de repartos (sección `[splits]` de `cuota.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSettings {
  #[serde(default)]
  pub fan_out_mode: FanOutMode,
}
