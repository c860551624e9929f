//! Aritmética de porcentajes del reparto.
//!
//! Todos los porcentajes del catálogo tienen precisión de dos decimales
//! ("céntimos" de porcentaje). Las comparaciones se hacen siempre después
//! de redondear a céntimos para absorber la deriva del punto flotante:
//! `99.999999` y `100.00001` cuentan como `100.00`.

use crate::errors::CoreError;

/// 100.00 % expresado en céntimos.
pub const FULL_CENTS: i64 = 10_000;

/// Convierte un porcentaje a céntimos enteros, redondeando.
pub fn to_cents(value: f64) -> i64 {
  (value * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
  cents as f64 / 100.0
}

pub fn round_to_cents(value: f64) -> f64 {
  from_cents(to_cents(value))
}

/// `true` si la suma, redondeada a dos decimales, es exactamente 100.00.
pub fn validate_sum_to_100(values: &[f64]) -> bool {
  to_cents(values.iter().sum()) == FULL_CENTS
}

/// Reparte el 100 % entre `count` partes iguales con precisión de céntimos.
///
/// La base es la división entera `floor(10000 / count)` en céntimos y el
/// resto se reparte de a un céntimo entre las primeras entradas. El
/// resultado suma exactamente 100.00 y ninguna entrada difiere de otra en
/// más de 0.01. Que los primeros reciban el céntimo extra es un desempate
/// visible y deliberado: `split_evenly(3) == [33.34, 33.33, 33.33]`.
pub fn split_evenly(count: usize) -> Vec<f64> {
  if count == 0 {
    return Vec::new();
  }

  let n = count as i64;
  let base = FULL_CENTS / n;
  let remainder = FULL_CENTS - base * n;

  (0..n).map(|i| from_cents(if i < remainder { base + 1 } else { base })).collect()
}

/// Porcentaje sobre el total de ingresos de quien recibe `share_percent`
/// del pool de licenciantes.
///
/// No redondea: el redondeo es cosa de quien lo muestra.
pub fn effective_rate(share_percent: f64, pool_percent: f64) -> f64 {
  (share_percent / 100.0) * pool_percent
}

/// Valida un porcentaje individual (rango `[0, 100]`) y lo normaliza a
/// dos decimales.
pub fn validate_percent(value: f64) -> Result<f64, CoreError> {
  if !value.is_finite() {
    return Err(CoreError::InvalidPercent(value));
  }
  let cents = to_cents(value);
  if !(0..=FULL_CENTS).contains(&cents) {
    return Err(CoreError::InvalidPercent(value));
  }
  Ok(from_cents(cents))
}
