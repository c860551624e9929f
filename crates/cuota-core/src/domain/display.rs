/// Cantidad de artistas que suelen mostrar las tiendas digitales.
pub const DSP_MAX_ARTISTS: usize = 4;

/// Línea de artistas al estilo de las DSP.
///
/// - 1 artista: `"Naarly"`
/// - 2 artistas: `"Naarly & OOVA"`
/// - 3 o más: `"Naarly, OOVA & Dawda"`
///
/// Sólo se usan los primeros `max` nombres. Sin artistas devuelve `"—"`.
pub fn format_artist_display_line<S: AsRef<str>>(names: &[S], max: usize) -> String {
  let names: Vec<&str> = names.iter().take(max).map(AsRef::as_ref).collect();

  match names.as_slice() {
    [] => "—".to_string(),
    [only] => only.to_string(),
    [first, second] => format!("{first} & {second}"),
    [rest @ .., last] => format!("{} & {last}", rest.join(", ")),
  }
}
