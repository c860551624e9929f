use crate::io::atomic_write_str;
use crate::paths::{ConfigError, CuotaPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: CuotaPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: CuotaPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &CuotaPaths {
    &self.paths
  }

  /// Como [`ConfigBackend::load_section`], pero sin fichero o sin sección
  /// devuelve `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    decode(section, table)
  }
}

fn decode<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table
    .clone()
    .try_into()
    .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    decode(section, table)
  }

  /// Reemplaza una sección conservando comentarios y el resto del fichero.
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    // `section_str` no lleva cabecera: es el cuerpo de la tabla.
    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    atomic_write_str(&path, &doc.to_string())?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Section {
    name: String,
    size: u32,
  }

  fn backend(dir: &std::path::Path) -> TomlConfigBackend {
    TomlConfigBackend::new(CuotaPaths::at(dir).unwrap())
  }

  #[test]
  fn missing_file_or_section_yields_default() {
    let dir = tempdir().unwrap();
    let backend = backend(dir.path());

    let s: Section = backend.load_section_with_default("things").unwrap();
    assert_eq!(s, Section::default());

    fs::write(backend.paths().config_file(), "[other]\nx = 1\n").unwrap();
    let s: Section = backend.load_section_with_default("things").unwrap();
    assert_eq!(s, Section::default());

    assert!(backend.load_section::<Section>("things").is_err());
  }

  #[test]
  fn save_then_load_keeps_other_sections_and_comments() {
    let dir = tempdir().unwrap();
    let backend = backend(dir.path());
    fs::write(backend.paths().config_file(), "# hand written\n[other]\nx = 1\n").unwrap();

    let value = Section { name: "catalog".into(), size: 4 };
    backend.save_section("things", &value).unwrap();

    let loaded: Section = backend.load_section("things").unwrap();
    assert_eq!(loaded, value);

    let raw = fs::read_to_string(backend.paths().config_file()).unwrap();
    assert!(raw.contains("# hand written"));
    assert!(raw.contains("x = 1"));
  }

  #[test]
  fn malformed_section_is_reported() {
    let dir = tempdir().unwrap();
    let backend = backend(dir.path());
    fs::write(backend.paths().config_file(), "[things]\nname = 3\n").unwrap();

    let err = backend.load_section_with_default::<Section>("things").unwrap_err();
    assert!(matches!(err, ConfigError::Other(_)));
  }
}
