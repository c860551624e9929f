use serde::{Deserialize, Serialize};

use crate::domain::ids::{ArtistId, ContactId};

/// Persona o empresa con datos legales y de cobro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id: ContactId,
  pub full_legal_name: String,
  pub email: String,
  pub company_name: Option<String>,
}

impl Contact {
  pub fn new(full_legal_name: impl Into<String>, email: impl Into<String>) -> Self {
    Contact { id: ContactId::new(), full_legal_name: full_legal_name.into(), email: email.into(), company_name: None }
  }
}

/// Nombre artístico al que se acreditan releases y pistas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
  pub id: ArtistId,
  pub artist_name: String,
}

impl ArtistProfile {
  pub fn new(artist_name: impl Into<String>) -> Self {
    ArtistProfile { id: ArtistId::new(), artist_name: artist_name.into() }
  }
}
