use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::ContractId;
use crate::errors::CoreError;
use crate::percent;

labelled_enum! {
  ContractType as "contract type" {
    Mla => "MLA",
    ReleaseSchedule => "Release Schedule",
    RemixAgreement => "Remix Agreement",
    Other => "Other",
  }
}

labelled_enum! {
  ContractStatus as "contract status" {
    Draft => "draft",
    Sent => "sent",
    Executed => "executed",
    Archived => "archived",
  }
}

labelled_enum! {
  ContractTermType as "contract term type" {
    Fixed => "fixed",
    Perpetual => "perpetual",
    AutoRenew => "auto_renew",
    EvergreenWithNotice => "evergreen_with_notice",
  }
}

/// Duración y renovación de un contrato.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractTerm {
  pub term_type: Option<ContractTermType>,
  pub term_value_years: Option<u32>,
  pub auto_renew_interval_years: Option<u32>,
  pub notice_period_days: Option<u32>,
  pub effective_at: Option<NaiveDate>,
  pub expires_at: Option<NaiveDate>,
}

impl ContractTerm {
  /// Texto corto del plazo para paneles de resumen.
  pub fn display(&self) -> String {
    match self.term_type {
      Some(ContractTermType::Perpetual) => "Perpetual".to_string(),
      Some(ContractTermType::Fixed) => match self.term_value_years {
        Some(years) if years > 0 => format!("{years} Years"),
        _ => "Fixed term".to_string(),
      },
      Some(ContractTermType::AutoRenew) => match self.auto_renew_interval_years {
        Some(years) if years > 0 => format!("Auto-renews every {years} yrs"),
        _ => "Auto-renew".to_string(),
      },
      Some(ContractTermType::EvergreenWithNotice) => "Evergreen (notice required)".to_string(),
      None => "No term on file".to_string(),
    }
  }
}

/// Acuerdo legal que fija cuánto se queda el sello y cuánto va al pool de
/// licenciantes.
///
/// `label_share_percent + licensor_pool_percent` debe ser 100 siempre que
/// ambos estén informados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
  pub id: ContractId,
  pub contract_type: ContractType,
  pub status: ContractStatus,
  pub label_share_percent: Option<f64>,
  pub licensor_pool_percent: Option<f64>,
  pub territory: Option<String>,
  pub term: ContractTerm,
  pub notes: Option<String>,
}

impl Contract {
  /// Contrato en borrador con el reparto sello / pool dado.
  pub fn new(contract_type: ContractType, label_share_percent: f64, licensor_pool_percent: f64) -> Self {
    Contract {
      id: ContractId::new(),
      contract_type,
      status: ContractStatus::Draft,
      label_share_percent: Some(label_share_percent),
      licensor_pool_percent: Some(licensor_pool_percent),
      territory: None,
      term: ContractTerm::default(),
      notes: None,
    }
  }

  /// Comprueba el reparto sello / pool.
  ///
  /// Cada valor informado debe estar en `[0, 100]` y, si están los dos,
  /// sumar 100.00 a precisión de céntimos.
  pub fn check_split(&self) -> Result<(), CoreError> {
    let label = self.label_share_percent.map(percent::validate_percent).transpose()?;
    let pool = self.licensor_pool_percent.map(percent::validate_percent).transpose()?;

    if let (Some(label), Some(pool)) = (label, pool) {
      if !percent::validate_sum_to_100(&[label, pool]) {
        return Err(CoreError::ContractSplit { label, pool });
      }
    }
    Ok(())
  }

  /// `Some(true/false)` si ambos porcentajes están informados.
  pub fn split_is_complete(&self) -> Option<bool> {
    match (self.label_share_percent, self.licensor_pool_percent) {
      (Some(label), Some(pool)) => Some(percent::validate_sum_to_100(&[label, pool])),
      _ => None,
    }
  }
}
