//! Form definitions backing the dashboard routes.

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

pub mod appointments;
pub mod clients;
pub mod equipments;
pub mod proposals;
pub mod search;
pub mod units;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data. Messages are shown to
/// the user as flash alerts.
pub enum FormError {
    #[error("Erro de validação do formulário")]
    Validation(#[from] ValidationErrors),

    #[error("CNPJ inválido")]
    InvalidCnpj,

    #[error("Email inválido")]
    InvalidEmail,

    #[error("Nome obrigatório")]
    InvalidName,

    #[error("Identificador inválido")]
    InvalidId,

    #[error("Data inválida")]
    InvalidDate,

    #[error("Opção inválida: {0}")]
    InvalidOption(String),
}

/// Trims `value`, mapping blanks to `None`.
pub(crate) fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Parses an optional positive id posted as text; blank means `None`.
pub(crate) fn parse_optional_id(value: &str) -> Result<Option<i32>, FormError> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(Some)
            .ok_or(FormError::InvalidId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_trims_and_drops_blanks() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" Natal "), Some("Natal".to_string()));
    }

    #[test]
    fn optional_ids_reject_garbage() {
        assert_eq!(parse_optional_id("").unwrap(), None);
        assert_eq!(parse_optional_id("12").unwrap(), Some(12));
        assert!(parse_optional_id("0").is_err());
        assert!(parse_optional_id("x").is_err());
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date("2024-02-30").is_err());
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
