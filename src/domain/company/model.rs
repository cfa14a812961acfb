//! Company domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::shared::DomainError;

pub const COMPANY_CODE_LEN: usize = 6;

/// Join code shared by the owner with employees.
///
/// Only the length is checked; the lookup itself decides validity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyCode(String);

impl CompanyCode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.chars().count() != COMPANY_CODE_LEN {
            return Err(DomainError::Validation(format!(
                "Company code must be exactly {} characters",
                COMPANY_CODE_LEN
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Six random decimal digits, zero padded.
    pub fn generate() -> Self {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(format!("{:06}", n))
    }

    /// Code read back from the store, already checked on insert.
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Company {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub code: CompanyCode,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_must_be_six_characters() {
        assert!(CompanyCode::parse("123456").is_ok());
        assert!(CompanyCode::parse("ABC123").is_ok());
        assert!(matches!(
            CompanyCode::parse("12345"),
            Err(DomainError::Validation(_))
        ));
        assert!(CompanyCode::parse("1234567").is_err());
        assert!(CompanyCode::parse("").is_err());
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = CompanyCode::generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }
}
