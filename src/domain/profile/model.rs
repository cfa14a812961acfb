//! Profile domain entity

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::repositories::DomainResult;
use crate::shared::DomainError;

/// Upper bound for an hourly rate, in currency units.
pub const MAX_HOURLY_RATE: i64 = 1_000_000;

/// Role assigned at sign-up. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// Per-user profile row
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Same as the identity id
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Null until the user creates or joins a company
    pub company_id: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn belongs_to(&self, company_id: &str) -> bool {
        self.company_id.as_deref() == Some(company_id)
    }
}

/// Profile created alongside a new account
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

/// Non-negative and at most [`MAX_HOURLY_RATE`]; returned rounded to cents.
pub fn validate_hourly_rate(rate: Decimal) -> DomainResult<Decimal> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(DomainError::Validation(
            "Hourly rate must not be negative".into(),
        ));
    }
    if rate > Decimal::from(MAX_HOURLY_RATE) {
        return Err(DomainError::Validation(format!(
            "Hourly rate must not exceed {}",
            MAX_HOURLY_RATE
        )));
    }
    Ok(rate.round_dp(2))
}

/// Hourly rates are kept as integer cents in the store.
pub fn rate_to_cents(rate: Decimal) -> DomainResult<i64> {
    (rate.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| DomainError::Validation("Hourly rate is out of range".into()))
}

pub fn rate_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
