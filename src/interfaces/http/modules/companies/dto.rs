//! Company DTOs

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::company::EmployeeHours;
use crate::domain::company::Company;
use crate::domain::profile::Profile;
use crate::domain::DomainError;
use crate::shared::format_duration;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 120, message = "company name must be 2-120 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinCompanyRequest {
    /// 6-character company code
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetHourlyRateRequest {
    /// Non-negative rate with up to 2 decimals; `null` clears it
    #[validate(range(min = 0.0, max = 1000000.0, message = "hourly rate must be between 0 and 1000000"))]
    pub hourly_rate: Option<f64>,
}

impl SetHourlyRateRequest {
    pub fn rate(&self) -> Result<Option<Decimal>, DomainError> {
        self.hourly_rate.map(decimal_rate).transpose()
    }
}

pub fn decimal_rate(value: f64) -> Result<Decimal, DomainError> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .map_err(|_| DomainError::Validation("hourly rate is not a valid number".into()))
}

pub fn rate_value(rate: Option<Decimal>) -> Option<f64> {
    rate.and_then(|r| r.to_f64())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanyDto {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Join code; only visible to the owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CompanyDto {
    pub fn for_viewer(company: Company, viewer_id: &str) -> Self {
        let is_owner = company.owner_id == viewer_id;
        Self {
            code: is_owner.then(|| company.code.to_string()),
            id: company.id,
            name: company.name,
            owner_id: company.owner_id,
            created_at: company.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    /// `admin` or `employee`
    pub role: String,
    pub company_id: Option<String>,
    pub hourly_rate: Option<f64>,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            role: p.role.as_str().to_string(),
            hourly_rate: rate_value(p.hourly_rate),
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            company_id: p.company_id,
        }
    }
}

/// Date range for company reports
#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CompanyEntriesQuery {
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Only entries that are still open
    #[serde(default)]
    pub open_only: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeHoursDto {
    pub user_id: String,
    pub full_name: String,
    pub entries: u32,
    pub worked_seconds: i64,
    /// e.g. `2h 05m`
    pub worked: String,
    pub clocked_in: bool,
}

impl From<EmployeeHours> for EmployeeHoursDto {
    fn from(h: EmployeeHours) -> Self {
        Self {
            worked_seconds: h.worked.num_seconds(),
            worked: format_duration(h.worked),
            user_id: h.user_id,
            full_name: h.full_name,
            entries: h.entries,
            clocked_in: h.clocked_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::CompanyCode;
    use std::str::FromStr;

    #[test]
    fn code_is_shown_to_the_owner_only() {
        let company = Company {
            id: "c1".into(),
            owner_id: "owner".into(),
            name: "Acme".into(),
            code: CompanyCode::parse("123456").unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(
            CompanyDto::for_viewer(company.clone(), "owner").code.as_deref(),
            Some("123456")
        );
        assert!(CompanyDto::for_viewer(company, "worker").code.is_none());
    }

    #[test]
    fn rates_are_rounded_to_cents() {
        assert_eq!(
            decimal_rate(12.346).unwrap(),
            Decimal::from_str("12.35").unwrap()
        );
        let req = SetHourlyRateRequest { hourly_rate: None };
        assert_eq!(req.rate().unwrap(), None);
    }
}
