//! Invite function DTOs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::application::invites::InviteEmployee;
use crate::domain::invitation::Invitation;
use crate::interfaces::http::modules::companies::rate_value;

pub const MISSING_FIELDS: &str = "All fields are required.";

/// Raw invite body. Every field is required; presence is checked by
/// [`InviteFunctionRequest::into_command`].
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteFunctionRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// Number or numeric string; `0` is accepted
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Value>,
    pub company_id: Option<String>,
    pub redirect_to: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_rate(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

impl InviteFunctionRequest {
    pub fn into_command(self) -> Result<InviteEmployee, String> {
        let missing = || MISSING_FIELDS.to_string();
        let hourly_rate = match self.hourly_rate {
            None | Some(Value::Null) => return Err(missing()),
            Some(v) => parse_rate(&v).ok_or_else(|| "hourlyRate must be a number".to_string())?,
        };
        Ok(InviteEmployee {
            email: present(self.email).ok_or_else(missing)?,
            full_name: present(self.full_name).ok_or_else(missing)?,
            hourly_rate,
            company_id: present(self.company_id).ok_or_else(missing)?,
            redirect_to: present(self.redirect_to).ok_or_else(missing)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub company_id: String,
    pub hourly_rate: Option<f64>,
    pub redirect_to: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationDto {
    fn from(i: Invitation) -> Self {
        Self {
            hourly_rate: rate_value(i.hourly_rate),
            id: i.id,
            email: i.email,
            full_name: i.full_name,
            company_id: i.company_id,
            redirect_to: i.redirect_to,
            expires_at: i.expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteData {
    pub data: InvitationDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteFailure {
    pub error: String,
}
