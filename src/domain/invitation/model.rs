//! Invitation domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Pending employee invitation created by a company admin.
///
/// Only the SHA-256 of the token is stored; the token itself travels in
/// the invite link.
#[derive(Debug, Clone)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub company_id: String,
    pub hourly_rate: Option<Decimal>,
    pub redirect_to: String,
    pub invited_by: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        self.accepted_at.is_none() && self.expires_at > now
    }
}
