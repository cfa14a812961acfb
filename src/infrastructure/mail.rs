//! Invite delivery
//!
//! No SMTP relay is configured; the invite link is written to the log
//! where an operator can forward it.

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::Mailer;
use crate::domain::invitation::Invitation;
use crate::domain::DomainResult;

#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invite(&self, invitation: &Invitation, link: &str) -> DomainResult<()> {
        info!(
            to = %invitation.email,
            company_id = %invitation.company_id,
            expires_at = %invitation.expires_at,
            link,
            "Invitation email"
        );
        Ok(())
    }
}
