//! Invite delivery port

use async_trait::async_trait;

use crate::domain::invitation::Invitation;
use crate::domain::DomainResult;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invite(&self, invitation: &Invitation, link: &str) -> DomainResult<()>;
}
