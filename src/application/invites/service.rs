//! Invite function: an admin invites an employee into their company

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::application::ports::{AuthProvider, SignUpMetadata};
use crate::domain::invitation::Invitation;
use crate::domain::profile::model::validate_hourly_rate;
use crate::domain::profile::Role;
use crate::domain::session::Actor;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct InviteEmployee {
    pub email: String,
    pub full_name: String,
    pub hourly_rate: Decimal,
    pub company_id: String,
    pub redirect_to: String,
}

impl InviteEmployee {
    fn check(&self) -> DomainResult<()> {
        let blank = [
            ("email", &self.email),
            ("fullName", &self.full_name),
            ("companyId", &self.company_id),
            ("redirectTo", &self.redirect_to),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty());
        if let Some((field, _)) = blank {
            return Err(DomainError::Validation(format!("Missing required field: {}", field)));
        }
        validate_hourly_rate(self.hourly_rate)?;
        Ok(())
    }
}

pub struct InviteService {
    auth: Arc<dyn AuthProvider>,
    public_url: Option<String>,
}

impl InviteService {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            public_url: None,
        }
    }

    /// Base URL that relative `redirect_to` paths are resolved against.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into());
        self
    }

    fn absolute_redirect(&self, redirect_to: &str) -> String {
        match &self.public_url {
            Some(base) if redirect_to.starts_with('/') => {
                format!("{}{}", base.trim_end_matches('/'), redirect_to)
            }
            _ => redirect_to.to_string(),
        }
    }

    pub async fn invite_employee(
        &self,
        caller: &Actor,
        request: InviteEmployee,
    ) -> DomainResult<Invitation> {
        request.check()?;
        if caller.profile.role != Role::Admin || !caller.profile.belongs_to(&request.company_id) {
            return Err(DomainError::Forbidden(
                "Only the company admin can invite employees".into(),
            ));
        }

        let metadata = SignUpMetadata {
            full_name: request.full_name.trim().to_string(),
            role: Role::Employee,
            company_id: Some(request.company_id.clone()),
            hourly_rate: Some(request.hourly_rate.round_dp(2)),
        };
        let invitation = self
            .auth
            .invite_user_by_email(
                &request.email,
                metadata,
                &self.absolute_redirect(&request.redirect_to),
                caller.user_id(),
            )
            .await?;
        info!(
            user_id = caller.user_id(),
            company_id = %request.company_id,
            invitation_id = %invitation.id,
            "Employee invited"
        );
        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::test_support::test_app;

    fn request(company_id: &str) -> InviteEmployee {
        InviteEmployee {
            email: "new@example.com".into(),
            full_name: "New Hire".into(),
            hourly_rate: Decimal::from_str("17.25").unwrap(),
            company_id: company_id.into(),
            redirect_to: "https://app.test/accept".into(),
        }
    }

    #[tokio::test]
    async fn admin_invites_into_own_company() {
        let app = test_app().await;
        let (owner, company) = app.owner_with_company("boss@example.com").await;
        let invitation = app
            .invites
            .invite_employee(&owner, request(&company.id))
            .await
            .unwrap();
        assert_eq!(invitation.email, "new@example.com");
        assert_eq!(invitation.hourly_rate, Some(Decimal::from_str("17.25").unwrap()));
        assert!(invitation.accepted_at.is_none());
    }

    #[tokio::test]
    async fn other_company_is_forbidden() {
        let app = test_app().await;
        let (owner, _) = app.owner_with_company("boss@example.com").await;
        let (_, other) = app.owner_with_company("rival@example.com").await;
        let err = app
            .invites
            .invite_employee(&owner, request(&other.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn employees_cannot_invite() {
        let app = test_app().await;
        let (_, company) = app.owner_with_company("boss@example.com").await;
        let worker = app.employee_in(&company, "w@example.com").await;
        let err = app
            .invites
            .invite_employee(&worker, request(&company.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let app = test_app().await;
        let (owner, company) = app.owner_with_company("boss@example.com").await;
        let mut req = request(&company.id);
        req.full_name = "  ".into();
        let err = app.invites.invite_employee(&owner, req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn relative_redirect_uses_public_url() {
        let app = test_app().await;
        let service = InviteService::new(app.auth.clone()).with_public_url("https://clock.test/");
        assert_eq!(
            service.absolute_redirect("/accept"),
            "https://clock.test/accept"
        );
        assert_eq!(
            service.absolute_redirect("https://elsewhere.test/a"),
            "https://elsewhere.test/a"
        );
    }
}
