//! SeaORM implementation of InvitationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{db_err, is_unique_violation};
use crate::domain::invitation::{Invitation, InvitationRepository};
use crate::domain::profile::model::{rate_from_cents, rate_to_cents};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::invitation;

pub struct SeaOrmInvitationRepository {
    db: DatabaseConnection,
}

impl SeaOrmInvitationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(i: invitation::Model) -> Invitation {
    Invitation {
        id: i.id,
        email: i.email,
        full_name: i.full_name,
        company_id: i.company_id,
        hourly_rate: i.hourly_rate_cents.map(rate_from_cents),
        redirect_to: i.redirect_to,
        invited_by: i.invited_by,
        token_hash: i.token_hash,
        created_at: i.created_at,
        expires_at: i.expires_at,
        accepted_at: i.accepted_at,
    }
}

#[async_trait]
impl InvitationRepository for SeaOrmInvitationRepository {
    async fn create(&self, inv: Invitation) -> DomainResult<Invitation> {
        debug!("Creating invitation {} for company {}", inv.id, inv.company_id);
        let model = invitation::ActiveModel {
            id: Set(inv.id.clone()),
            email: Set(inv.email.clone()),
            full_name: Set(inv.full_name.clone()),
            company_id: Set(inv.company_id.clone()),
            hourly_rate_cents: Set(inv.hourly_rate.map(rate_to_cents).transpose()?),
            redirect_to: Set(inv.redirect_to.clone()),
            invited_by: Set(inv.invited_by.clone()),
            token_hash: Set(inv.token_hash.clone()),
            created_at: Set(inv.created_at),
            expires_at: Set(inv.expires_at),
            accepted_at: Set(None),
        };
        let created = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Invitation token collision".into())
            } else {
                db_err(e)
            }
        })?;
        Ok(model_to_domain(created))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<Invitation>> {
        let model = invitation::Entity::find()
            .filter(invitation::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn mark_accepted(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        let result = invitation::Entity::update_many()
            .col_expr(invitation::Column::AcceptedAt, Expr::value(Some(at)))
            .filter(invitation::Column::Id.eq(id))
            .filter(invitation::Column::AcceptedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
