//! SeaORM implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::db_err;
use crate::domain::identity::{AuthSession, Identity, SessionRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{auth_session, user};
use crate::shared::store_now;

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(s: auth_session::Model, u: user::Model) -> AuthSession {
    AuthSession {
        id: s.id,
        identity: Identity {
            id: u.id,
            email: u.email,
        },
        created_at: s.created_at,
        expires_at: s.expires_at,
        revoked: s.revoked_at.is_some(),
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, session: AuthSession) -> DomainResult<()> {
        debug!("Creating session {} for {}", session.id, session.identity.id);
        let model = auth_session::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.identity.id),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
            revoked_at: Set(None),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<AuthSession>> {
        let row = auth_session::Entity::find_by_id(id.to_string())
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(match row {
            Some((session, Some(user))) => Some(model_to_domain(session, user)),
            _ => None,
        })
    }

    async fn extend(&self, id: &str, expires_at: DateTime<Utc>) -> DomainResult<bool> {
        let result = auth_session::Entity::update_many()
            .col_expr(auth_session::Column::ExpiresAt, Expr::value(expires_at))
            .filter(auth_session::Column::Id.eq(id))
            .filter(auth_session::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn revoke(&self, id: &str) -> DomainResult<bool> {
        let result = auth_session::Entity::update_many()
            .col_expr(auth_session::Column::RevokedAt, Expr::value(Some(store_now())))
            .filter(auth_session::Column::Id.eq(id))
            .filter(auth_session::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
