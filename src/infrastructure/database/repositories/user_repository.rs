//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::{db_err, is_unique_violation};
use crate::domain::identity::{NewAccount, UserAccount, UserRepository};
use crate::domain::profile::model::rate_to_cents;
use crate::domain::profile::NewProfile;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{profile, user};
use crate::infrastructure::database::repositories::profile_repository::role_to_db;
use crate::shared::store_now;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(u: user::Model) -> UserAccount {
    UserAccount {
        id: u.id,
        email: u.email,
        password_hash: u.password_hash,
        created_at: u.created_at,
        last_sign_in_at: u.last_sign_in_at,
    }
}

fn insert_err(email: &str, e: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::Conflict(format!("User with email '{}' already exists", email))
    } else {
        db_err(e)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_with_profile(
        &self,
        account: NewAccount,
        new_profile: NewProfile,
    ) -> DomainResult<UserAccount> {
        debug!("Creating user {} with role {}", account.email, new_profile.role.as_str());
        let now = store_now();
        let email = account.email.clone();
        let hourly_rate_cents = new_profile.hourly_rate.map(rate_to_cents).transpose()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let user_model = user::ActiveModel {
            id: Set(account.id.clone()),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            created_at: Set(now),
            last_sign_in_at: Set(None),
        };
        let created = user_model
            .insert(&txn)
            .await
            .map_err(|e| insert_err(&email, e))?;

        let profile_model = profile::ActiveModel {
            id: Set(account.id),
            full_name: Set(new_profile.full_name),
            email: Set(new_profile.email),
            role: Set(role_to_db(new_profile.role)),
            company_id: Set(new_profile.company_id),
            hourly_rate_cents: Set(hourly_rate_cents),
            created_at: Set(now),
        };
        profile_model.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!("User created: {}", created.id);
        Ok(model_to_domain(created))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserAccount>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn set_password(&self, id: &str, password_hash: &str) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(
                user::Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn touch_last_sign_in(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        user::Entity::update_many()
            .col_expr(
                user::Column::LastSignInAt,
                sea_orm::sea_query::Expr::value(Some(at)),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
