//! SeaORM implementation of ProfileRepository

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use crate::domain::profile::model::{rate_from_cents, rate_to_cents};
use crate::domain::profile::{Profile, ProfileRepository, Role};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::profile::{self, ProfileRole};

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn role_to_db(role: Role) -> ProfileRole {
    match role {
        Role::Admin => ProfileRole::Admin,
        Role::Employee => ProfileRole::Employee,
    }
}

fn role_from_db(role: ProfileRole) -> Role {
    match role {
        ProfileRole::Admin => Role::Admin,
        ProfileRole::Employee => Role::Employee,
    }
}

pub(crate) fn model_to_domain(p: profile::Model) -> Profile {
    Profile {
        id: p.id,
        full_name: p.full_name,
        email: p.email,
        role: role_from_db(p.role),
        company_id: p.company_id,
        hourly_rate: p.hourly_rate_cents.map(rate_from_cents),
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Profile>> {
        let model = profile::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_employees(&self, company_id: &str) -> DomainResult<Vec<Profile>> {
        let models = profile::Entity::find()
            .filter(profile::Column::CompanyId.eq(company_id))
            .filter(profile::Column::Role.eq(ProfileRole::Employee))
            .order_by_asc(profile::Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn assign_company(&self, profile_id: &str, company_id: &str) -> DomainResult<bool> {
        debug!("Assigning profile {} to company {}", profile_id, company_id);
        let result = profile::Entity::update_many()
            .col_expr(profile::Column::CompanyId, Expr::value(company_id.to_string()))
            .filter(profile::Column::Id.eq(profile_id))
            .filter(profile::Column::CompanyId.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn set_hourly_rate(
        &self,
        profile_id: &str,
        company_id: &str,
        hourly_rate: Option<Decimal>,
    ) -> DomainResult<bool> {
        let cents = hourly_rate.map(rate_to_cents).transpose()?;
        let result = profile::Entity::update_many()
            .col_expr(profile::Column::HourlyRateCents, Expr::value(cents))
            .filter(profile::Column::Id.eq(profile_id))
            .filter(profile::Column::CompanyId.eq(company_id))
            .filter(profile::Column::Role.eq(ProfileRole::Employee))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::{seed_company, seed_user, test_db};
    use std::str::FromStr;

    #[tokio::test]
    async fn company_is_assigned_only_once() {
        let db = test_db().await;
        seed_user(&db, "owner", "owner@example.com").await;
        seed_company(&db, "c1", "owner", "111111").await;
        seed_company(&db, "c2", "owner", "222222").await;
        seed_user(&db, "u1", "u1@example.com").await;

        let repo = SeaOrmProfileRepository::new(db);
        assert!(repo.assign_company("u1", "c1").await.unwrap());
        assert!(!repo.assign_company("u1", "c2").await.unwrap());

        let profile = repo.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(profile.company_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn hourly_rate_is_scoped_to_company() {
        let db = test_db().await;
        seed_user(&db, "owner", "owner@example.com").await;
        seed_company(&db, "c1", "owner", "111111").await;
        seed_user(&db, "u1", "u1@example.com").await;

        let repo = SeaOrmProfileRepository::new(db);
        let rate = Decimal::from_str("18.75").unwrap();
        assert!(!repo.set_hourly_rate("u1", "c1", Some(rate)).await.unwrap());

        repo.assign_company("u1", "c1").await.unwrap();
        assert!(repo.set_hourly_rate("u1", "c1", Some(rate)).await.unwrap());

        let employees = repo.list_employees("c1").await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].hourly_rate, Some(rate));
    }
}
