//! SeaORM implementation of CompanyRepository

use async_trait::async_trait;
use log::{debug, info, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::{db_err, is_unique_violation};
use crate::domain::company::{Company, CompanyCode, CompanyRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{company, profile};

pub struct SeaOrmCompanyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(c: company::Model) -> Company {
    Company {
        id: c.id,
        owner_id: c.owner_id,
        name: c.name,
        code: CompanyCode::from_stored(c.company_code),
        created_at: c.created_at,
    }
}

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Company>> {
        let model = company::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_code(&self, code: &CompanyCode) -> DomainResult<Option<Company>> {
        let model = company::Entity::find()
            .filter(company::Column::CompanyCode.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create_with_owner(&self, new_company: Company) -> DomainResult<Company> {
        debug!(
            "Creating company '{}' for owner {}",
            new_company.name, new_company.owner_id
        );
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = company::ActiveModel {
            id: Set(new_company.id.clone()),
            owner_id: Set(new_company.owner_id.clone()),
            name: Set(new_company.name.clone()),
            company_code: Set(new_company.code.as_str().to_string()),
            created_at: Set(new_company.created_at),
        };
        let created = model.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(format!(
                    "Company code '{}' is already taken",
                    new_company.code
                ))
            } else {
                db_err(e)
            }
        })?;

        let updated = profile::Entity::update_many()
            .col_expr(profile::Column::CompanyId, Expr::value(created.id.clone()))
            .filter(profile::Column::Id.eq(new_company.owner_id.as_str()))
            .filter(profile::Column::CompanyId.is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            warn!(
                "Owner {} already has a company, rolling back",
                new_company.owner_id
            );
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::AlreadyInCompany);
        }

        txn.commit().await.map_err(db_err)?;
        info!("Company created: {} ({})", created.id, created.company_code);
        Ok(model_to_domain(created))
    }
}
