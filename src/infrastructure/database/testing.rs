//! In-memory database fixtures for tests

use rand::Rng;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use super::entities::profile::ProfileRole;
use super::entities::{company, profile, user};
use super::migrator::Migrator;
use crate::shared::store_now;

/// Fresh migrated SQLite database. A single connection keeps the
/// in-memory database alive for the whole test.
pub(crate) async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

async fn seed(db: &DatabaseConnection, id: &str, email: &str, role: ProfileRole) {
    let now = store_now();
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-hash".to_string()),
        created_at: Set(now),
        last_sign_in_at: Set(None),
    }
    .insert(db)
    .await
    .expect("seed user");
    profile::ActiveModel {
        id: Set(id.to_string()),
        full_name: Set(format!("User {}", id)),
        email: Set(email.to_string()),
        role: Set(role),
        company_id: Set(None),
        hourly_rate_cents: Set(None),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed profile");
}

/// Employee without a company
pub(crate) async fn seed_user(db: &DatabaseConnection, id: &str, email: &str) {
    seed(db, id, email, ProfileRole::Employee).await;
}

/// Admin without a company
pub(crate) async fn seed_admin(db: &DatabaseConnection, id: &str, email: &str) {
    seed(db, id, email, ProfileRole::Admin).await;
}

/// Company row only; the owner's profile is left untouched.
pub(crate) async fn seed_company(db: &DatabaseConnection, id: &str, owner_id: &str, code: &str) {
    company::ActiveModel {
        id: Set(id.to_string()),
        owner_id: Set(owner_id.to_string()),
        name: Set(format!("Company {}", id)),
        company_code: Set(code.to_string()),
        created_at: Set(store_now()),
    }
    .insert(db)
    .await
    .expect("seed company");
}

/// Employee already attached to `company_id`, creating the company and
/// its admin owner on first use.
pub(crate) async fn seed_employee_in(db: &DatabaseConnection, user_id: &str, company_id: &str) {
    let exists = company::Entity::find_by_id(company_id.to_string())
        .one(db)
        .await
        .expect("lookup company")
        .is_some();
    if !exists {
        let owner = format!("owner-{}", company_id);
        seed_admin(db, &owner, &format!("{}@example.com", owner)).await;
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        seed_company(db, company_id, &owner, &code).await;
        set_company(db, &owner, company_id).await;
    }
    seed_user(db, user_id, &format!("{}@example.com", user_id)).await;
    set_company(db, user_id, company_id).await;
}

async fn set_company(db: &DatabaseConnection, profile_id: &str, company_id: &str) {
    let model = profile::Entity::find_by_id(profile_id.to_string())
        .one(db)
        .await
        .expect("lookup profile")
        .expect("profile exists");
    let mut active: profile::ActiveModel = model.into();
    active.company_id = Set(Some(company_id.to_string()));
    active.update(db).await.expect("set company");
}
