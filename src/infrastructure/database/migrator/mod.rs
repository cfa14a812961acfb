//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_auth_sessions;
mod m20240101_000003_create_companies;
mod m20240101_000004_create_profiles;
mod m20240101_000005_create_time_entries;
mod m20240101_000006_create_invitations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_auth_sessions::Migration),
            Box::new(m20240101_000003_create_companies::Migration),
            Box::new(m20240101_000004_create_profiles::Migration),
            Box::new(m20240101_000005_create_time_entries::Migration),
            Box::new(m20240101_000006_create_invitations::Migration),
        ]
    }
}
