//! Create time_entries table

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_companies::Companies;
use super::m20240101_000004_create_profiles::Profiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeEntries::UserId).string().not_null())
                    .col(ColumnDef::new(TimeEntries::CompanyId).string().not_null())
                    .col(
                        ColumnDef::new(TimeEntries::ClockIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeEntries::ClockOut).timestamp_with_time_zone())
                    .col(ColumnDef::new(TimeEntries::ClockInLatitude).double())
                    .col(ColumnDef::new(TimeEntries::ClockInLongitude).double())
                    .col(ColumnDef::new(TimeEntries::ClockOutLatitude).double())
                    .col(ColumnDef::new(TimeEntries::ClockOutLongitude).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_entries_user")
                            .from(TimeEntries::Table, TimeEntries::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_entries_company")
                            .from(TimeEntries::Table, TimeEntries::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_entries_company_clock_in")
                    .table(TimeEntries::Table)
                    .col(TimeEntries::CompanyId)
                    .col(TimeEntries::ClockIn)
                    .to_owned(),
            )
            .await?;

        // At most one open entry per user. sea-query has no partial index
        // builder; this statement is valid for both SQLite and Postgres.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_time_entries_single_open \
                 ON time_entries (user_id) WHERE clock_out IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TimeEntries {
    Table,
    Id,
    UserId,
    CompanyId,
    ClockIn,
    ClockOut,
    ClockInLatitude,
    ClockInLongitude,
    ClockOutLatitude,
    ClockOutLongitude,
}
