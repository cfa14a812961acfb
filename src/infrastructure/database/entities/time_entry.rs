//! Time entry entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub company_id: String,

    pub clock_in: DateTimeUtc,

    /// Null while the entry is open. At most one open row per user.
    #[sea_orm(nullable)]
    pub clock_out: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub clock_in_latitude: Option<f64>,
    #[sea_orm(nullable)]
    pub clock_in_longitude: Option<f64>,
    #[sea_orm(nullable)]
    pub clock_out_latitude: Option<f64>,
    #[sea_orm(nullable)]
    pub clock_out_longitude: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Profile,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
