//! Company entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::CompanySize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique among active companies, compared trimmed and case-insensitively
    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub website: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub logo_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub industry: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    pub size: Option<CompanySize>,

    pub founded_year: Option<i32>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employer::Entity")]
    Employers,

    #[sea_orm(has_many = "super::job::Entity")]
    Jobs,
}

impl Related<super::employer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employers.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
