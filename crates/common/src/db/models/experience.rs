//! Work experience entry owned by a job seeker

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "experiences")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub job_seeker_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub company_name: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    pub start_date: Date,

    pub end_date: Option<Date>,

    pub is_current: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_seeker::Entity",
        from = "Column::JobSeekerId",
        to = "super::job_seeker::Column::Id",
        on_delete = "Cascade"
    )]
    JobSeeker,
}

impl Related<super::job_seeker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobSeeker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
