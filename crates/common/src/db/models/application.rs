//! Application entity: one per (job, job seeker)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::ApplicationStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub job_id: Uuid,

    #[sea_orm(indexed)]
    pub job_seeker_id: Uuid,

    pub status: ApplicationStatus,

    /// Employer-only remark attached on status changes
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_notes: Option<String>,

    pub applied_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id"
    )]
    Job,

    #[sea_orm(
        belongs_to = "super::job_seeker::Entity",
        from = "Column::JobSeekerId",
        to = "super::job_seeker::Column::Id"
    )]
    JobSeeker,

    #[sea_orm(has_many = "super::application_response::Entity")]
    Responses,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::job_seeker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobSeeker.def()
    }
}

impl Related<super::application_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
