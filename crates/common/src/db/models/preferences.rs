//! Job preferences, one per job seeker

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preferences")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub job_seeker_id: Uuid,

    pub preferred_roles: Vec<String>,

    /// `JobType` values
    pub preferred_job_types: Vec<String>,

    pub preferred_locations: Vec<String>,

    pub salary_expectation_min: Option<i32>,

    /// Never below `salary_expectation_min`
    pub salary_expectation_max: Option<i32>,

    pub open_to_remote: bool,

    pub willing_to_relocate: bool,

    pub updated_at: DateTimeWithTimeZone,
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
