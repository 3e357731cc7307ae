//! Application form field attached to a job

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::FieldType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_form_fields")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub job_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub label: String,

    pub field_type: FieldType,

    pub is_required: bool,

    /// Seeded at job creation; never deleted or edited by employers
    pub is_default: bool,

    pub options: Vec<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub placeholder: Option<String>,

    pub display_order: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id"
    )]
    Job,

    #[sea_orm(has_many = "super::application_response::Entity")]
    Responses,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::application_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
