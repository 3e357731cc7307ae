//! Job posting entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{JobStatus, JobType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub company_id: Uuid,

    #[sea_orm(indexed)]
    pub employer_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub role_category: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub responsibilities: Option<String>,

    pub job_type: JobType,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    pub is_remote: bool,

    pub salary_min: Option<i32>,

    pub salary_max: Option<i32>,

    pub openings: i32,

    pub status: JobStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn is_owned_by(&self, employer_id: Uuid) -> bool {
        self.employer_id == employer_id
    }

    /// Description and requirements, for free-text skill scanning
    pub fn searchable_text(&self) -> String {
        match &self.requirements {
            Some(requirements) => format!("{} {}", self.description, requirements),
            None => self.description.clone(),
        }
    }
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
        belongs_to = "super::employer::Entity",
        from = "Column::EmployerId",
        to = "super::employer::Column::Id"
    )]
    Employer,

    #[sea_orm(has_many = "super::job_form_field::Entity")]
    FormFields,

    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::employer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employer.def()
    }
}

impl Related<super::job_form_field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormFields.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
