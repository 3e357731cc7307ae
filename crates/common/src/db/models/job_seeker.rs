//! Job seeker profile entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_seekers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub resume_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub linkedin_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub github_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub portfolio_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub skills: Vec<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::education::Entity")]
    Educations,

    #[sea_orm(has_many = "super::experience::Entity")]
    Experiences,

    #[sea_orm(has_many = "super::project::Entity")]
    Projects,

    #[sea_orm(has_one = "super::preferences::Entity")]
    Preferences,

    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::education::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Educations.def()
    }
}

impl Related<super::experience::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiences.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::preferences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Preferences.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
