//! User entity: credentials and basic details

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::UserRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Lower-cased, trimmed
    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    /// Argon2id PHC string
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    pub role: UserRole,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Name, phone and location are all present
    pub fn has_basic_details(&self) -> bool {
        let filled = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
        filled(Some(&self.name)) && filled(self.phone.as_deref()) && filled(self.location.as_deref())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::job_seeker::Entity")]
    JobSeeker,

    #[sea_orm(has_one = "super::employer::Entity")]
    Employer,
}

impl Related<super::job_seeker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobSeeker.def()
    }
}

impl Related<super::employer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
