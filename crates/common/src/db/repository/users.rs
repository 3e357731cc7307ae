use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::Repository;
use crate::db::models::*;
use crate::errors::Result;

impl Repository {
    // ========================================================================
    // User Operations
    // ========================================================================

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by (already normalized) email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_users_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<User>> {
        UserEntity::find()
            .filter(UserColumn::Id.is_in(ids))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Create a new user
    pub async fn create_user(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Result<User> {
        let now = chrono::Utc::now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            phone: Set(None),
            location: Set(None),
            role: Set(role),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(self.write_conn()).await.map_err(Into::into)
    }

    pub async fn update_basic_details(
        &self,
        user: User,
        name: String,
        phone: String,
        location: String,
    ) -> Result<User> {
        let mut active: UserActiveModel = user.into();
        active.name = Set(name);
        active.phone = Set(Some(phone));
        active.location = Set(Some(location));
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }
}
