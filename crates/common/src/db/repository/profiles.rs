use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::Repository;
use crate::db::models::*;
use crate::errors::Result;

impl Repository {
    // ========================================================================
    // Job Seeker Operations
    // ========================================================================

    pub async fn find_job_seeker_by_user(&self, user_id: Uuid) -> Result<Option<JobSeeker>> {
        JobSeekerEntity::find()
            .filter(JobSeekerColumn::UserId.eq(user_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_job_seeker(&self, id: Uuid) -> Result<Option<JobSeeker>> {
        JobSeekerEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All entries are scoped by the owning seeker; someone else's id is "not found"
    pub async fn find_education(&self, job_seeker_id: Uuid, id: Uuid) -> Result<Option<Education>> {
        EducationEntity::find_by_id(id)
            .filter(EducationColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn list_education(&self, job_seeker_id: Uuid) -> Result<Vec<Education>> {
        EducationEntity::find()
            .filter(EducationColumn::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(EducationColumn::StartDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn count_education(&self, job_seeker_id: Uuid) -> Result<u64> {
        EducationEntity::find()
            .filter(EducationColumn::JobSeekerId.eq(job_seeker_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Returns whether a row was removed
    pub async fn delete_education(&self, job_seeker_id: Uuid, id: Uuid) -> Result<bool> {
        let result = EducationEntity::delete_many()
            .filter(EducationColumn::Id.eq(id))
            .filter(EducationColumn::JobSeekerId.eq(job_seeker_id))
            .exec(self.write_conn())
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_experience(
        &self,
        job_seeker_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Experience>> {
        ExperienceEntity::find_by_id(id)
            .filter(ExperienceColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn list_experience(&self, job_seeker_id: Uuid) -> Result<Vec<Experience>> {
        ExperienceEntity::find()
            .filter(ExperienceColumn::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(ExperienceColumn::StartDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn count_experience(&self, job_seeker_id: Uuid) -> Result<u64> {
        ExperienceEntity::find()
            .filter(ExperienceColumn::JobSeekerId.eq(job_seeker_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn delete_experience(&self, job_seeker_id: Uuid, id: Uuid) -> Result<bool> {
        let result = ExperienceEntity::delete_many()
            .filter(ExperienceColumn::Id.eq(id))
            .filter(ExperienceColumn::JobSeekerId.eq(job_seeker_id))
            .exec(self.write_conn())
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_project(&self, job_seeker_id: Uuid, id: Uuid) -> Result<Option<Project>> {
        ProjectEntity::find_by_id(id)
            .filter(ProjectColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn list_projects(&self, job_seeker_id: Uuid) -> Result<Vec<Project>> {
        ProjectEntity::find()
            .filter(ProjectColumn::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(ProjectColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn count_projects(&self, job_seeker_id: Uuid) -> Result<u64> {
        ProjectEntity::find()
            .filter(ProjectColumn::JobSeekerId.eq(job_seeker_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn delete_project(&self, job_seeker_id: Uuid, id: Uuid) -> Result<bool> {
        let result = ProjectEntity::delete_many()
            .filter(ProjectColumn::Id.eq(id))
            .filter(ProjectColumn::JobSeekerId.eq(job_seeker_id))
            .exec(self.write_conn())
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_preferences(&self, job_seeker_id: Uuid) -> Result<Option<Preferences>> {
        PreferencesEntity::find()
            .filter(PreferencesColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Employer Operations
    // ========================================================================

    pub async fn find_employer_by_user(&self, user_id: Uuid) -> Result<Option<Employer>> {
        EmployerEntity::find()
            .filter(EmployerColumn::UserId.eq(user_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_employer(&self, id: Uuid) -> Result<Option<Employer>> {
        EmployerEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Hard-delete an employer and everything they own, atomically:
    /// responses, applications, form fields, jobs, the employer row, the user.
    pub async fn delete_employer_account(&self, employer_id: Uuid, user_id: Uuid) -> Result<()> {
        let txn = self.write_conn().begin().await?;

        let job_ids: Vec<Uuid> = JobEntity::find()
            .filter(JobColumn::EmployerId.eq(employer_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|job| job.id)
            .collect();

        if !job_ids.is_empty() {
            Self::delete_jobs_in(&txn, job_ids).await?;
        }

        EmployerEntity::delete_by_id(employer_id).exec(&txn).await?;
        UserEntity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
