use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::{contains_ci, ApplicantRow, Repository};
use crate::db::models::*;
use crate::errors::Result;

impl Repository {
    // ========================================================================
    // Dashboard Reads
    // ========================================================================

    /// Jobs a dashboard covers: the whole company once one is selected,
    /// otherwise the employer's own postings
    pub async fn scoped_job_ids(&self, employer_id: Uuid, company_id: Option<Uuid>) -> Result<Vec<Uuid>> {
        let scope = match company_id {
            Some(company_id) => JobColumn::CompanyId.eq(company_id),
            None => JobColumn::EmployerId.eq(employer_id),
        };

        JobEntity::find()
            .select_only()
            .column(JobColumn::Id)
            .filter(scope)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn job_status_counts(&self, job_ids: Vec<Uuid>) -> Result<Vec<(JobStatus, i64)>> {
        JobEntity::find()
            .select_only()
            .column(JobColumn::Status)
            .column_as(JobColumn::Id.count(), "count")
            .filter(JobColumn::Id.is_in(job_ids))
            .group_by(JobColumn::Status)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn job_application_status_counts(
        &self,
        job_ids: Vec<Uuid>,
    ) -> Result<Vec<(ApplicationStatus, i64)>> {
        ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::Status)
            .column_as(ApplicationColumn::Id.count(), "count")
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .group_by(ApplicationColumn::Status)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn job_application_dates(
        &self,
        job_ids: Vec<Uuid>,
    ) -> Result<Vec<DateTimeWithTimeZone>> {
        ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::AppliedAt)
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Application count per role category
    pub async fn role_application_counts(&self, job_ids: Vec<Uuid>) -> Result<Vec<(String, i64)>> {
        ApplicationEntity::find()
            .select_only()
            .column(JobColumn::RoleCategory)
            .column_as(ApplicationColumn::Id.count(), "count")
            .inner_join(JobEntity)
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .group_by(JobColumn::RoleCategory)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Latest applications across the given jobs, with applicant rows
    pub async fn recent_job_applications(
        &self,
        job_ids: Vec<Uuid>,
        limit: u64,
    ) -> Result<Vec<ApplicantRow>> {
        let rows = ApplicationEntity::find()
            .find_also_related(JobSeekerEntity)
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .order_by_desc(ApplicationColumn::AppliedAt)
            .limit(limit)
            .all(self.read_conn())
            .await?;

        self.attach_users(rows).await
    }

    pub async fn find_jobs_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Job>> {
        JobEntity::find()
            .filter(JobColumn::Id.is_in(ids))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Description and requirements of every active posting
    pub async fn active_job_texts(&self) -> Result<Vec<(String, Option<String>)>> {
        JobEntity::find()
            .select_only()
            .column(JobColumn::Description)
            .column(JobColumn::Requirements)
            .filter(JobColumn::Status.eq(JobStatus::Active))
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Active posting count per company
    pub async fn active_job_counts_by_company(&self) -> Result<Vec<(Uuid, i64)>> {
        JobEntity::find()
            .select_only()
            .column(JobColumn::CompanyId)
            .column_as(JobColumn::Id.count(), "count")
            .filter(JobColumn::Status.eq(JobStatus::Active))
            .group_by(JobColumn::CompanyId)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Newest active jobs, preferring ones whose role matches any given role
    pub async fn recommended_jobs(
        &self,
        preferred_roles: &[String],
        limit: u64,
    ) -> Result<Vec<(Job, Option<Company>)>> {
        let base = || {
            JobEntity::find()
                .find_also_related(CompanyEntity)
                .filter(JobColumn::Status.eq(JobStatus::Active))
                .filter(CompanyColumn::IsActive.eq(true))
                .order_by_desc(JobColumn::CreatedAt)
                .limit(limit)
        };

        let roles: Vec<&String> = preferred_roles.iter().filter(|r| !r.trim().is_empty()).collect();
        if !roles.is_empty() {
            let matching = roles.iter().fold(Condition::any(), |cond, role| {
                cond.add(contains_ci((JobEntity, JobColumn::RoleCategory), role))
                    .add(contains_ci((JobEntity, JobColumn::Title), role))
            });
            let jobs = base().filter(matching).all(self.read_conn()).await?;
            if !jobs.is_empty() {
                return Ok(jobs);
            }
        }

        base().all(self.read_conn()).await.map_err(Into::into)
    }
}
