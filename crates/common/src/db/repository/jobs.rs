use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait, Unchanged,
};
use uuid::Uuid;

use super::{contains_ci, Repository};
use crate::db::models::*;
use crate::domain::form_fields::FormPlan;
use crate::errors::Result;

/// Public listing filters; every field is optional
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub role: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    /// Jobs paying at least this much at the top of their range
    pub salary_min: Option<i32>,
    /// Jobs starting at or below this
    pub salary_max: Option<i32>,
    pub company_id: Option<Uuid>,
    /// Free text over title, description and company name
    pub search: Option<String>,
}

impl JobFilters {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all()
            .add(JobColumn::Status.eq(JobStatus::Active))
            .add(CompanyColumn::IsActive.eq(true));

        if let Some(role) = self.role.as_deref().filter(|r| !r.trim().is_empty()) {
            cond = cond.add(contains_ci((JobEntity, JobColumn::RoleCategory), role));
        }
        if let Some(job_type) = self.job_type {
            cond = cond.add(JobColumn::JobType.eq(job_type));
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            cond = cond.add(contains_ci((JobEntity, JobColumn::Location), location));
        }
        if let Some(remote) = self.is_remote {
            cond = cond.add(JobColumn::IsRemote.eq(remote));
        }
        if let Some(min) = self.salary_min {
            cond = cond.add(JobColumn::SalaryMax.gte(min));
        }
        if let Some(max) = self.salary_max {
            cond = cond.add(JobColumn::SalaryMin.lte(max));
        }
        if let Some(company_id) = self.company_id {
            cond = cond.add(JobColumn::CompanyId.eq(company_id));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            cond = cond.add(
                Condition::any()
                    .add(contains_ci((JobEntity, JobColumn::Title), search))
                    .add(contains_ci((JobEntity, JobColumn::Description), search))
                    .add(contains_ci((CompanyEntity, CompanyColumn::Name), search)),
            );
        }
        cond
    }
}

fn field_row(field: JobFormField) -> JobFormFieldActiveModel {
    JobFormFieldActiveModel {
        id: Set(field.id),
        job_id: Set(field.job_id),
        label: Set(field.label),
        field_type: Set(field.field_type),
        is_required: Set(field.is_required),
        is_default: Set(field.is_default),
        options: Set(field.options),
        placeholder: Set(field.placeholder),
        display_order: Set(field.display_order),
        created_at: Set(field.created_at),
    }
}

impl Repository {
    // ========================================================================
    // Job Operations
    // ========================================================================

    /// Insert a job together with its form in one transaction
    pub async fn create_job_with_fields(
        &self,
        job: JobActiveModel,
        fields: Vec<JobFormField>,
    ) -> Result<Job> {
        let txn = self.write_conn().begin().await?;

        let job = job.insert(&txn).await?;
        if !fields.is_empty() {
            JobFormFieldEntity::insert_many(fields.into_iter().map(field_row))
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(job)
    }

    /// Find job by ID
    pub async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        JobEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_job_with_company(&self, id: Uuid) -> Result<Option<(Job, Option<Company>)>> {
        JobEntity::find_by_id(id)
            .find_also_related(CompanyEntity)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// An employer's own postings, newest first
    pub async fn list_employer_jobs(&self, employer_id: Uuid) -> Result<Vec<Job>> {
        JobEntity::find()
            .filter(JobColumn::EmployerId.eq(employer_id))
            .order_by_desc(JobColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Application count per job; jobs without applications are absent
    pub async fn application_counts(&self, job_ids: Vec<Uuid>) -> Result<HashMap<Uuid, i64>> {
        let rows: Vec<(Uuid, i64)> = ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::JobId)
            .column_as(ApplicationColumn::Id.count(), "count")
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .group_by(ApplicationColumn::JobId)
            .into_tuple()
            .all(self.read_conn())
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Public listing: active jobs of active companies, newest first
    pub async fn list_public_jobs(
        &self,
        filters: &JobFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<(Job, Option<Company>)>, u64)> {
        let paginator = JobEntity::find()
            .find_also_related(CompanyEntity)
            .filter(filters.condition())
            .order_by_desc(JobColumn::CreatedAt)
            .paginate(self.read_conn(), limit);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Which of these jobs the seeker has applied to
    pub async fn applied_job_ids(
        &self,
        job_seeker_id: Uuid,
        job_ids: Vec<Uuid>,
    ) -> Result<HashSet<Uuid>> {
        let ids: Vec<Uuid> = ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::JobId)
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .filter(ApplicationColumn::JobId.is_in(job_ids))
            .into_tuple()
            .all(self.read_conn())
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// Remove a job and everything hanging off it, atomically
    pub async fn delete_job_cascade(&self, job_id: Uuid) -> Result<()> {
        let txn = self.write_conn().begin().await?;
        Self::delete_jobs_in(&txn, vec![job_id]).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Responses, then applications, then form fields, then the jobs
    pub(super) async fn delete_jobs_in<C: ConnectionTrait>(
        conn: &C,
        job_ids: Vec<Uuid>,
    ) -> Result<()> {
        let applications = ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::Id)
            .filter(ApplicationColumn::JobId.is_in(job_ids.clone()))
            .into_query();

        ApplicationResponseEntity::delete_many()
            .filter(ApplicationResponseColumn::ApplicationId.in_subquery(applications))
            .exec(conn)
            .await?;

        ApplicationEntity::delete_many()
            .filter(ApplicationColumn::JobId.is_in(job_ids.clone()))
            .exec(conn)
            .await?;

        JobFormFieldEntity::delete_many()
            .filter(JobFormFieldColumn::JobId.is_in(job_ids.clone()))
            .exec(conn)
            .await?;

        JobEntity::delete_many()
            .filter(JobColumn::Id.is_in(job_ids))
            .exec(conn)
            .await?;

        Ok(())
    }

    // ========================================================================
    // Form Builder Operations
    // ========================================================================

    /// A job's form in display order
    pub async fn list_form_fields(&self, job_id: Uuid) -> Result<Vec<JobFormField>> {
        JobFormFieldEntity::find()
            .filter(JobFormFieldColumn::JobId.eq(job_id))
            .order_by_asc(JobFormFieldColumn::DisplayOrder)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_form_field(&self, id: Uuid) -> Result<Option<JobFormField>> {
        JobFormFieldEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Swap every custom field of a job for a new set; defaults stay
    pub async fn replace_custom_fields(&self, job_id: Uuid, fields: Vec<JobFormField>) -> Result<()> {
        let txn = self.write_conn().begin().await?;

        JobFormFieldEntity::delete_many()
            .filter(JobFormFieldColumn::JobId.eq(job_id))
            .filter(JobFormFieldColumn::IsDefault.eq(false))
            .exec(&txn)
            .await?;

        if !fields.is_empty() {
            JobFormFieldEntity::insert_many(fields.into_iter().map(field_row))
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn apply_form_plan(&self, plan: FormPlan) -> Result<()> {
        let txn = self.write_conn().begin().await?;

        for field in plan.updates {
            let active = JobFormFieldActiveModel {
                id: Unchanged(field.id),
                label: Set(field.label),
                field_type: Set(field.field_type),
                is_required: Set(field.is_required),
                options: Set(field.options),
                placeholder: Set(field.placeholder),
                display_order: Set(field.display_order),
                ..Default::default()
            };
            active.update(&txn).await?;
        }

        if !plan.inserts.is_empty() {
            JobFormFieldEntity::insert_many(plan.inserts.into_iter().map(field_row))
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_form_field(&self, id: Uuid) -> Result<()> {
        JobFormFieldEntity::delete_by_id(id)
            .exec(self.write_conn())
            .await?;
        Ok(())
    }
}
