use std::collections::HashMap;

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::Repository;
use crate::db::models::*;
use crate::errors::Result;

/// A seeker's application with the posting it targets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<Job>,
    pub company: Option<Company>,
}

/// An application as the employer sees it
#[derive(Debug, Clone)]
pub struct ApplicantRow {
    pub application: Application,
    pub job_seeker: Option<JobSeeker>,
    pub user: Option<User>,
}

impl Repository {
    // ========================================================================
    // Application Operations
    // ========================================================================

    pub async fn find_application_by_job_and_seeker(
        &self,
        job_id: Uuid,
        job_seeker_id: Uuid,
    ) -> Result<Option<Application>> {
        ApplicationEntity::find()
            .filter(ApplicationColumn::JobId.eq(job_id))
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.write_conn())
            .await
            .map_err(Into::into)
    }

    /// Insert an application and all of its answers in one transaction
    pub async fn create_application(
        &self,
        application: Application,
        responses: Vec<ApplicationResponse>,
    ) -> Result<Application> {
        let txn = self.write_conn().begin().await?;

        let application = ApplicationActiveModel {
            id: Set(application.id),
            job_id: Set(application.job_id),
            job_seeker_id: Set(application.job_seeker_id),
            status: Set(application.status),
            employer_notes: Set(application.employer_notes),
            applied_at: Set(application.applied_at),
            updated_at: Set(application.updated_at),
        }
        .insert(&txn)
        .await?;

        if !responses.is_empty() {
            let rows = responses.into_iter().map(|r| ApplicationResponseActiveModel {
                id: Set(r.id),
                application_id: Set(r.application_id),
                field_id: Set(r.field_id),
                answer: Set(r.answer),
            });
            ApplicationResponseEntity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(application)
    }

    /// Only ever returns the caller's own application
    pub async fn find_seeker_application(
        &self,
        job_seeker_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Application>> {
        ApplicationEntity::find_by_id(id)
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Application scoped to a job
    pub async fn find_job_application(&self, job_id: Uuid, id: Uuid) -> Result<Option<Application>> {
        ApplicationEntity::find_by_id(id)
            .filter(ApplicationColumn::JobId.eq(job_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// A seeker's applications, newest first, optionally by status
    pub async fn list_seeker_applications(
        &self,
        job_seeker_id: Uuid,
        status: Option<ApplicationStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<ApplicationWithJob>> {
        let mut query = ApplicationEntity::find()
            .find_also_related(JobEntity)
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(ApplicationColumn::AppliedAt);
        if let Some(status) = status {
            query = query.filter(ApplicationColumn::Status.eq(status));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let rows = query.all(self.read_conn()).await?;

        self.attach_companies(rows).await
    }

    pub(super) async fn attach_companies(
        &self,
        rows: Vec<(Application, Option<Job>)>,
    ) -> Result<Vec<ApplicationWithJob>> {
        let company_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(_, job)| job.as_ref().map(|j| j.company_id))
            .collect();
        let companies: HashMap<Uuid, Company> = self
            .find_companies_by_ids(company_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(application, job)| {
                let company = job.as_ref().and_then(|j| companies.get(&j.company_id).cloned());
                ApplicationWithJob {
                    application,
                    job,
                    company,
                }
            })
            .collect())
    }

    /// Applicants for a job, newest first, with their profile and user rows
    pub async fn list_job_applicants(&self, job_id: Uuid) -> Result<Vec<ApplicantRow>> {
        let rows = ApplicationEntity::find()
            .find_also_related(JobSeekerEntity)
            .filter(ApplicationColumn::JobId.eq(job_id))
            .order_by_desc(ApplicationColumn::AppliedAt)
            .all(self.read_conn())
            .await?;

        self.attach_users(rows).await
    }

    pub(super) async fn attach_users(
        &self,
        rows: Vec<(Application, Option<JobSeeker>)>,
    ) -> Result<Vec<ApplicantRow>> {
        let user_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(_, seeker)| seeker.as_ref().map(|s| s.user_id))
            .collect();
        let users: HashMap<Uuid, User> = self
            .find_users_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(application, job_seeker)| {
                let user = job_seeker.as_ref().and_then(|s| users.get(&s.user_id).cloned());
                ApplicantRow {
                    application,
                    job_seeker,
                    user,
                }
            })
            .collect())
    }

    /// Answers with the field each one belongs to, in form order
    pub async fn list_responses(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<(ApplicationResponse, Option<JobFormField>)>> {
        let mut rows = ApplicationResponseEntity::find()
            .find_also_related(JobFormFieldEntity)
            .filter(ApplicationResponseColumn::ApplicationId.eq(application_id))
            .all(self.read_conn())
            .await?;

        rows.sort_by_key(|(_, field)| field.as_ref().map(|f| f.display_order).unwrap_or(i32::MAX));
        Ok(rows)
    }

    pub async fn update_application_status(
        &self,
        application: Application,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let mut active: ApplicationActiveModel = application.into();
        active.status = Set(status);
        if notes.is_some() {
            active.employer_notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Application count per status for one seeker
    pub async fn seeker_status_counts(
        &self,
        job_seeker_id: Uuid,
    ) -> Result<Vec<(ApplicationStatus, i64)>> {
        ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::Status)
            .column_as(ApplicationColumn::Id.count(), "count")
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .group_by(ApplicationColumn::Status)
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn seeker_application_dates(
        &self,
        job_seeker_id: Uuid,
    ) -> Result<Vec<DateTimeWithTimeZone>> {
        ApplicationEntity::find()
            .select_only()
            .column(ApplicationColumn::AppliedAt)
            .filter(ApplicationColumn::JobSeekerId.eq(job_seeker_id))
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }
}
