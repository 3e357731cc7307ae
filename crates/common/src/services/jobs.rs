//! Job postings and their application forms

use std::collections::HashSet;

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{CompanyMember, EmployerIdentity};
use crate::db::models::*;
use crate::db::{JobFilters, Repository};
use crate::domain::form_fields::{self, FormFieldInput};
use crate::domain::{Page, PageMeta, PageParams};
use crate::errors::{AppError, Result};
use crate::metrics;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 2, max = 100, message = "Role category must be 2-100 characters"))]
    pub role_category: String,

    #[validate(length(min = 10, max = 20000, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(length(max = 20000))]
    pub requirements: Option<String>,

    #[validate(length(max = 20000))]
    pub responsibilities: Option<String>,

    pub job_type: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[serde(default)]
    pub is_remote: bool,

    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,

    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,

    #[validate(range(min = 1, max = 10000))]
    pub openings: Option<i32>,

    /// Custom fields appended after the defaults
    #[serde(default)]
    pub form_fields: Vec<FormFieldInput>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Role category must be 2-100 characters"))]
    pub role_category: Option<String>,

    #[validate(length(min = 10, max = 20000, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 20000))]
    pub requirements: Option<String>,

    #[validate(length(max = 20000))]
    pub responsibilities: Option<String>,

    pub job_type: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub is_remote: Option<bool>,

    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,

    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,

    #[validate(range(min = 1, max = 10000))]
    pub openings: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    #[serde(default)]
    pub fields: Vec<FormFieldInput>,
}

/// Query string of the public listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub role: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl JobListQuery {
    pub fn filters(&self) -> Result<JobFilters> {
        Ok(JobFilters {
            role: self.role.clone(),
            job_type: self.job_type.as_deref().map(parse_job_type).transpose()?,
            location: self.location.clone(),
            is_remote: self.is_remote,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            company_id: self.company_id,
            search: self.search.clone(),
        })
    }

    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A posting with its application count, for the owner
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: Job,
    pub application_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<Company>,
    pub form_fields: Vec<JobFormField>,
    pub application_count: i64,
}

/// Company fields shown next to public postings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub industry: String,
    pub location: Option<String>,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            logo_url: company.logo_url,
            industry: company.industry,
            location: company.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicJob {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<CompanySummary>,
    pub has_applied: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicJobDetail {
    #[serde(flatten)]
    pub listing: PublicJob,
    pub form_fields: Vec<JobFormField>,
}

fn parse_job_type(raw: &str) -> Result<JobType> {
    JobType::parse(raw)
        .ok_or_else(|| AppError::validation("jobType", format!("Unknown job type '{}'", raw)))
}

fn check_salary(min: Option<i32>, max: Option<i32>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if max < min => Err(AppError::validation(
            "salaryMax",
            "Maximum salary cannot be below minimum salary",
        )),
        _ => Ok(()),
    }
}

/// Load a job the caller must own; absent is 404, someone else's is 403
pub(crate) async fn owned_job(
    repo: &Repository,
    employer: &EmployerIdentity,
    job_id: Uuid,
) -> Result<Job> {
    let employer_id = employer.require_profile()?;
    let job = repo
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found"))?;

    if !job.is_owned_by(employer_id) {
        return Err(AppError::forbidden("You do not own this job"));
    }
    Ok(job)
}

pub struct JobService {
    repo: Repository,
}

impl JobService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    async fn owned_by(&self, employer: &EmployerIdentity, job_id: Uuid) -> Result<Job> {
        owned_job(&self.repo, employer, job_id).await
    }

    // ========================================================================
    // Employer side
    // ========================================================================

    /// Create a job for the caller's company, seeded with the default form
    pub async fn create(&self, member: &CompanyMember, request: CreateJobRequest) -> Result<JobDetail> {
        request.validate()?;
        let job_type = parse_job_type(&request.job_type)?;
        check_salary(request.salary_min, request.salary_max)?;

        let now = chrono::Utc::now();
        let job_id = Uuid::new_v4();
        let fields = form_fields::fields_for_new_job(job_id, request.form_fields, now.into())?;

        let job = JobActiveModel {
            id: Set(job_id),
            company_id: Set(member.company_id),
            employer_id: Set(member.employer_id),
            title: Set(request.title.trim().to_string()),
            role_category: Set(request.role_category.trim().to_string()),
            description: Set(request.description),
            requirements: Set(request.requirements),
            responsibilities: Set(request.responsibilities),
            job_type: Set(job_type),
            location: Set(request.location),
            is_remote: Set(request.is_remote),
            salary_min: Set(request.salary_min),
            salary_max: Set(request.salary_max),
            openings: Set(request.openings.unwrap_or(1)),
            status: Set(JobStatus::Active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let job = self.repo.create_job_with_fields(job, fields.clone()).await?;

        metrics::record_job_created();
        info!(job_id = %job.id, company_id = %member.company_id, fields = fields.len(), "Job created");

        let company = self.repo.find_company(member.company_id).await?;
        Ok(JobDetail {
            job,
            company,
            form_fields: fields,
            application_count: 0,
        })
    }

    pub async fn update(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        request: UpdateJobRequest,
    ) -> Result<Job> {
        request.validate()?;
        let job = self.owned_by(employer, job_id).await?;

        let salary_min = request.salary_min.or(job.salary_min);
        let salary_max = request.salary_max.or(job.salary_max);
        check_salary(salary_min, salary_max)?;

        let mut active: JobActiveModel = job.into();
        if let Some(title) = request.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(role) = request.role_category {
            active.role_category = Set(role.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if request.requirements.is_some() {
            active.requirements = Set(request.requirements);
        }
        if request.responsibilities.is_some() {
            active.responsibilities = Set(request.responsibilities);
        }
        if let Some(raw) = request.job_type.as_deref() {
            active.job_type = Set(parse_job_type(raw)?);
        }
        if request.location.is_some() {
            active.location = Set(request.location);
        }
        if let Some(remote) = request.is_remote {
            active.is_remote = Set(remote);
        }
        if let Some(openings) = request.openings {
            active.openings = Set(openings);
        }
        active.salary_min = Set(salary_min);
        active.salary_max = Set(salary_max);
        active.updated_at = Set(chrono::Utc::now().into());

        let job = self.repo.update(active).await?;
        info!(job_id = %job.id, "Job updated");
        Ok(job)
    }

    pub async fn update_status(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        request: UpdateStatusRequest,
    ) -> Result<Job> {
        let status = JobStatus::parse(&request.status).ok_or_else(|| {
            AppError::validation("status", "Status must be ACTIVE, PAUSED or COMPLETED")
        })?;
        let job = self.owned_by(employer, job_id).await?;

        let previous = job.status;
        let mut active: JobActiveModel = job.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());

        let job = self.repo.update(active).await?;
        info!(job_id = %job.id, from = ?previous, to = ?status, "Job status changed");
        Ok(job)
    }

    /// Delete a job with its form, applications and answers
    pub async fn delete(&self, employer: &EmployerIdentity, job_id: Uuid) -> Result<()> {
        let job = self.owned_by(employer, job_id).await?;
        self.repo.delete_job_cascade(job.id).await?;

        info!(job_id = %job.id, "Job deleted");
        Ok(())
    }

    pub async fn mine(&self, employer: &EmployerIdentity) -> Result<Vec<JobSummary>> {
        let employer_id = employer.require_profile()?;
        let jobs = self.repo.list_employer_jobs(employer_id).await?;
        let counts = self
            .repo
            .application_counts(jobs.iter().map(|j| j.id).collect())
            .await?;

        Ok(jobs
            .into_iter()
            .map(|job| JobSummary {
                application_count: counts.get(&job.id).copied().unwrap_or(0),
                job,
            })
            .collect())
    }

    pub async fn owner_detail(&self, employer: &EmployerIdentity, job_id: Uuid) -> Result<JobDetail> {
        let job = self.owned_by(employer, job_id).await?;

        let (company, form_fields, counts) = futures::try_join!(
            self.repo.find_company(job.company_id),
            self.repo.list_form_fields(job.id),
            self.repo.application_counts(vec![job.id]),
        )?;

        Ok(JobDetail {
            application_count: counts.get(&job.id).copied().unwrap_or(0),
            job,
            company,
            form_fields,
        })
    }

    // ========================================================================
    // Form builder
    // ========================================================================

    pub async fn form(&self, employer: &EmployerIdentity, job_id: Uuid) -> Result<Vec<JobFormField>> {
        let job = self.owned_by(employer, job_id).await?;
        self.repo.list_form_fields(job.id).await
    }

    /// Replace every custom field; the defaults are untouched
    pub async fn replace_form(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        request: FormRequest,
    ) -> Result<Vec<JobFormField>> {
        let job = self.owned_by(employer, job_id).await?;
        let existing = self.repo.list_form_fields(job.id).await?;

        let fields = form_fields::plan_replace(
            job.id,
            &existing,
            request.fields,
            chrono::Utc::now().into(),
        )?;
        let count = fields.len();
        self.repo.replace_custom_fields(job.id, fields).await?;

        info!(job_id = %job.id, custom_fields = count, "Form replaced");
        self.repo.list_form_fields(job.id).await
    }

    /// Update listed fields by id and append new ones
    pub async fn upsert_form(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        request: FormRequest,
    ) -> Result<Vec<JobFormField>> {
        let job = self.owned_by(employer, job_id).await?;
        let existing = self.repo.list_form_fields(job.id).await?;

        let plan = form_fields::plan_upsert(
            job.id,
            &existing,
            request.fields,
            chrono::Utc::now().into(),
        )?;
        info!(
            job_id = %job.id,
            updated = plan.updates.len(),
            inserted = plan.inserts.len(),
            "Form upserted"
        );
        self.repo.apply_form_plan(plan).await?;

        self.repo.list_form_fields(job.id).await
    }

    pub async fn delete_form_field(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        field_id: Uuid,
    ) -> Result<()> {
        let job = self.owned_by(employer, job_id).await?;

        let field = self
            .repo
            .find_form_field(field_id)
            .await?
            .filter(|f| f.job_id == job.id)
            .ok_or_else(|| AppError::not_found("Form field not found"))?;
        form_fields::ensure_editable(&field)?;

        self.repo.delete_form_field(field.id).await?;
        info!(job_id = %job.id, field_id = %field.id, "Form field deleted");
        Ok(())
    }

    // ========================================================================
    // Public side
    // ========================================================================

    /// Which of `job_ids` the seeker already applied to; empty when anonymous
    async fn applied(&self, job_seeker_id: Option<Uuid>, job_ids: Vec<Uuid>) -> Result<HashSet<Uuid>> {
        match job_seeker_id {
            Some(seeker) if !job_ids.is_empty() => self.repo.applied_job_ids(seeker, job_ids).await,
            _ => Ok(HashSet::new()),
        }
    }

    pub async fn list_public(
        &self,
        query: &JobListQuery,
        job_seeker_id: Option<Uuid>,
    ) -> Result<Page<PublicJob>> {
        let filters = query.filters()?;
        let params = query.page_params();
        let (page, limit) = (params.page(), params.limit());

        let (rows, total) = self.repo.list_public_jobs(&filters, page, limit).await?;
        let applied = self
            .applied(job_seeker_id, rows.iter().map(|(job, _)| job.id).collect())
            .await?;

        let items = rows
            .into_iter()
            .map(|(job, company)| PublicJob {
                has_applied: applied.contains(&job.id),
                company: company.map(Into::into),
                job,
            })
            .collect();

        Ok(Page {
            items,
            pagination: PageMeta::new(page, limit, total),
        })
    }

    /// Active job of an active company, with its ordered form
    pub async fn public_detail(
        &self,
        job_id: Uuid,
        job_seeker_id: Option<Uuid>,
    ) -> Result<PublicJobDetail> {
        let (job, company) = self
            .repo
            .find_job_with_company(job_id)
            .await?
            .filter(|(job, company)| {
                job.is_active() && company.as_ref().is_some_and(|c| c.is_active)
            })
            .ok_or_else(|| AppError::not_found("Job not found"))?;

        let (form_fields, applied) = futures::try_join!(
            self.repo.list_form_fields(job.id),
            self.applied(job_seeker_id, vec![job.id]),
        )?;

        Ok(PublicJobDetail {
            listing: PublicJob {
                has_applied: applied.contains(&job.id),
                company: company.map(Into::into),
                job,
            },
            form_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_job_type_is_invalid_input() {
        let query = JobListQuery {
            job_type: Some("gig".into()),
            ..Default::default()
        };
        assert!(query.filters().is_err());

        let query = JobListQuery {
            job_type: Some("part_time".into()),
            ..Default::default()
        };
        assert_eq!(query.filters().unwrap().job_type, Some(JobType::PartTime));
    }

    #[test]
    fn test_salary_range_order() {
        assert!(check_salary(Some(100), Some(50)).is_err());
        assert!(check_salary(Some(50), Some(100)).is_ok());
        assert!(check_salary(None, Some(10)).is_ok());
    }

    #[test]
    fn test_query_page_params() {
        let query = JobListQuery {
            limit: Some(200),
            ..Default::default()
        };
        assert_eq!(query.page_params().limit(), 50);
        assert_eq!(query.page_params().page(), 1);
    }
}
