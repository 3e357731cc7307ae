//! Application workflow for both sides
//!
//! Seekers apply, read and withdraw their own applications; employers read
//! applicants of the jobs they own and move them through review.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{EmployerIdentity, SeekerIdentity};
use crate::db::models::*;
use crate::db::{ApplicantRow, ApplicationWithJob, Repository};
use crate::domain::analytics::{status_distribution, StatusDistribution};
use crate::domain::application_status::{
    check_employer_transition, check_withdrawal, parse_employer_target,
};
use crate::domain::form_fields::{check_responses, AnswerInput};
use crate::errors::{AppError, Result};
use crate::metrics;

use super::jobs::owned_job;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default)]
    pub responses: Vec<AnswerInput>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeekerApplicationsQuery {
    pub status: Option<String>,
}

/// An answer with the label of the field it belongs to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub field_id: Uuid,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekerApplicationDetail {
    #[serde(flatten)]
    pub application: ApplicationWithJob,
    pub answers: Vec<AnswerView>,
}

/// One applicant row of an employer listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub employer_notes: Option<String>,
    pub applied_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub job_seeker_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
}

impl From<ApplicantRow> for ApplicantView {
    fn from(row: ApplicantRow) -> Self {
        let ApplicantRow {
            application,
            job_seeker,
            user,
        } = row;
        let (skills, resume_url) = job_seeker
            .map(|s| (s.skills, s.resume_url))
            .unwrap_or_default();

        Self {
            id: application.id,
            job_id: application.job_id,
            status: application.status,
            employer_notes: application.employer_notes,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
            job_seeker_id: application.job_seeker_id,
            name: user.as_ref().map(|u| u.name.clone()),
            email: user.as_ref().map(|u| u.email.clone()),
            phone: user.as_ref().and_then(|u| u.phone.clone()),
            location: user.and_then(|u| u.location),
            skills,
            resume_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetail {
    #[serde(flatten)]
    pub applicant: ApplicantView,
    pub answers: Vec<AnswerView>,
}

fn answer_views(rows: Vec<(ApplicationResponse, Option<JobFormField>)>) -> Vec<AnswerView> {
    rows.into_iter()
        .map(|(response, field)| AnswerView {
            field_id: response.field_id,
            label: field.as_ref().map(|f| f.label.clone()),
            field_type: field.map(|f| f.field_type),
            answer: response.answer,
        })
        .collect()
}

/// Notes are for the employer only
fn hide_notes(mut row: ApplicationWithJob) -> ApplicationWithJob {
    row.application.employer_notes = None;
    row
}

pub struct ApplicationService {
    repo: Repository,
}

impl ApplicationService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ========================================================================
    // Seeker side
    // ========================================================================

    /// Apply to an active job with answers for its form
    pub async fn apply(
        &self,
        seeker: &SeekerIdentity,
        job_id: Uuid,
        request: ApplyRequest,
    ) -> Result<Application> {
        let job_seeker_id = seeker.require_profile()?;

        // Only active postings of active companies take applications
        let job = self
            .repo
            .find_job_with_company(job_id)
            .await?
            .filter(|(job, company)| {
                job.is_active() && company.as_ref().is_some_and(|c| c.is_active)
            })
            .map(|(job, _)| job)
            .ok_or_else(|| AppError::not_found("Job not found or no longer accepting applications"))?;

        if self
            .repo
            .find_application_by_job_and_seeker(job.id, job_seeker_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You have already applied to this job"));
        }

        let fields = self.repo.list_form_fields(job.id).await?;
        check_responses(&fields, &request.responses)?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let application = Application {
            id: Uuid::new_v4(),
            job_id: job.id,
            job_seeker_id,
            status: ApplicationStatus::Pending,
            employer_notes: None,
            applied_at: now,
            updated_at: now,
        };
        let responses = request
            .responses
            .into_iter()
            .filter(|a| !a.answer.trim().is_empty())
            .map(|a| ApplicationResponse {
                id: Uuid::new_v4(),
                application_id: application.id,
                field_id: a.field_id,
                answer: a.answer.trim().to_string(),
            })
            .collect();

        // The unique (job, seeker) key settles concurrent submissions
        let application = self
            .repo
            .create_application(application, responses)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    AppError::conflict("You have already applied to this job")
                }
                other => other,
            })?;

        metrics::record_application_submitted();
        info!(
            application_id = %application.id,
            job_id = %job.id,
            job_seeker_id = %job_seeker_id,
            "Application submitted"
        );
        Ok(application)
    }

    pub async fn withdraw(&self, seeker: &SeekerIdentity, id: Uuid) -> Result<Application> {
        let job_seeker_id = seeker.require_profile()?;
        let application = self
            .repo
            .find_seeker_application(job_seeker_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found"))?;

        check_withdrawal(application.status)?;
        let from = application.status;
        let mut application = self
            .repo
            .update_application_status(application, ApplicationStatus::Withdrawn, None)
            .await?;

        metrics::record_status_transition(&ApplicationStatus::Withdrawn.to_value());
        info!(application_id = %application.id, from = %from.to_value(), "Application withdrawn");

        application.employer_notes = None;
        Ok(application)
    }

    /// The caller's applications, newest first
    pub async fn seeker_list(
        &self,
        seeker: &SeekerIdentity,
        query: &SeekerApplicationsQuery,
    ) -> Result<Vec<ApplicationWithJob>> {
        let job_seeker_id = seeker.require_profile()?;
        let status = query
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                ApplicationStatus::parse(raw).ok_or_else(|| {
                    AppError::validation("status", format!("Unknown status '{}'", raw))
                })
            })
            .transpose()?;

        let rows = self
            .repo
            .list_seeker_applications(job_seeker_id, status, None)
            .await?;
        Ok(rows.into_iter().map(hide_notes).collect())
    }

    pub async fn seeker_detail(
        &self,
        seeker: &SeekerIdentity,
        id: Uuid,
    ) -> Result<SeekerApplicationDetail> {
        let job_seeker_id = seeker.require_profile()?;
        let application = self
            .repo
            .find_seeker_application(job_seeker_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found"))?;

        let (job, responses) = futures::try_join!(
            self.repo.find_job(application.job_id),
            self.repo.list_responses(application.id),
        )?;
        let company = match &job {
            Some(job) => self.repo.find_company(job.company_id).await?,
            None => None,
        };

        Ok(SeekerApplicationDetail {
            application: hide_notes(ApplicationWithJob {
                application,
                job,
                company,
            }),
            answers: answer_views(responses),
        })
    }

    /// Every application in the order it was made
    pub async fn history(&self, seeker: &SeekerIdentity) -> Result<Vec<ApplicationWithJob>> {
        let job_seeker_id = seeker.require_profile()?;
        let mut rows = self
            .repo
            .list_seeker_applications(job_seeker_id, None, None)
            .await?;
        rows.reverse();
        Ok(rows.into_iter().map(hide_notes).collect())
    }

    pub async fn stats(&self, seeker: &SeekerIdentity) -> Result<StatusDistribution> {
        let job_seeker_id = seeker.require_profile()?;
        let counts = self.repo.seeker_status_counts(job_seeker_id).await?;
        Ok(status_distribution(&counts))
    }

    // ========================================================================
    // Employer side
    // ========================================================================

    pub async fn job_applicants(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
    ) -> Result<Vec<ApplicantView>> {
        let job = owned_job(&self.repo, employer, job_id).await?;
        let rows = self.repo.list_job_applicants(job.id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn job_application(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        id: Uuid,
    ) -> Result<Application> {
        let job = owned_job(&self.repo, employer, job_id).await?;
        self.repo
            .find_job_application(job.id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found"))
    }

    pub async fn job_application_detail(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        id: Uuid,
    ) -> Result<ApplicantDetail> {
        let application = self.job_application(employer, job_id, id).await?;

        let (job_seeker, responses) = futures::try_join!(
            self.repo.find_job_seeker(application.job_seeker_id),
            self.repo.list_responses(application.id),
        )?;
        let user = match &job_seeker {
            Some(seeker) => self.repo.find_user_by_id(seeker.user_id).await?,
            None => None,
        };

        Ok(ApplicantDetail {
            applicant: ApplicantRow {
                application,
                job_seeker,
                user,
            }
            .into(),
            answers: answer_views(responses),
        })
    }

    /// Move an application along the review pipeline
    pub async fn update_status(
        &self,
        employer: &EmployerIdentity,
        job_id: Uuid,
        id: Uuid,
        request: StatusChangeRequest,
    ) -> Result<Application> {
        let application = self.job_application(employer, job_id, id).await?;
        let target = parse_employer_target(&request.status)?;
        check_employer_transition(application.status, target)?;

        let from = application.status;
        let notes = request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let application = self
            .repo
            .update_application_status(application, target, notes)
            .await?;

        metrics::record_status_transition(&target.to_value());
        info!(
            application_id = %application.id,
            from = %from.to_value(),
            to = %target.to_value(),
            "Application status changed"
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_views_keep_labels() {
        let field = JobFormField {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            label: "Portfolio".into(),
            field_type: FieldType::Url,
            is_required: false,
            is_default: false,
            options: Vec::new(),
            placeholder: None,
            display_order: 6,
            created_at: chrono::Utc::now().into(),
        };
        let response = ApplicationResponse {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            field_id: field.id,
            answer: "https://ada.dev".into(),
        };

        let views = answer_views(vec![(response, Some(field))]);
        assert_eq!(views[0].label.as_deref(), Some("Portfolio"));
        assert_eq!(views[0].field_type, Some(FieldType::Url));
    }

    #[test]
    fn test_applicant_without_profile_rows() {
        let now = chrono::Utc::now().into();
        let row = ApplicantRow {
            application: Application {
                id: Uuid::new_v4(),
                job_id: Uuid::new_v4(),
                job_seeker_id: Uuid::new_v4(),
                status: ApplicationStatus::Pending,
                employer_notes: None,
                applied_at: now,
                updated_at: now,
            },
            job_seeker: None,
            user: None,
        };
        let view = ApplicantView::from(row);
        assert!(view.name.is_none());
        assert!(view.skills.is_empty());
    }
}
