//! Read-only dashboard aggregation
//!
//! Each dashboard is a fixed batch of independent reads issued together and
//! joined before any reduction runs, so a failure in one read fails the
//! whole dashboard.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{EmployerIdentity, SeekerIdentity};
use crate::db::models::*;
use crate::db::{ApplicationWithJob, Repository};
use crate::domain::analytics::{
    conversion_funnel, monthly_trend, status_distribution, top_n, FunnelStage, MonthBucket,
    StatusDistribution,
};
use crate::domain::skills::count_skills;
use crate::domain::ProfileStatus;
use crate::errors::Result;
use crate::metrics;

use super::applications::ApplicantView;
use super::jobs::CompanySummary;
use super::onboarding::seeker_progress;

const RECENT_LIMIT: u64 = 5;
const RECOMMENDED_LIMIT: u64 = 5;
const TOP_SKILLS: usize = 10;
const TOP_COMPANIES: usize = 5;
const TOP_ROLES: usize = 5;

/// A named count in a ranking
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCompany {
    pub company: CompanySummary,
    pub active_jobs: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedJob {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<CompanySummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekerDashboard {
    pub profile_status: ProfileStatus,
    pub application_stats: StatusDistribution,
    pub monthly_applications: Vec<MonthBucket>,
    pub recent_applications: Vec<ApplicationWithJob>,
    pub recommended_jobs: Vec<RecommendedJob>,
    pub top_skills: Vec<RankedItem>,
    pub top_companies: Vec<RankedCompany>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobTotals {
    pub total: i64,
    pub active: i64,
    pub paused: i64,
    pub completed: i64,
}

impl JobTotals {
    fn from_counts(counts: &[(JobStatus, i64)]) -> Self {
        counts.iter().fold(Self::default(), |mut totals, (status, n)| {
            totals.total += n;
            match status {
                JobStatus::Active => totals.active += n,
                JobStatus::Paused => totals.paused += n,
                JobStatus::Completed => totals.completed += n,
            }
            totals
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplicant {
    #[serde(flatten)]
    pub applicant: ApplicantView,
    pub job_title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerDashboard {
    pub company_id: Option<Uuid>,
    pub jobs: JobTotals,
    pub application_stats: StatusDistribution,
    pub funnel: Vec<FunnelStage>,
    pub monthly_applications: Vec<MonthBucket>,
    pub top_roles: Vec<RankedItem>,
    pub recent_applications: Vec<RecentApplicant>,
}

fn ranked<K: Ord + ToString>(items: Vec<(K, i64)>, n: usize) -> Vec<RankedItem> {
    top_n(items, n)
        .into_iter()
        .map(|(name, count)| RankedItem {
            name: name.to_string(),
            count,
        })
        .collect()
}

pub struct DashboardService {
    repo: Repository,
}

impl DashboardService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn seeker(&self, seeker: &SeekerIdentity) -> Result<SeekerDashboard> {
        let started = Instant::now();
        let job_seeker_id = seeker.require_profile()?;

        let (counts, dates, recent, progress, preferences, job_texts, company_counts) = futures::try_join!(
            self.repo.seeker_status_counts(job_seeker_id),
            self.repo.seeker_application_dates(job_seeker_id),
            self.repo
                .list_seeker_applications(job_seeker_id, None, Some(RECENT_LIMIT)),
            seeker_progress(&self.repo, seeker.user.id, Some(job_seeker_id)),
            self.repo.find_preferences(job_seeker_id),
            self.repo.active_job_texts(),
            self.repo.active_job_counts_by_company(),
        )?;

        let preferred_roles = preferences.map(|p| p.preferred_roles).unwrap_or_default();
        let top_company_counts = top_n(company_counts, TOP_COMPANIES);

        let (recommended, companies) = futures::try_join!(
            self.repo.recommended_jobs(&preferred_roles, RECOMMENDED_LIMIT),
            self.repo
                .find_companies_by_ids(top_company_counts.iter().map(|(id, _)| *id).collect()),
        )?;

        let mut companies: HashMap<Uuid, Company> =
            companies.into_iter().map(|c| (c.id, c)).collect();
        let top_companies = top_company_counts
            .into_iter()
            .filter_map(|(id, active_jobs)| {
                companies.remove(&id).map(|company| RankedCompany {
                    company: company.into(),
                    active_jobs,
                })
            })
            .collect();

        let texts: Vec<String> = job_texts
            .into_iter()
            .map(|(description, requirements)| match requirements {
                Some(requirements) => format!("{} {}", description, requirements),
                None => description,
            })
            .collect();
        let top_skills = ranked(count_skills(texts.iter().map(String::as_str)), TOP_SKILLS);

        let recent_applications = recent
            .into_iter()
            .map(|mut row| {
                row.application.employer_notes = None;
                row
            })
            .collect();

        let dashboard = SeekerDashboard {
            profile_status: progress.status(),
            application_stats: status_distribution(&counts),
            monthly_applications: monthly_trend(dates),
            recent_applications,
            recommended_jobs: recommended
                .into_iter()
                .map(|(job, company)| RecommendedJob {
                    job,
                    company: company.map(Into::into),
                })
                .collect(),
            top_skills,
            top_companies,
        };

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_dashboard("job_seeker", elapsed);
        debug!(job_seeker_id = %job_seeker_id, elapsed_ms = elapsed * 1000.0, "Seeker dashboard built");
        Ok(dashboard)
    }

    /// Scoped to the company once one is selected, else to the employer's own jobs
    pub async fn employer(&self, employer: &EmployerIdentity) -> Result<EmployerDashboard> {
        let started = Instant::now();
        let employer_id = employer.require_profile()?;

        let job_ids = self
            .repo
            .scoped_job_ids(employer_id, employer.company_id)
            .await?;

        let (job_counts, status_counts, dates, role_counts, recent, jobs) = futures::try_join!(
            self.repo.job_status_counts(job_ids.clone()),
            self.repo.job_application_status_counts(job_ids.clone()),
            self.repo.job_application_dates(job_ids.clone()),
            self.repo.role_application_counts(job_ids.clone()),
            self.repo.recent_job_applications(job_ids.clone(), RECENT_LIMIT),
            self.repo.find_jobs_by_ids(job_ids),
        )?;

        let titles: HashMap<Uuid, String> = jobs.into_iter().map(|j| (j.id, j.title)).collect();
        let recent_applications = recent
            .into_iter()
            .map(|row| RecentApplicant {
                job_title: titles.get(&row.application.job_id).cloned(),
                applicant: row.into(),
            })
            .collect();

        let dashboard = EmployerDashboard {
            company_id: employer.company_id,
            jobs: JobTotals::from_counts(&job_counts),
            application_stats: status_distribution(&status_counts),
            funnel: conversion_funnel(&status_counts),
            monthly_applications: monthly_trend(dates),
            top_roles: ranked(role_counts, TOP_ROLES),
            recent_applications,
        };

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_dashboard("employer", elapsed);
        debug!(employer_id = %employer_id, elapsed_ms = elapsed * 1000.0, "Employer dashboard built");
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_totals() {
        let totals = JobTotals::from_counts(&[
            (JobStatus::Active, 3),
            (JobStatus::Completed, 1),
        ]);
        assert_eq!(
            totals,
            JobTotals {
                total: 4,
                active: 3,
                paused: 0,
                completed: 1
            }
        );
    }

    #[test]
    fn test_ranked_caps_and_orders() {
        let items = vec![
            ("Backend".to_string(), 2),
            ("Design".to_string(), 7),
            ("Data".to_string(), 2),
        ];
        let top = ranked(items, 2);
        assert_eq!(top[0].name, "Design");
        assert_eq!(top[1].name, "Backend");
    }
}
