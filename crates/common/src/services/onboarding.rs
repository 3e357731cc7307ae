//! Profile building for both roles

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex_lite::Regex;
use sea_orm::{ActiveEnum, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::{EmployerIdentity, SeekerIdentity};
use crate::db::models::*;
use crate::db::Repository;
use crate::domain::skills::normalize_skills;
use crate::domain::{EmployerProgress, ProfileStatus, SeekerProgress};
use crate::errors::{AppError, Result};

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9+()\- ]{7,20}$").expect("static phone pattern"))
}

fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    if phone_pattern().is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("Phone must be 7-20 digits, spaces, +, - or parentheses".into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BasicDetailsRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 2, max = 200, message = "Location must be 2-200 characters"))]
    pub location: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfileRequest {
    #[validate(url(message = "Resume URL must be a valid URL"))]
    pub resume_url: Option<String>,

    #[validate(url(message = "LinkedIn URL must be a valid URL"))]
    pub linkedin_url: Option<String>,

    #[validate(url(message = "GitHub URL must be a valid URL"))]
    pub github_url: Option<String>,

    #[validate(url(message = "Portfolio URL must be a valid URL"))]
    pub portfolio_url: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 skills"))]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequest {
    #[validate(length(min = 2, max = 200))]
    pub institution: String,

    #[validate(length(min = 2, max = 200))]
    pub degree: String,

    #[validate(length(max = 200))]
    pub field_of_study: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub grade: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    #[validate(length(min = 2, max = 200))]
    pub company_name: String,

    #[validate(length(min = 2, max = 200))]
    pub title: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_current: bool,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,

    #[validate(url(message = "Project URL must be a valid URL"))]
    pub url: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    #[serde(default)]
    pub preferred_roles: Vec<String>,

    #[serde(default)]
    pub preferred_job_types: Vec<String>,

    #[serde(default)]
    pub preferred_locations: Vec<String>,

    #[validate(range(min = 0))]
    pub salary_expectation_min: Option<i32>,

    #[validate(range(min = 0))]
    pub salary_expectation_max: Option<i32>,

    #[serde(default)]
    pub open_to_remote: bool,

    #[serde(default)]
    pub willing_to_relocate: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub job_title: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub department: Option<String>,

    pub company_role: Option<CompanyRole>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfileView {
    pub user: User,
    pub profile: JobSeeker,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfileView {
    pub user: User,
    pub profile: Employer,
    pub company: Option<Company>,
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(
            "endDate",
            "End date cannot be before start date",
        )),
        _ => Ok(()),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: &[String]) -> Vec<String> {
    normalize_skills(values)
}

/// Onboarding flags for a seeker, shared with the dashboard
pub(crate) async fn seeker_progress(
    repo: &Repository,
    user_id: Uuid,
    job_seeker_id: Option<Uuid>,
) -> Result<SeekerProgress> {
    let user = repo.find_user_by_id(user_id).await?;
    let basic_details = user.as_ref().is_some_and(|u| u.has_basic_details());

    let Some(job_seeker_id) = job_seeker_id else {
        return Ok(SeekerProgress {
            basic_details,
            ..Default::default()
        });
    };

    let (profile, education, experience, projects, preferences) = futures::try_join!(
        repo.find_job_seeker(job_seeker_id),
        repo.count_education(job_seeker_id),
        repo.count_experience(job_seeker_id),
        repo.count_projects(job_seeker_id),
        repo.find_preferences(job_seeker_id),
    )?;

    Ok(SeekerProgress {
        basic_details,
        profile: profile.is_some_and(|p| !p.skills.is_empty()),
        education: education > 0,
        experience: experience > 0,
        projects: projects > 0,
        preferences: preferences.is_some(),
    })
}

pub struct OnboardingService {
    repo: Repository,
}

impl OnboardingService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ========================================================================
    // Shared
    // ========================================================================

    pub async fn seeker_status(&self, seeker: &SeekerIdentity) -> Result<ProfileStatus> {
        Ok(seeker_progress(&self.repo, seeker.user.id, seeker.job_seeker_id)
            .await?
            .status())
    }

    pub async fn employer_status(&self, employer: &EmployerIdentity) -> Result<ProfileStatus> {
        let user = self.repo.find_user_by_id(employer.user.id).await?;
        Ok(EmployerProgress {
            basic_details: user.is_some_and(|u| u.has_basic_details()),
            profile: employer.employer_id.is_some(),
            company: employer.company_id.is_some(),
        }
        .status())
    }

    pub async fn update_basic_details(
        &self,
        user_id: Uuid,
        request: BasicDetailsRequest,
    ) -> Result<User> {
        request.validate()?;

        let user = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let user = self
            .repo
            .update_basic_details(
                user,
                request.name.trim().to_string(),
                request.phone.trim().to_string(),
                request.location.trim().to_string(),
            )
            .await?;

        info!(user_id = %user.id, "Basic details updated");
        Ok(user)
    }

    // ========================================================================
    // Job Seeker Profile
    // ========================================================================

    pub async fn seeker_profile(&self, seeker: &SeekerIdentity) -> Result<JobSeekerProfileView> {
        let job_seeker_id = seeker.require_profile()?;

        let (user, profile, education, experience, projects, preferences) = futures::try_join!(
            self.repo.find_user_by_id(seeker.user.id),
            self.repo.find_job_seeker(job_seeker_id),
            self.repo.list_education(job_seeker_id),
            self.repo.list_experience(job_seeker_id),
            self.repo.list_projects(job_seeker_id),
            self.repo.find_preferences(job_seeker_id),
        )?;

        Ok(JobSeekerProfileView {
            user: user.ok_or_else(|| AppError::not_found("User not found"))?,
            profile: profile.ok_or_else(|| AppError::not_found("Job seeker profile not found"))?,
            education,
            experience,
            projects,
            preferences,
        })
    }

    /// Create the profile on first call, update it afterwards
    pub async fn upsert_seeker_profile(
        &self,
        seeker: &SeekerIdentity,
        request: JobSeekerProfileRequest,
    ) -> Result<JobSeeker> {
        request.validate()?;
        let now = chrono::Utc::now();
        let skills = normalize_skills(&request.skills);

        let profile = match self.repo.find_job_seeker_by_user(seeker.user.id).await? {
            Some(existing) => {
                let mut active: JobSeekerActiveModel = existing.into();
                active.resume_url = Set(trimmed(request.resume_url));
                active.linkedin_url = Set(trimmed(request.linkedin_url));
                active.github_url = Set(trimmed(request.github_url));
                active.portfolio_url = Set(trimmed(request.portfolio_url));
                active.bio = Set(trimmed(request.bio));
                active.skills = Set(skills);
                active.updated_at = Set(now.into());
                self.repo.update(active).await?
            }
            None => {
                let active = JobSeekerActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(seeker.user.id),
                    resume_url: Set(trimmed(request.resume_url)),
                    linkedin_url: Set(trimmed(request.linkedin_url)),
                    github_url: Set(trimmed(request.github_url)),
                    portfolio_url: Set(trimmed(request.portfolio_url)),
                    bio: Set(trimmed(request.bio)),
                    skills: Set(skills),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                let profile = self.repo.insert(active).await?;
                info!(user_id = %seeker.user.id, job_seeker_id = %profile.id, "Job seeker profile created");
                profile
            }
        };

        Ok(profile)
    }

    // ========================================================================
    // Education / Experience / Projects
    // ========================================================================

    pub async fn list_education(&self, seeker: &SeekerIdentity) -> Result<Vec<Education>> {
        self.repo.list_education(seeker.require_profile()?).await
    }

    pub async fn add_education(
        &self,
        seeker: &SeekerIdentity,
        request: EducationRequest,
    ) -> Result<Education> {
        let job_seeker_id = seeker.require_profile()?;
        request.validate()?;
        check_dates(Some(request.start_date), request.end_date)?;

        let education = self
            .repo
            .insert(EducationActiveModel {
                id: Set(Uuid::new_v4()),
                job_seeker_id: Set(job_seeker_id),
                institution: Set(request.institution.trim().to_string()),
                degree: Set(request.degree.trim().to_string()),
                field_of_study: Set(trimmed(request.field_of_study)),
                start_date: Set(request.start_date),
                end_date: Set(request.end_date),
                grade: Set(trimmed(request.grade)),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        info!(job_seeker_id = %job_seeker_id, education_id = %education.id, "Education added");
        Ok(education)
    }

    pub async fn update_education(
        &self,
        seeker: &SeekerIdentity,
        id: Uuid,
        request: EducationRequest,
    ) -> Result<Education> {
        let job_seeker_id = seeker.require_profile()?;
        request.validate()?;
        check_dates(Some(request.start_date), request.end_date)?;

        let existing = self
            .repo
            .find_education(job_seeker_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Education entry not found"))?;

        let mut active: EducationActiveModel = existing.into();
        active.institution = Set(request.institution.trim().to_string());
        active.degree = Set(request.degree.trim().to_string());
        active.field_of_study = Set(trimmed(request.field_of_study));
        active.start_date = Set(request.start_date);
        active.end_date = Set(request.end_date);
        active.grade = Set(trimmed(request.grade));
        let education = self.repo.update(active).await?;
        info!(job_seeker_id = %job_seeker_id, education_id = %id, "Education updated");
        Ok(education)
    }

    pub async fn delete_education(&self, seeker: &SeekerIdentity, id: Uuid) -> Result<()> {
        let job_seeker_id = seeker.require_profile()?;
        if !self.repo.delete_education(job_seeker_id, id).await? {
            return Err(AppError::not_found("Education entry not found"));
        }
        info!(job_seeker_id = %job_seeker_id, education_id = %id, "Education deleted");
        Ok(())
    }

    pub async fn list_experience(&self, seeker: &SeekerIdentity) -> Result<Vec<Experience>> {
        self.repo.list_experience(seeker.require_profile()?).await
    }

    fn check_experience(request: &ExperienceRequest) -> Result<()> {
        request.validate()?;
        if request.is_current && request.end_date.is_some() {
            return Err(AppError::validation(
                "endDate",
                "A current position cannot have an end date",
            ));
        }
        check_dates(Some(request.start_date), request.end_date)
    }

    pub async fn add_experience(
        &self,
        seeker: &SeekerIdentity,
        request: ExperienceRequest,
    ) -> Result<Experience> {
        let job_seeker_id = seeker.require_profile()?;
        Self::check_experience(&request)?;

        let experience = self
            .repo
            .insert(ExperienceActiveModel {
                id: Set(Uuid::new_v4()),
                job_seeker_id: Set(job_seeker_id),
                company_name: Set(request.company_name.trim().to_string()),
                title: Set(request.title.trim().to_string()),
                location: Set(trimmed(request.location)),
                start_date: Set(request.start_date),
                end_date: Set(request.end_date),
                is_current: Set(request.is_current),
                description: Set(trimmed(request.description)),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        info!(job_seeker_id = %job_seeker_id, experience_id = %experience.id, "Experience added");
        Ok(experience)
    }

    pub async fn update_experience(
        &self,
        seeker: &SeekerIdentity,
        id: Uuid,
        request: ExperienceRequest,
    ) -> Result<Experience> {
        let job_seeker_id = seeker.require_profile()?;
        Self::check_experience(&request)?;

        let existing = self
            .repo
            .find_experience(job_seeker_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Experience entry not found"))?;

        let mut active: ExperienceActiveModel = existing.into();
        active.company_name = Set(request.company_name.trim().to_string());
        active.title = Set(request.title.trim().to_string());
        active.location = Set(trimmed(request.location));
        active.start_date = Set(request.start_date);
        active.end_date = Set(request.end_date);
        active.is_current = Set(request.is_current);
        active.description = Set(trimmed(request.description));
        let experience = self.repo.update(active).await?;
        info!(job_seeker_id = %job_seeker_id, experience_id = %id, "Experience updated");
        Ok(experience)
    }

    pub async fn delete_experience(&self, seeker: &SeekerIdentity, id: Uuid) -> Result<()> {
        let job_seeker_id = seeker.require_profile()?;
        if !self.repo.delete_experience(job_seeker_id, id).await? {
            return Err(AppError::not_found("Experience entry not found"));
        }
        info!(job_seeker_id = %job_seeker_id, experience_id = %id, "Experience deleted");
        Ok(())
    }

    pub async fn list_projects(&self, seeker: &SeekerIdentity) -> Result<Vec<Project>> {
        self.repo.list_projects(seeker.require_profile()?).await
    }

    pub async fn add_project(
        &self,
        seeker: &SeekerIdentity,
        request: ProjectRequest,
    ) -> Result<Project> {
        let job_seeker_id = seeker.require_profile()?;
        request.validate()?;
        check_dates(request.start_date, request.end_date)?;

        let project = self
            .repo
            .insert(ProjectActiveModel {
                id: Set(Uuid::new_v4()),
                job_seeker_id: Set(job_seeker_id),
                name: Set(request.name.trim().to_string()),
                description: Set(trimmed(request.description)),
                technologies: Set(clean_list(&request.technologies)),
                url: Set(trimmed(request.url)),
                start_date: Set(request.start_date),
                end_date: Set(request.end_date),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        info!(job_seeker_id = %job_seeker_id, project_id = %project.id, "Project added");
        Ok(project)
    }

    pub async fn update_project(
        &self,
        seeker: &SeekerIdentity,
        id: Uuid,
        request: ProjectRequest,
    ) -> Result<Project> {
        let job_seeker_id = seeker.require_profile()?;
        request.validate()?;
        check_dates(request.start_date, request.end_date)?;

        let existing = self
            .repo
            .find_project(job_seeker_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        let mut active: ProjectActiveModel = existing.into();
        active.name = Set(request.name.trim().to_string());
        active.description = Set(trimmed(request.description));
        active.technologies = Set(clean_list(&request.technologies));
        active.url = Set(trimmed(request.url));
        active.start_date = Set(request.start_date);
        active.end_date = Set(request.end_date);
        let project = self.repo.update(active).await?;
        info!(job_seeker_id = %job_seeker_id, project_id = %id, "Project updated");
        Ok(project)
    }

    pub async fn delete_project(&self, seeker: &SeekerIdentity, id: Uuid) -> Result<()> {
        let job_seeker_id = seeker.require_profile()?;
        if !self.repo.delete_project(job_seeker_id, id).await? {
            return Err(AppError::not_found("Project not found"));
        }
        info!(job_seeker_id = %job_seeker_id, project_id = %id, "Project deleted");
        Ok(())
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub async fn preferences(&self, seeker: &SeekerIdentity) -> Result<Preferences> {
        self.repo
            .find_preferences(seeker.require_profile()?)
            .await?
            .ok_or_else(|| AppError::not_found("Preferences not set"))
    }

    pub async fn upsert_preferences(
        &self,
        seeker: &SeekerIdentity,
        request: PreferencesRequest,
    ) -> Result<Preferences> {
        let job_seeker_id = seeker.require_profile()?;
        request.validate()?;

        if let (Some(min), Some(max)) =
            (request.salary_expectation_min, request.salary_expectation_max)
        {
            if max < min {
                return Err(AppError::validation(
                    "salaryExpectationMax",
                    "Maximum salary cannot be below minimum salary",
                ));
            }
        }

        let job_types = request
            .preferred_job_types
            .iter()
            .map(|raw| {
                JobType::parse(raw)
                    .map(|t| t.to_value())
                    .ok_or_else(|| {
                        AppError::validation(
                            "preferredJobTypes",
                            format!("Unknown job type '{}'", raw),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let job_types = clean_list(&job_types);
        let now = chrono::Utc::now();

        match self.repo.find_preferences(job_seeker_id).await? {
            Some(existing) => {
                let mut active: PreferencesActiveModel = existing.into();
                active.preferred_roles = Set(clean_list(&request.preferred_roles));
                active.preferred_job_types = Set(job_types);
                active.preferred_locations = Set(clean_list(&request.preferred_locations));
                active.salary_expectation_min = Set(request.salary_expectation_min);
                active.salary_expectation_max = Set(request.salary_expectation_max);
                active.open_to_remote = Set(request.open_to_remote);
                active.willing_to_relocate = Set(request.willing_to_relocate);
                active.updated_at = Set(now.into());
                let preferences = self.repo.update(active).await?;
                info!(job_seeker_id = %job_seeker_id, "Preferences updated");
                Ok(preferences)
            }
            None => {
                let preferences = self
                    .repo
                    .insert(PreferencesActiveModel {
                        id: Set(Uuid::new_v4()),
                        job_seeker_id: Set(job_seeker_id),
                        preferred_roles: Set(clean_list(&request.preferred_roles)),
                        preferred_job_types: Set(job_types),
                        preferred_locations: Set(clean_list(&request.preferred_locations)),
                        salary_expectation_min: Set(request.salary_expectation_min),
                        salary_expectation_max: Set(request.salary_expectation_max),
                        open_to_remote: Set(request.open_to_remote),
                        willing_to_relocate: Set(request.willing_to_relocate),
                        updated_at: Set(now.into()),
                    })
                    .await?;
                info!(job_seeker_id = %job_seeker_id, "Preferences created");
                Ok(preferences)
            }
        }
    }

    // ========================================================================
    // Employer Profile
    // ========================================================================

    pub async fn employer_profile(&self, employer: &EmployerIdentity) -> Result<EmployerProfileView> {
        let employer_id = employer.require_profile()?;

        let (user, profile) = futures::try_join!(
            self.repo.find_user_by_id(employer.user.id),
            self.repo.find_employer(employer_id),
        )?;
        let profile = profile.ok_or_else(|| AppError::not_found("Employer profile not found"))?;
        let company = match profile.company_id {
            Some(company_id) => self.repo.find_company(company_id).await?,
            None => None,
        };

        Ok(EmployerProfileView {
            user: user.ok_or_else(|| AppError::not_found("User not found"))?,
            profile,
            company,
        })
    }

    /// ADMIN is only ever granted by creating a company
    pub async fn upsert_employer_profile(
        &self,
        employer: &EmployerIdentity,
        request: EmployerProfileRequest,
    ) -> Result<Employer> {
        request.validate()?;
        let now = chrono::Utc::now();
        let existing = self.repo.find_employer_by_user(employer.user.id).await?;

        let current_role = existing.as_ref().map(|e| e.company_role);
        if request.company_role == Some(CompanyRole::Admin) && current_role != Some(CompanyRole::Admin)
        {
            return Err(AppError::validation(
                "companyRole",
                "ADMIN is granted by creating a company",
            ));
        }

        match existing {
            Some(existing) => {
                let mut active: EmployerActiveModel = existing.into();
                active.job_title = Set(trimmed(request.job_title));
                active.department = Set(trimmed(request.department));
                if let Some(role) = request.company_role {
                    active.company_role = Set(role);
                }
                active.updated_at = Set(now.into());
                self.repo.update(active).await
            }
            None => {
                let profile = self
                    .repo
                    .insert(EmployerActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(employer.user.id),
                        job_title: Set(trimmed(request.job_title)),
                        department: Set(trimmed(request.department)),
                        company_role: Set(request.company_role.unwrap_or(CompanyRole::Recruiter)),
                        company_id: Set(None),
                        joined_company_at: Set(None),
                        created_at: Set(now.into()),
                        updated_at: Set(now.into()),
                    })
                    .await?;
                info!(user_id = %employer.user.id, employer_id = %profile.id, "Employer profile created");
                Ok(profile)
            }
        }
    }

    /// Remove the employer, their jobs and everything under them, and the user
    pub async fn delete_employer_account(&self, employer: &EmployerIdentity) -> Result<()> {
        let employer_id = employer.require_profile()?;
        self.repo
            .delete_employer_account(employer_id, employer.user.id)
            .await?;

        info!(user_id = %employer.user.id, employer_id = %employer_id, "Employer account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_format() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let start = NaiveDate::from_ymd_opt(2022, 5, 1);
        let end = NaiveDate::from_ymd_opt(2021, 5, 1);
        assert!(check_dates(start, end).is_err());
        assert!(check_dates(end, start).is_ok());
        assert!(check_dates(start, None).is_ok());
    }

    #[test]
    fn test_current_position_has_no_end_date() {
        let request = ExperienceRequest {
            company_name: "Initech".into(),
            title: "Engineer".into(),
            location: None,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2021, 1, 1),
            is_current: true,
            description: None,
        };
        assert!(OnboardingService::check_experience(&request).is_err());
    }

    #[test]
    fn test_trimmed_drops_blank() {
        assert_eq!(trimmed(Some("  ".into())), None);
        assert_eq!(trimmed(Some(" x ".into())), Some("x".into()));
    }
}
