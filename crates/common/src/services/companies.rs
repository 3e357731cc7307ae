//! Company directory and membership

use chrono::Datelike;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::{CompanyMember, EmployerIdentity};
use crate::db::models::*;
use crate::db::Repository;
use crate::domain::membership::{check_switch, role_after_select};
use crate::errors::{AppError, Requirement, Result};
use crate::metrics;

/// Minimum search query length
pub const MIN_QUERY_LEN: usize = 2;

const PUBLIC_RECENT_JOBS: u64 = 5;

fn validate_founded_year(year: i32) -> std::result::Result<(), ValidationError> {
    let current = chrono::Utc::now().year();
    if (1800..=current).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::new("founded_year")
            .with_message(format!("Founded year must be between 1800 and {}", current).into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 100, message = "Company name must be 2-100 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 100, message = "Industry must be 2-100 characters"))]
    pub industry: String,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub size: Option<CompanySize>,

    #[validate(custom(function = "validate_founded_year"))]
    pub founded_year: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 2, max = 100, message = "Company name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Industry must be 2-100 characters"))]
    pub industry: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub size: Option<CompanySize>,

    #[validate(custom(function = "validate_founded_year"))]
    pub founded_year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMembership {
    pub company: Company,
    pub employer: Employer,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCompany {
    #[serde(flatten)]
    pub company: Company,
    pub recent_jobs: Vec<Job>,
}

pub struct CompanyService {
    repo: Repository,
    allow_switch: bool,
}

impl CompanyService {
    pub fn new(repo: Repository, allow_switch: bool) -> Self {
        Self { repo, allow_switch }
    }

    /// Resolve the caller's employer row, which company operations mutate
    async fn load_employer(&self, identity: &EmployerIdentity) -> Result<Employer> {
        let employer_id = identity.require_profile()?;
        self.repo
            .find_employer(employer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employer profile not found"))
    }

    async fn ensure_unique_name(&self, name: &str, excluding: Option<Uuid>) -> Result<()> {
        if let Some(existing) = self.repo.find_active_company_by_name(name, excluding).await? {
            return Err(AppError::Conflict {
                message: format!(
                    "A company named '{}' already exists; select it instead",
                    existing.name
                ),
                existing_id: Some(existing.id),
            });
        }
        Ok(())
    }

    /// Gate for company-scoped employer operations
    pub async fn require_company(&self, identity: &EmployerIdentity) -> Result<CompanyMember> {
        let employer_id = identity.require_profile()?;
        let company_id = identity.company_id.ok_or_else(|| {
            AppError::precondition(Requirement::CompanySelection, "Select or create a company first")
        })?;

        let company = self.repo.find_company(company_id).await?;
        if !company.is_some_and(|c| c.is_active) {
            return Err(AppError::precondition(
                Requirement::ActiveCompany,
                "Your company is no longer active",
            ));
        }

        Ok(CompanyMember {
            user: identity.user.clone(),
            employer_id,
            company_id,
            company_role: identity.company_role.unwrap_or(CompanyRole::Recruiter),
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Company>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(AppError::validation(
                "q",
                format!("Search query must be at least {} characters", MIN_QUERY_LEN),
            ));
        }
        self.repo.search_companies(query).await
    }

    /// Create a company and make the caller its ADMIN
    pub async fn create(
        &self,
        identity: &EmployerIdentity,
        request: CreateCompanyRequest,
    ) -> Result<CompanyMembership> {
        request.validate()?;
        let employer = self.load_employer(identity).await?;
        check_switch(employer.company_id, None, self.allow_switch)?;

        let name = request.name.trim().to_string();
        self.ensure_unique_name(&name, None).await?;

        let now = chrono::Utc::now();
        let company = CompanyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            website: Set(request.website),
            logo_url: Set(request.logo_url),
            industry: Set(request.industry.trim().to_string()),
            description: Set(request.description),
            location: Set(request.location),
            size: Set(request.size),
            founded_year: Set(request.founded_year),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let (company, employer) = self
            .repo
            .create_company_with_admin(company, employer)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    warn!("Company name taken concurrently");
                    AppError::conflict("A company with this name already exists")
                }
                other => other,
            })?;

        metrics::record_company_created();
        info!(company_id = %company.id, employer_id = %employer.id, "Company created");

        Ok(CompanyMembership { company, employer })
    }

    /// Join an existing active company
    pub async fn select(
        &self,
        identity: &EmployerIdentity,
        company_id: Uuid,
    ) -> Result<CompanyMembership> {
        let employer = self.load_employer(identity).await?;

        let company = self
            .repo
            .find_company(company_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found("Company not found"))?;

        let role = role_after_select(
            employer.company_id,
            employer.company_role,
            company.id,
            self.allow_switch,
        )?;
        let previous = employer.company_id;
        let employer = self
            .repo
            .assign_employer_company(employer, company.id, role)
            .await?;

        info!(
            employer_id = %employer.id,
            company_id = %company.id,
            previous_company = ?previous,
            role = ?role,
            "Employer selected company"
        );

        Ok(CompanyMembership { company, employer })
    }

    pub async fn mine(&self, member: &CompanyMember) -> Result<Company> {
        self.repo
            .find_company(member.company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found"))
    }

    /// Only ADMIN and HR_MANAGER may edit the company
    pub async fn update_mine(
        &self,
        member: &CompanyMember,
        request: UpdateCompanyRequest,
    ) -> Result<Company> {
        if !member.company_role.can_manage_company() {
            return Err(AppError::forbidden(
                "Only company admins and HR managers can update the company",
            ));
        }
        request.validate()?;

        let company = self.mine(member).await?;
        let mut active: CompanyActiveModel = company.into();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            self.ensure_unique_name(&name, Some(member.company_id)).await?;
            active.name = Set(name);
        }
        if let Some(industry) = request.industry {
            active.industry = Set(industry.trim().to_string());
        }
        if request.website.is_some() {
            active.website = Set(request.website);
        }
        if request.logo_url.is_some() {
            active.logo_url = Set(request.logo_url);
        }
        if request.description.is_some() {
            active.description = Set(request.description);
        }
        if request.location.is_some() {
            active.location = Set(request.location);
        }
        if request.size.is_some() {
            active.size = Set(request.size);
        }
        if request.founded_year.is_some() {
            active.founded_year = Set(request.founded_year);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let company = self.repo.update(active).await?;
        info!(company_id = %company.id, "Company updated");
        Ok(company)
    }

    pub async fn public(&self, company_id: Uuid) -> Result<PublicCompany> {
        let company = self
            .repo
            .find_company(company_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found("Company not found"))?;

        let recent_jobs = self
            .repo
            .recent_company_jobs(company.id, PUBLIC_RECENT_JOBS)
            .await?;

        Ok(PublicCompany {
            company,
            recent_jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founded_year_bounds() {
        assert!(validate_founded_year(1800).is_ok());
        assert!(validate_founded_year(1799).is_err());
        assert!(validate_founded_year(chrono::Utc::now().year()).is_ok());
        assert!(validate_founded_year(chrono::Utc::now().year() + 1).is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateCompanyRequest {
            name: "N".into(),
            industry: "Cloud".into(),
            website: Some("not a url".into()),
            logo_url: None,
            description: None,
            location: None,
            size: None,
            founded_year: Some(2015),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("website"));
        assert!(!fields.contains_key("founded_year"));
    }

    #[test]
    fn test_update_rejects_founded_year_out_of_range() {
        let request = UpdateCompanyRequest {
            founded_year: Some(1700),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("founded_year"));

        let request = UpdateCompanyRequest {
            founded_year: Some(1999),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
