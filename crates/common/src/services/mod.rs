//! Service layer
//!
//! Each service owns a cloned [`Repository`] and holds the rules of one
//! area; handlers only translate HTTP to service calls.

pub mod applications;
pub mod companies;
pub mod dashboard;
pub mod identity;
pub mod jobs;
pub mod onboarding;

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::config::AppConfig;
use crate::db::Repository;

pub use applications::ApplicationService;
pub use companies::CompanyService;
pub use dashboard::DashboardService;
pub use identity::IdentityService;
pub use jobs::JobService;
pub use onboarding::OnboardingService;

/// Every service, shared across handlers
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<IdentityService>,
    pub onboarding: Arc<OnboardingService>,
    pub companies: Arc<CompanyService>,
    pub jobs: Arc<JobService>,
    pub applications: Arc<ApplicationService>,
    pub dashboard: Arc<DashboardService>,
}

impl Services {
    pub fn new(repo: Repository, jwt: Arc<JwtManager>, config: &AppConfig) -> Self {
        Self {
            identity: Arc::new(IdentityService::new(repo.clone(), jwt)),
            onboarding: Arc::new(OnboardingService::new(repo.clone())),
            companies: Arc::new(CompanyService::new(
                repo.clone(),
                config.companies.allow_company_switch,
            )),
            jobs: Arc::new(JobService::new(repo.clone())),
            applications: Arc::new(ApplicationService::new(repo.clone())),
            dashboard: Arc::new(DashboardService::new(repo)),
        }
    }
}
