//! Employer onboarding and account handlers

use axum::extract::State;
use jobboard_common::{
    db::models::{Employer, User},
    domain::ProfileStatus,
    errors::Result,
    services::onboarding::{BasicDetailsRequest, EmployerProfileRequest, EmployerProfileView},
    ApiResponse,
};

use crate::app::AppState;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthEmployer;

pub async fn profile_status(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
) -> Result<ApiResponse<ProfileStatus>> {
    let status = state.services.onboarding.employer_status(&employer).await?;
    Ok(ApiResponse::ok("Profile status fetched", status))
}

pub async fn update_basic_details(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiJson(request): ApiJson<BasicDetailsRequest>,
) -> Result<ApiResponse<User>> {
    let user = state
        .services
        .onboarding
        .update_basic_details(employer.user.id, request)
        .await?;
    Ok(ApiResponse::ok("Basic details updated", user))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
) -> Result<ApiResponse<EmployerProfileView>> {
    let profile = state.services.onboarding.employer_profile(&employer).await?;
    Ok(ApiResponse::ok("Profile fetched", profile))
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiJson(request): ApiJson<EmployerProfileRequest>,
) -> Result<ApiResponse<Employer>> {
    let profile = state
        .services
        .onboarding
        .upsert_employer_profile(&employer, request)
        .await?;
    Ok(ApiResponse::ok("Profile saved", profile))
}

/// Deletes the employer, their jobs with everything under them, and the user
pub async fn delete_account(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
) -> Result<ApiResponse<()>> {
    state
        .services
        .onboarding
        .delete_employer_account(&employer)
        .await?;
    Ok(ApiResponse::message("Account deleted"))
}
