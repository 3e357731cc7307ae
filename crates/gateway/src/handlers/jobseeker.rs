//! Job seeker onboarding and profile handlers

use axum::extract::State;
use jobboard_common::{
    db::models::{Education, Experience, JobSeeker, Preferences, Project, User},
    domain::ProfileStatus,
    errors::Result,
    services::onboarding::{
        BasicDetailsRequest, EducationRequest, ExperienceRequest, JobSeekerProfileRequest,
        JobSeekerProfileView, PreferencesRequest, ProjectRequest,
    },
    ApiResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthSeeker;

pub async fn profile_status(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<ProfileStatus>> {
    let status = state.services.onboarding.seeker_status(&seeker).await?;
    Ok(ApiResponse::ok("Profile status fetched", status))
}

pub async fn update_basic_details(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<BasicDetailsRequest>,
) -> Result<ApiResponse<User>> {
    let user = state
        .services
        .onboarding
        .update_basic_details(seeker.user.id, request)
        .await?;
    Ok(ApiResponse::ok("Basic details updated", user))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<JobSeekerProfileView>> {
    let profile = state.services.onboarding.seeker_profile(&seeker).await?;
    Ok(ApiResponse::ok("Profile fetched", profile))
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<JobSeekerProfileRequest>,
) -> Result<ApiResponse<JobSeeker>> {
    let profile = state
        .services
        .onboarding
        .upsert_seeker_profile(&seeker, request)
        .await?;
    Ok(ApiResponse::ok("Profile saved", profile))
}

// ============================================================================
// Education
// ============================================================================

pub async fn list_education(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<Vec<Education>>> {
    let entries = state.services.onboarding.list_education(&seeker).await?;
    Ok(ApiResponse::ok("Education fetched", entries))
}

pub async fn add_education(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<EducationRequest>,
) -> Result<ApiResponse<Education>> {
    let entry = state.services.onboarding.add_education(&seeker, request).await?;
    Ok(ApiResponse::created("Education added", entry))
}

pub async fn update_education(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<EducationRequest>,
) -> Result<ApiResponse<Education>> {
    let entry = state
        .services
        .onboarding
        .update_education(&seeker, id, request)
        .await?;
    Ok(ApiResponse::ok("Education updated", entry))
}

pub async fn delete_education(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.services.onboarding.delete_education(&seeker, id).await?;
    Ok(ApiResponse::message("Education deleted"))
}

// ============================================================================
// Experience
// ============================================================================

pub async fn list_experience(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<Vec<Experience>>> {
    let entries = state.services.onboarding.list_experience(&seeker).await?;
    Ok(ApiResponse::ok("Experience fetched", entries))
}

pub async fn add_experience(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<ExperienceRequest>,
) -> Result<ApiResponse<Experience>> {
    let entry = state.services.onboarding.add_experience(&seeker, request).await?;
    Ok(ApiResponse::created("Experience added", entry))
}

pub async fn update_experience(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ExperienceRequest>,
) -> Result<ApiResponse<Experience>> {
    let entry = state
        .services
        .onboarding
        .update_experience(&seeker, id, request)
        .await?;
    Ok(ApiResponse::ok("Experience updated", entry))
}

pub async fn delete_experience(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.services.onboarding.delete_experience(&seeker, id).await?;
    Ok(ApiResponse::message("Experience deleted"))
}

// ============================================================================
// Projects
// ============================================================================

pub async fn list_projects(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<Vec<Project>>> {
    let projects = state.services.onboarding.list_projects(&seeker).await?;
    Ok(ApiResponse::ok("Projects fetched", projects))
}

pub async fn add_project(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<ApiResponse<Project>> {
    let project = state.services.onboarding.add_project(&seeker, request).await?;
    Ok(ApiResponse::created("Project added", project))
}

pub async fn update_project(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<ApiResponse<Project>> {
    let project = state
        .services
        .onboarding
        .update_project(&seeker, id, request)
        .await?;
    Ok(ApiResponse::ok("Project updated", project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.services.onboarding.delete_project(&seeker, id).await?;
    Ok(ApiResponse::message("Project deleted"))
}

// ============================================================================
// Preferences
// ============================================================================

pub async fn get_preferences(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<Preferences>> {
    let preferences = state.services.onboarding.preferences(&seeker).await?;
    Ok(ApiResponse::ok("Preferences fetched", preferences))
}

pub async fn upsert_preferences(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiJson(request): ApiJson<PreferencesRequest>,
) -> Result<ApiResponse<Preferences>> {
    let preferences = state
        .services
        .onboarding
        .upsert_preferences(&seeker, request)
        .await?;
    Ok(ApiResponse::ok("Preferences saved", preferences))
}
