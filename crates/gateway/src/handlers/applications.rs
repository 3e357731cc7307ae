//! Application workflow handlers

use axum::extract::State;
use jobboard_common::{
    db::{models::Application, ApplicationWithJob},
    domain::analytics::StatusDistribution,
    errors::Result,
    services::applications::{
        ApplicantDetail, ApplicantView, ApplyRequest, SeekerApplicationDetail,
        SeekerApplicationsQuery, StatusChangeRequest,
    },
    ApiResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::{AuthEmployer, AuthSeeker};

// ============================================================================
// Seeker side
// ============================================================================

pub async fn apply(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(job_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ApplyRequest>,
) -> Result<ApiResponse<Application>> {
    let application = state
        .services
        .applications
        .apply(&seeker, job_id, request)
        .await?;
    Ok(ApiResponse::created("Application submitted successfully", application))
}

pub async fn seeker_list(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiQuery(query): ApiQuery<SeekerApplicationsQuery>,
) -> Result<ApiResponse<Vec<ApplicationWithJob>>> {
    let applications = state
        .services
        .applications
        .seeker_list(&seeker, &query)
        .await?;
    Ok(ApiResponse::ok("Applications fetched", applications))
}

pub async fn seeker_detail(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<SeekerApplicationDetail>> {
    let application = state.services.applications.seeker_detail(&seeker, id).await?;
    Ok(ApiResponse::ok("Application fetched", application))
}

pub async fn withdraw(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<Application>> {
    let application = state.services.applications.withdraw(&seeker, id).await?;
    Ok(ApiResponse::ok("Application withdrawn", application))
}

pub async fn history(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<Vec<ApplicationWithJob>>> {
    let applications = state.services.applications.history(&seeker).await?;
    Ok(ApiResponse::ok("Application history fetched", applications))
}

pub async fn stats(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<StatusDistribution>> {
    let stats = state.services.applications.stats(&seeker).await?;
    Ok(ApiResponse::ok("Application stats fetched", stats))
}

// ============================================================================
// Employer side
// ============================================================================

pub async fn job_applicants(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<ApiResponse<Vec<ApplicantView>>> {
    let applicants = state
        .services
        .applications
        .job_applicants(&employer, job_id)
        .await?;
    Ok(ApiResponse::ok("Applicants fetched", applicants))
}

pub async fn job_application_detail(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath((job_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<ApiResponse<ApplicantDetail>> {
    let applicant = state
        .services
        .applications
        .job_application_detail(&employer, job_id, id)
        .await?;
    Ok(ApiResponse::ok("Application fetched", applicant))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath((job_id, id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<StatusChangeRequest>,
) -> Result<ApiResponse<Application>> {
    let application = state
        .services
        .applications
        .update_status(&employer, job_id, id, request)
        .await?;
    Ok(ApiResponse::ok("Application status updated", application))
}
