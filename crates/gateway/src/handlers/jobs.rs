//! Job posting, form builder and public listing handlers

use axum::extract::State;
use jobboard_common::{
    db::models::{Job, JobFormField},
    domain::Page,
    errors::Result,
    services::jobs::{
        CreateJobRequest, FormRequest, JobDetail, JobListQuery, JobSummary, PublicJob,
        PublicJobDetail, UpdateJobRequest, UpdateStatusRequest,
    },
    ApiResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::{AuthEmployer, CompanyEmployer, OptionalUser};

pub async fn create(
    State(state): State<AppState>,
    CompanyEmployer(member): CompanyEmployer,
    ApiJson(request): ApiJson<CreateJobRequest>,
) -> Result<ApiResponse<JobDetail>> {
    let job = state.services.jobs.create(&member, request).await?;
    Ok(ApiResponse::created("Job created successfully", job))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
) -> Result<ApiResponse<Vec<JobSummary>>> {
    let jobs = state.services.jobs.mine(&employer).await?;
    Ok(ApiResponse::ok("Jobs fetched", jobs))
}

pub async fn owner_detail(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<JobDetail>> {
    let job = state.services.jobs.owner_detail(&employer, id).await?;
    Ok(ApiResponse::ok("Job fetched", job))
}

pub async fn update(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateJobRequest>,
) -> Result<ApiResponse<Job>> {
    let job = state.services.jobs.update(&employer, id, request).await?;
    Ok(ApiResponse::ok("Job updated successfully", job))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<ApiResponse<Job>> {
    let job = state.services.jobs.update_status(&employer, id, request).await?;
    Ok(ApiResponse::ok("Job status updated", job))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.services.jobs.delete(&employer, id).await?;
    Ok(ApiResponse::message("Job deleted successfully"))
}

// ============================================================================
// Form builder
// ============================================================================

pub async fn form(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<Vec<JobFormField>>> {
    let fields = state.services.jobs.form(&employer, id).await?;
    Ok(ApiResponse::ok("Form fetched", fields))
}

pub async fn replace_form(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<FormRequest>,
) -> Result<ApiResponse<Vec<JobFormField>>> {
    let fields = state.services.jobs.replace_form(&employer, id, request).await?;
    Ok(ApiResponse::ok("Form saved", fields))
}

pub async fn upsert_form(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<FormRequest>,
) -> Result<ApiResponse<Vec<JobFormField>>> {
    let fields = state.services.jobs.upsert_form(&employer, id, request).await?;
    Ok(ApiResponse::ok("Form updated", fields))
}

pub async fn delete_form_field(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath((id, field_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<ApiResponse<()>> {
    state
        .services
        .jobs
        .delete_form_field(&employer, id, field_id)
        .await?;
    Ok(ApiResponse::message("Form field deleted"))
}

// ============================================================================
// Public listing
// ============================================================================

pub async fn list_public(
    State(state): State<AppState>,
    viewer: OptionalUser,
    ApiQuery(query): ApiQuery<JobListQuery>,
) -> Result<ApiResponse<Page<PublicJob>>> {
    let page = state
        .services
        .jobs
        .list_public(&query, viewer.job_seeker_id())
        .await?;
    Ok(ApiResponse::ok("Jobs fetched", page))
}

pub async fn public_detail(
    State(state): State<AppState>,
    viewer: OptionalUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<PublicJobDetail>> {
    let job = state
        .services
        .jobs
        .public_detail(id, viewer.job_seeker_id())
        .await?;
    Ok(ApiResponse::ok("Job fetched", job))
}
