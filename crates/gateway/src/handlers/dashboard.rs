//! Dashboard handlers

use axum::extract::State;
use jobboard_common::{
    errors::Result,
    services::dashboard::{EmployerDashboard, SeekerDashboard},
    ApiResponse,
};

use crate::app::AppState;
use crate::middleware::auth::{AuthEmployer, AuthSeeker};

pub async fn seeker(
    State(state): State<AppState>,
    AuthSeeker(seeker): AuthSeeker,
) -> Result<ApiResponse<SeekerDashboard>> {
    let dashboard = state.services.dashboard.seeker(&seeker).await?;
    Ok(ApiResponse::ok("Dashboard fetched", dashboard))
}

pub async fn employer(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
) -> Result<ApiResponse<EmployerDashboard>> {
    let dashboard = state.services.dashboard.employer(&employer).await?;
    Ok(ApiResponse::ok("Dashboard fetched", dashboard))
}
