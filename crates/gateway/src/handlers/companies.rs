//! Company directory handlers

use axum::extract::State;
use jobboard_common::{
    db::models::Company,
    errors::Result,
    services::companies::{
        CompanyMembership, CreateCompanyRequest, PublicCompany, UpdateCompanyRequest,
    },
    ApiResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::{AuthEmployer, CompanyEmployer};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    AuthEmployer(_employer): AuthEmployer,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<ApiResponse<Vec<Company>>> {
    let companies = state.services.companies.search(&query.q).await?;
    Ok(ApiResponse::ok(
        format!("Found {} companies", companies.len()),
        companies,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiJson(request): ApiJson<CreateCompanyRequest>,
) -> Result<ApiResponse<CompanyMembership>> {
    let membership = state.services.companies.create(&employer, request).await?;
    Ok(ApiResponse::created("Company created successfully", membership))
}

pub async fn select(
    State(state): State<AppState>,
    AuthEmployer(employer): AuthEmployer,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<ApiResponse<CompanyMembership>> {
    let membership = state.services.companies.select(&employer, company_id).await?;
    Ok(ApiResponse::ok("Company selected successfully", membership))
}

pub async fn get_mine(
    State(state): State<AppState>,
    CompanyEmployer(member): CompanyEmployer,
) -> Result<ApiResponse<Company>> {
    let company = state.services.companies.mine(&member).await?;
    Ok(ApiResponse::ok("Company fetched", company))
}

pub async fn update_mine(
    State(state): State<AppState>,
    CompanyEmployer(member): CompanyEmployer,
    ApiJson(request): ApiJson<UpdateCompanyRequest>,
) -> Result<ApiResponse<Company>> {
    let company = state.services.companies.update_mine(&member, request).await?;
    Ok(ApiResponse::ok("Company updated successfully", company))
}

/// Public company page
pub async fn get_public(
    State(state): State<AppState>,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<ApiResponse<PublicCompany>> {
    let company = state.services.companies.public(company_id).await?;
    Ok(ApiResponse::ok("Company fetched", company))
}
