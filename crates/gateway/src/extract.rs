//! Extractors that reject with the API error envelope

use axum::extract::{FromRequest, FromRequestParts};
use jobboard_common::errors::AppError;

/// `Json` whose rejection is a 400 validation error
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection is a 400 validation error
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejection is a 400 validation error
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
