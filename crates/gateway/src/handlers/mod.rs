//! API handlers module

pub mod applications;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod employer;
pub mod health;
pub mod jobs;
pub mod jobseeker;
