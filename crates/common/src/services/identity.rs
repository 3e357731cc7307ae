//! Signup, login and per-request authentication

use std::sync::Arc;

use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    hash_password, verify_password, Actor, EmployerIdentity, JwtManager, SeekerIdentity,
    SessionUser,
};
use crate::db::models::{CompanyRole, User, UserRole};
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::metrics;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued token plus who it belongs to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_seeker_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_role: Option<CompanyRole>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct IdentityService {
    repo: Repository,
    jwt: Arc<JwtManager>,
}

impl IdentityService {
    pub fn new(repo: Repository, jwt: Arc<JwtManager>) -> Self {
        Self { repo, jwt }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthSession> {
        request.validate()?;
        let email = normalize_email(&request.email);

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repo
            .create_user(request.name.trim().to_string(), email, password_hash, request.role)
            .await?;

        metrics::record_signup(&user.role.to_value());
        info!(user_id = %user.id, role = ?user.role, "User signed up");

        self.session_for(&user)
    }

    /// Unknown email and wrong password are reported differently
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let user = match self.repo.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                metrics::record_login(false);
                return Err(AppError::not_found("No account found with this email"));
            }
        };

        if !verify_password(&request.password, &user.password_hash) {
            metrics::record_login(false);
            return Err(AppError::unauthorized("Invalid password"));
        }

        metrics::record_login(true);
        info!(user_id = %user.id, "User logged in");

        self.session_for(&user)
    }

    fn session_for(&self, user: &User) -> Result<AuthSession> {
        Ok(AuthSession {
            token: self.jwt.generate_token(user)?,
            user: SessionUser::from(user),
        })
    }

    /// Verify a token and reload the caller, optionally requiring a role.
    ///
    /// Any verification failure, a deleted user or a role that no longer
    /// matches the token is Unauthorized; the wrong role is Forbidden.
    pub async fn authenticate(&self, token: &str, required: Option<UserRole>) -> Result<Actor> {
        let claims = self.jwt.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        if user.role != claims.role {
            return Err(AppError::unauthorized("Token does not match account"));
        }
        if let Some(required) = required {
            if user.role != required {
                return Err(AppError::forbidden(match required {
                    UserRole::JobSeeker => "Job seeker access required",
                    UserRole::Employer => "Employer access required",
                }));
            }
        }

        let session = SessionUser::from(&user);
        match user.role {
            UserRole::JobSeeker => {
                let profile = self.repo.find_job_seeker_by_user(user.id).await?;
                Ok(Actor::Seeker(SeekerIdentity {
                    user: session,
                    job_seeker_id: profile.map(|p| p.id),
                }))
            }
            UserRole::Employer => {
                let profile = self.repo.find_employer_by_user(user.id).await?;
                Ok(Actor::Employer(EmployerIdentity {
                    user: session,
                    employer_id: profile.as_ref().map(|p| p.id),
                    company_id: profile.as_ref().and_then(|p| p.company_id),
                    company_role: profile.map(|p| p.company_role),
                }))
            }
        }
    }

    pub async fn me(&self, actor: &Actor) -> Result<MeResponse> {
        let user = self
            .repo
            .find_user_by_id(actor.user().id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(match actor {
            Actor::Seeker(seeker) => MeResponse {
                user,
                job_seeker_id: seeker.job_seeker_id,
                employer_id: None,
                company_id: None,
                company_role: None,
            },
            Actor::Employer(employer) => MeResponse {
                user,
                job_seeker_id: None,
                employer_id: employer.employer_id,
                company_id: employer.company_id,
                company_role: employer.company_role,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_signup_validation() {
        let request = SignupRequest {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            role: UserRole::JobSeeker,
        };
        let err: AppError = request.validate().unwrap_err().into();
        match err {
            AppError::Validation { issues, .. } => {
                let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "name", "password"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
