//! Authentication extractors
//!
//! The session token is read from `Authorization: Bearer` first, then from
//! the session cookie. Every guard reloads the user through the identity
//! service, so role and profile ids are never trusted from the token alone.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use jobboard_common::{
    auth::{extract_bearer, Actor, CompanyMember, EmployerIdentity, SeekerIdentity},
    db::models::UserRole,
    errors::{AppError, Result},
};

use crate::app::AppState;

/// Bearer header or session cookie, whichever is present
fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let bearer = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
        .map(str::to_owned);

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(cookie_name)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty())
    })
}

async fn resolve(parts: &Parts, state: &AppState, role: Option<UserRole>) -> Result<Actor> {
    let token = session_token(parts, &state.config.auth.cookie_name)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state.services.identity.authenticate(&token, role).await
}

/// Any signed-in user
pub struct CurrentUser(pub Actor);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve(parts, state, None).await.map(CurrentUser)
    }
}

/// The caller if a valid session is present; never rejects
pub struct OptionalUser(pub Option<Actor>);

impl OptionalUser {
    /// Seeker profile id for personalised listings
    pub fn job_seeker_id(&self) -> Option<uuid::Uuid> {
        match &self.0 {
            Some(Actor::Seeker(seeker)) => seeker.job_seeker_id,
            _ => None,
        }
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        if session_token(parts, &state.config.auth.cookie_name).is_none() {
            return Ok(OptionalUser(None));
        }
        match resolve(parts, state, None).await {
            Ok(actor) => Ok(OptionalUser(Some(actor))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid optional session");
                Ok(OptionalUser(None))
            }
        }
    }
}

/// A signed-in job seeker
pub struct AuthSeeker(pub SeekerIdentity);

impl FromRequestParts<AppState> for AuthSeeker {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve(parts, state, Some(UserRole::JobSeeker))
            .await?
            .into_seeker()
            .map(AuthSeeker)
    }
}

/// A signed-in employer, with or without profile and company
pub struct AuthEmployer(pub EmployerIdentity);

impl FromRequestParts<AppState> for AuthEmployer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve(parts, state, Some(UserRole::Employer))
            .await?
            .into_employer()
            .map(AuthEmployer)
    }
}

/// An employer whose profile points at an active company
pub struct CompanyEmployer(pub CompanyMember);

impl FromRequestParts<AppState> for CompanyEmployer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let AuthEmployer(employer) = AuthEmployer::from_request_parts(parts, state).await?;
        state
            .services
            .companies
            .require_company(&employer)
            .await
            .map(CompanyEmployer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let parts = parts(
            Request::get("/")
                .header("authorization", "Bearer header-token")
                .header("cookie", "token=cookie-token"),
        );
        assert_eq!(session_token(&parts, "token").as_deref(), Some("header-token"));
    }

    #[test]
    fn test_cookie_fallback() {
        let parts = parts(Request::get("/").header("cookie", "theme=dark; token=abc"));
        assert_eq!(session_token(&parts, "token").as_deref(), Some("abc"));
        assert_eq!(session_token(&parts, "session"), None);
    }

    #[test]
    fn test_no_credentials() {
        let parts = parts(Request::get("/"));
        assert!(session_token(&parts, "token").is_none());
    }
}
