//! Signup, login, logout and session introspection

use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jobboard_common::{
    errors::Result,
    services::identity::{AuthSession, LoginRequest, MeResponse, SignupRequest},
    ApiResponse,
};

use crate::app::AppState;
use crate::extract::ApiJson;
use crate::middleware::auth::CurrentUser;

/// httpOnly, SameSite=Strict session cookie
fn session_cookie(state: &AppState, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.auth.cookie_secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

fn cookie_lifetime(state: &AppState) -> i64 {
    i64::try_from(state.config.auth.jwt_expiration_secs).unwrap_or(i64::MAX)
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(CookieJar, ApiResponse<AuthSession>)> {
    let session = state.services.identity.signup(request).await?;
    let cookie = session_cookie(&state, session.token.clone(), cookie_lifetime(&state));

    Ok((
        jar.add(cookie),
        ApiResponse::created("Account created successfully", session),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<AuthSession>)> {
    let session = state.services.identity.login(request).await?;
    let cookie = session_cookie(&state, session.token.clone(), cookie_lifetime(&state));

    Ok((jar.add(cookie), ApiResponse::ok("Logged in successfully", session)))
}

/// Expire the session cookie; tokens are stateless so nothing else to revoke
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiResponse<()>) {
    let expired = session_cookie(&state, String::new(), 0);
    (jar.add(expired), ApiResponse::message("Logged out successfully"))
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<ApiResponse<MeResponse>> {
    let me = state.services.identity.me(&actor).await?;
    Ok(ApiResponse::ok("Current user", me))
}
