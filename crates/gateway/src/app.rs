//! Shared state and route table

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use jobboard_common::{config::AppConfig, db::DbPool, Services};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::{
    metrics::track_metrics,
    rate_limit::{create_rate_limiter, rate_limit_middleware},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub services: Services,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DbPool, services: Services) -> Self {
        Self {
            config,
            db,
            services,
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Credential endpoints sit behind the token bucket
    let mut credential_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login));
    if state.config.rate_limit.enabled {
        let limiter = create_rate_limiter(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        credential_routes = credential_routes.layer(axum_middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    let auth_routes = credential_routes
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me));

    let jobseeker_routes = Router::new()
        .route("/profile-status", get(handlers::jobseeker::profile_status))
        .route("/basic-details", put(handlers::jobseeker::update_basic_details))
        .route(
            "/profile",
            get(handlers::jobseeker::get_profile).put(handlers::jobseeker::upsert_profile),
        )
        .route(
            "/education",
            get(handlers::jobseeker::list_education).post(handlers::jobseeker::add_education),
        )
        .route(
            "/education/{id}",
            put(handlers::jobseeker::update_education).delete(handlers::jobseeker::delete_education),
        )
        .route(
            "/experience",
            get(handlers::jobseeker::list_experience).post(handlers::jobseeker::add_experience),
        )
        .route(
            "/experience/{id}",
            put(handlers::jobseeker::update_experience)
                .delete(handlers::jobseeker::delete_experience),
        )
        .route(
            "/projects",
            get(handlers::jobseeker::list_projects).post(handlers::jobseeker::add_project),
        )
        .route(
            "/projects/{id}",
            put(handlers::jobseeker::update_project).delete(handlers::jobseeker::delete_project),
        )
        .route(
            "/preferences",
            get(handlers::jobseeker::get_preferences).put(handlers::jobseeker::upsert_preferences),
        )
        .route("/dashboard", get(handlers::dashboard::seeker));

    let employer_routes = Router::new()
        .route("/profile-status", get(handlers::employer::profile_status))
        .route("/basic-details", put(handlers::employer::update_basic_details))
        .route(
            "/profile",
            get(handlers::employer::get_profile).put(handlers::employer::upsert_profile),
        )
        .route("/account", delete(handlers::employer::delete_account))
        .route("/companies", post(handlers::companies::create))
        .route("/companies/search", get(handlers::companies::search))
        .route(
            "/companies/mine",
            get(handlers::companies::get_mine).put(handlers::companies::update_mine),
        )
        .route("/companies/{id}/select", post(handlers::companies::select))
        .route("/dashboard", get(handlers::dashboard::employer));

    let job_routes = Router::new()
        .route("/jobs", post(handlers::jobs::create))
        .route("/jobs/mine", get(handlers::jobs::mine))
        .route(
            "/jobs/{id}",
            get(handlers::jobs::owner_detail)
                .put(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .route("/jobs/{id}/status", patch(handlers::jobs::update_status))
        .route(
            "/jobs/{id}/form",
            get(handlers::jobs::form)
                .post(handlers::jobs::replace_form)
                .put(handlers::jobs::upsert_form),
        )
        .route("/jobs/{id}/form/{field_id}", delete(handlers::jobs::delete_form_field))
        .route("/jobs/{id}/applications", get(handlers::applications::job_applicants))
        .route(
            "/jobs/{id}/applications/{application_id}",
            get(handlers::applications::job_application_detail),
        )
        .route(
            "/jobs/{id}/applications/{application_id}/status",
            patch(handlers::applications::update_status),
        );

    let public_seeker_routes = Router::new()
        .route("/jobs", get(handlers::jobs::list_public))
        .route("/jobs/{id}", get(handlers::jobs::public_detail))
        .route("/jobs/{id}/apply", post(handlers::applications::apply))
        .route("/applications", get(handlers::applications::seeker_list))
        .route("/applications/{id}", get(handlers::applications::seeker_detail))
        .route(
            "/applications/{id}/withdraw",
            patch(handlers::applications::withdraw),
        );

    let application_routes = Router::new()
        .route("/my-history", get(handlers::applications::history))
        .route("/my-stats", get(handlers::applications::stats));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/jobseeker", jobseeker_routes)
        .nest("/employer", employer_routes)
        .merge(job_routes)
        .nest("/jobseekers", public_seeker_routes)
        .nest("/applications", application_routes)
        .route("/companies/{id}", get(handlers::companies::get_public));

    // Compose the app
    Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(track_metrics))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use jobboard_common::{auth::JwtManager, db::Repository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let conn = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let db = DbPool::from_connection(conn);
        let config = AppConfig::default();
        let jwt = Arc::new(JwtManager::new("test_secret", 3600));
        let services = Services::new(Repository::new(db.clone()), jwt, &config);
        create_router(AppState::new(Arc::new(config), db, services))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let response = test_app()
            .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let response = test_app()
            .oneshot(
                Request::get("/api/jobs/mine")
                    .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_signup_body_is_invalid_input() {
        let response = test_app()
            .oneshot(
                Request::post("/api/auth/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"name\": 1}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = test_app()
            .oneshot(Request::post("/api/auth/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
