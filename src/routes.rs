// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, attempt, auth, question},
    models::user::Role,
    state::AppState,
    utils::jwt::{auth_middleware, require_role},
};

/// CORS policy: the configured origin, the usual methods, and the two
/// headers the frontend sends. Preflight requests are answered here.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!("CORS_ORIGIN '{}' is not a valid header value; no origin allowed", origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Public routes: auth, question import/listing, answer submission.
/// * `/user/*` requires a token with role `user`.
/// * `/admin/*` requires a token with role `admin`.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/questions", get(question::list_questions))
        .route("/questions/fetch", get(question::fetch_questions))
        .route("/attempts/answers", post(attempt::save_answers));

    // Auth first (outermost), then the role check.
    let user_routes = Router::new()
        .route("/user/resumen", get(attempt::user_summary))
        .route("/user/historial", get(attempt::user_history))
        .route_layer(middleware::from_fn_with_state(Role::User, require_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/admin/historial", get(admin::list_attempts))
        .route("/admin/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/admin/users/{id}",
            put(admin::update_user_role)
                .patch(admin::update_user_role)
                .delete(admin::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(Role::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
