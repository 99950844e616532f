// src/handlers/auth.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, is_unique_violation},
    models::user::{LoginIdentifier, LoginRequest, LoginResponse, RegisterRequest, Role, User},
    utils::{
        hash::{hash_password, verify_password_or_dummy},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. The role is always
/// `user`. Returns 201 Created, or 409 when the email/username is taken.
pub async fn register(
    State(pool): State<PgPool>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    sqlx::query(
        r#"
        INSERT INTO users (email, username, password, role)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(payload.email.trim())
    .bind(payload.username.trim())
    .bind(&hashed_password)
    .bind(Role::User.as_str())
    .execute(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("User already exists".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!("Registered user {}", payload.username.trim());

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered" })),
    ))
}

/// Authenticates a user by email or username and returns a JWT token.
///
/// Unknown accounts and wrong passwords produce the same 401.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let identifier = payload
        .identifier()
        .ok_or_else(|| AppError::BadRequest("Email or username is required".to_string()))?;
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    // Each identifier is matched only against its own column.
    let sql = match identifier {
        LoginIdentifier::Email(_) => {
            "SELECT id, email, username, password, role, created_at FROM users WHERE email = $1"
        }
        LoginIdentifier::Username(_) => {
            "SELECT id, email, username, password, role, created_at FROM users WHERE username = $1"
        }
    };

    let user = sqlx::query_as::<_, User>(sql)
        .bind(identifier.value())
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let is_valid = verify_password_or_dummy(
        &payload.password,
        user.as_ref().map(|u| u.password.as_str()),
    )?;

    let user = match user {
        Some(user) if is_valid => user,
        _ => {
            tracing::warn!("Failed login for '{}'", identifier.value());
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }
    };

    let token = sign_jwt(
        user.id,
        &user.email,
        user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(LoginResponse {
        token,
        role: user.role,
        user: user.id,
        username: user.username,
    }))
}
