// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::ADMIN_HISTORY_LIMIT,
    error::{AppError, is_unique_violation},
    models::{
        attempt::AttemptView,
        user::{AdminCreateUserRequest, UpdateRoleRequest, User},
    },
    utils::{hash::hash_password, jwt::Claims},
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, password, role, created_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// Creates a new user with specific role.
/// Admin only.
pub async fn create_user(
    State(pool): State<PgPool>,
    payload: Result<Json<AdminCreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, username, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(payload.email.trim())
    .bind(payload.username.trim())
    .bind(&hashed_password)
    .bind(payload.role.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("User already exists".to_string())
        } else {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    tracing::info!("Admin created user {} with role {}", id, payload.role);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "id": id })),
    ))
}

/// Changes a user's role.
/// Admin only.
pub async fn update_user_role(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(payload.role.as_str())
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update role: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("User {} is now {}", id, payload.role);

    Ok(Json(json!({ "message": "Role updated" })))
}

/// Deletes a user by ID, together with their attempts and summary.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    if id == claims.user {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("Deleted user {}", id);

    Ok(Json(json!({ "message": "User deleted" })))
}

/// The most recent attempts across all users.
/// Admin only.
pub async fn list_attempts(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, AttemptView>(
        r#"
        SELECT a.id, a.user_id, q.question, a.selected_answer, a.is_correct, a.answered_at, u.username
        FROM attempts a
        JOIN questions q ON a.question_id = q.id
        JOIN users u ON a.user_id = u.id
        ORDER BY a.answered_at DESC, a.id DESC
        LIMIT $1
        "#,
    )
    .bind(ADMIN_HISTORY_LIMIT)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch attempts: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(attempts))
}
