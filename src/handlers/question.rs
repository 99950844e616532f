// src/handlers/question.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::question::{NewQuestion, Question, QuestionFilter},
    utils::{translate, trivia::QuestionSource},
};

/// Pulls one batch from the trivia API and stores every question.
///
/// Inserts are independent: if one fails, the questions saved before it stay.
pub async fn fetch_questions(
    State(pool): State<PgPool>,
    State(source): State<Arc<dyn QuestionSource>>,
) -> Result<impl IntoResponse, AppError> {
    let batch = source.fetch_batch().await?;
    let total = batch.len();

    for item in batch {
        insert_question(&pool, &item.translated()).await?;
    }

    tracing::info!("Imported {} questions from the trivia API", total);

    Ok(format!("Saved {} questions", total))
}

async fn insert_question(pool: &PgPool, q: &NewQuestion) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions (question, correct_answer, incorrect_answers, category, difficulty)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&q.question)
    .bind(&q.correct_answer)
    .bind(&q.incorrect_answers)
    .bind(&q.category)
    .bind(&q.difficulty)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(id)
}

/// Normalizes a filter value: blanks are ignored, the rest go through the
/// same translation as imported labels.
fn filter_value(raw: Option<&str>, translate_label: fn(&str) -> &str) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| translate_label(s).to_string())
}

/// Lists stored questions, newest first, optionally filtered by
/// `categoria` and/or `dificultad`.
pub async fn list_questions(
    State(pool): State<PgPool>,
    params: Result<Query<QuestionFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    let category = filter_value(params.categoria.as_deref(), translate::category);
    let difficulty = filter_value(params.dificultad.as_deref(), translate::difficulty);

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, correct_answer, incorrect_answers, category, difficulty, created_at
        FROM questions
        WHERE ($1::TEXT IS NULL OR category = $1)
          AND ($2::TEXT IS NULL OR difficulty = $2)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(category)
    .bind(difficulty)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_translates_english_labels() {
        assert_eq!(
            filter_value(Some("easy"), translate::difficulty),
            Some("fácil".to_string())
        );
        assert_eq!(
            filter_value(Some("History"), translate::category),
            Some("Historia".to_string())
        );
    }

    #[test]
    fn filter_keeps_spanish_labels() {
        assert_eq!(
            filter_value(Some("fácil"), translate::difficulty),
            Some("fácil".to_string())
        );
    }

    #[test]
    fn blank_filter_is_ignored() {
        assert_eq!(filter_value(Some("  "), translate::difficulty), None);
        assert_eq!(filter_value(None, translate::category), None);
    }
}
