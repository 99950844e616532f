// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgConnection, PgPool};

use crate::{
    config::{Config, SUMMARY_HISTORY_LIMIT, SummaryMode},
    error::{AppError, is_foreign_key_violation},
    models::attempt::{AttemptAnswer, AttemptView, BatchTally, SaveAnswersResponse, SummaryEntry},
    utils::jwt::Claims,
};

/// Returns the single user a batch belongs to.
///
/// Empty batches and batches mixing users are rejected: the summary row is
/// keyed on exactly one user.
fn batch_owner(answers: &[AttemptAnswer]) -> Result<i64, AppError> {
    let first = answers
        .first()
        .ok_or_else(|| AppError::BadRequest("batch must contain at least one answer".to_string()))?;

    if answers.iter().any(|a| a.user_id != first.user_id) {
        return Err(AppError::BadRequest(
            "all answers in a batch must belong to the same user".to_string(),
        ));
    }

    Ok(first.user_id)
}

/// Writes the batch tally into `attempt_summary` (insert or update).
async fn upsert_summary(
    conn: &mut PgConnection,
    user_id: i64,
    tally: BatchTally,
    mode: SummaryMode,
) -> Result<(), sqlx::Error> {
    let sql = match mode {
        SummaryMode::Overwrite => {
            r#"
            INSERT INTO attempt_summary (user_id, correct_count, incorrect_count)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                correct_count = EXCLUDED.correct_count,
                incorrect_count = EXCLUDED.incorrect_count
            "#
        }
        SummaryMode::Accumulate => {
            r#"
            INSERT INTO attempt_summary (user_id, correct_count, incorrect_count)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                correct_count = attempt_summary.correct_count + EXCLUDED.correct_count,
                incorrect_count = attempt_summary.incorrect_count + EXCLUDED.incorrect_count
            "#
        }
    };

    sqlx::query(sql)
        .bind(user_id)
        .bind(tally.correct)
        .bind(tally.incorrect)
        .execute(conn)
        .await?;

    Ok(())
}

fn storage_error(context: &str, e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::BadRequest("Unknown user or question".to_string());
    }
    tracing::error!("{}: {:?}", context, e);
    AppError::InternalServerError(e.to_string())
}

/// Stores a batch of answers and updates the owner's summary.
///
/// * Every answer becomes one `attempts` row.
/// * The summary is upserted from this batch's tally (`SummaryMode` decides
///   between replacing and adding).
/// * All writes share one transaction; any failure leaves nothing behind.
pub async fn save_answers(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    payload: Result<Json<Vec<AttemptAnswer>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(answers) = payload?;
    let user_id = batch_owner(&answers)?;
    let tally = BatchTally::from_answers(&answers);

    tracing::info!("Received {} answers for user {}", answers.len(), user_id);

    let mut tx = pool.begin().await?;

    for answer in &answers {
        sqlx::query(
            r#"
            INSERT INTO attempts (user_id, question_id, selected_answer, is_correct)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(answer.user_id)
        .bind(answer.question_id)
        .bind(&answer.selected_answer)
        .bind(answer.is_correct)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to save attempt", e))?;
    }

    upsert_summary(&mut *tx, user_id, tally, config.summary_mode)
        .await
        .map_err(|e| storage_error("Failed to save summary", e))?;

    let username: String = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to load username", e))?;

    tx.commit().await?;

    tracing::info!(
        "Saved summary for user {}: {} correct, {} incorrect",
        user_id,
        tally.correct,
        tally.incorrect
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveAnswersResponse {
            user_id,
            username,
            correct: tally.correct,
            incorrect: tally.incorrect,
            percentage: tally.percentage_label(),
        }),
    ))
}

/// The caller's summary rows, newest first.
pub async fn user_summary(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let summaries = sqlx::query_as::<_, SummaryEntry>(
        r#"
        SELECT correct_count AS correct, incorrect_count AS incorrect, created_at
        FROM attempt_summary
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(claims.user)
    .bind(SUMMARY_HISTORY_LIMIT)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch summary: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(summaries))
}

/// The caller's attempts with question text, newest first.
pub async fn user_history(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, AttemptView>(
        r#"
        SELECT a.id, a.user_id, q.question, a.selected_answer, a.is_correct, a.answered_at, u.username
        FROM attempts a
        JOIN questions q ON a.question_id = q.id
        JOIN users u ON a.user_id = u.id
        WHERE a.user_id = $1
        ORDER BY a.answered_at DESC, a.id DESC
        "#,
    )
    .bind(claims.user)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch attempt history: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(user_id: i64, is_correct: bool) -> AttemptAnswer {
        AttemptAnswer {
            user_id,
            question_id: 1,
            selected_answer: "A".to_string(),
            is_correct,
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(batch_owner(&[]), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn mixed_batch_is_rejected() {
        let batch = [answer(1, true), answer(2, false)];
        assert!(matches!(batch_owner(&batch), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn single_user_batch_yields_owner() {
        let batch = [answer(5, true), answer(5, false), answer(5, true)];
        assert_eq!(batch_owner(&batch).unwrap(), 5);
    }
}
