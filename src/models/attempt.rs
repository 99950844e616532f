// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One answer inside a submitted batch (`POST /attempts/answers`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub user_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// An attempt joined with its question text and the answering user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub id: i64,
    pub user_id: i64,
    pub question: String,
    pub selected_answer: String,
    pub is_correct: bool,
    pub answered_at: chrono::DateTime<chrono::Utc>,
    pub username: String,
}

/// A row of `attempt_summary` as shown to its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SummaryEntry {
    pub correct: i64,
    pub incorrect: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Correct/incorrect counts over one submitted batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub correct: i64,
    pub incorrect: i64,
}

impl BatchTally {
    pub fn from_answers(answers: &[AttemptAnswer]) -> Self {
        answers.iter().fold(Self::default(), |mut tally, answer| {
            if answer.is_correct {
                tally.correct += 1;
            } else {
                tally.incorrect += 1;
            }
            tally
        })
    }

    pub fn total(&self) -> i64 {
        self.correct + self.incorrect
    }

    /// Share of correct answers in percent; 0 for an empty tally.
    pub fn percentage(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total() as f64 * 100.0
    }

    /// Percentage with two decimals, e.g. "66.67".
    pub fn percentage_label(&self) -> String {
        format!("{:.2}", self.percentage())
    }
}

/// Response of `POST /attempts/answers`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnswersResponse {
    pub user_id: i64,
    pub username: String,
    pub correct: i64,
    pub incorrect: i64,
    pub percentage: String,
}
