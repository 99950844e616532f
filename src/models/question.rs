// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    pub question: String,

    pub correct_answer: String,

    /// Wrong options, in the order the trivia API returned them.
    pub incorrect_answers: Vec<String>,

    /// Category label after translation (e.g., "Historia").
    pub category: String,

    /// Difficulty label after translation (e.g., "fácil").
    pub difficulty: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A question ready to be inserted, labels already translated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

/// Query parameters for `GET /questions`.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionFilter {
    pub categoria: Option<String>,
    pub dificultad: Option<String>,
}
