// src/utils/trivia.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{config::TRIVIA_TIMEOUT_SECS, error::AppError, models::question::NewQuestion};

use super::translate;

/// A question as delivered by the trivia API, labels untranslated.
#[derive(Debug, Clone, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

impl TriviaQuestion {
    /// Converts into an insertable row with Spanish category/difficulty.
    pub fn translated(self) -> NewQuestion {
        NewQuestion {
            category: translate::category(&self.category).to_string(),
            difficulty: translate::difficulty(&self.difficulty).to_string(),
            question: self.question,
            correct_answer: self.correct_answer,
            incorrect_answers: self.incorrect_answers,
        }
    }
}

/// Envelope of an Open Trivia DB reply. `response_code` 0 means success.
#[derive(Debug, Deserialize)]
struct TriviaResponse {
    #[serde(default)]
    response_code: i64,
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

/// Source of new questions for `GET /questions/fetch`.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_batch(&self) -> Result<Vec<TriviaQuestion>, AppError>;
}

/// Open Trivia DB client. Requests `amount` multiple-choice questions.
pub struct OpenTdbClient {
    client: Client,
    url: Url,
}

impl OpenTdbClient {
    pub fn new(base_url: &str, amount: u32) -> Result<Self, AppError> {
        let url = Url::parse_with_params(
            base_url,
            &[("amount", amount.to_string()), ("type", "multiple".to_string())],
        )
        .map_err(|e| AppError::InternalServerError(format!("Invalid trivia API URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(TRIVIA_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch_batch(&self) -> Result<Vec<TriviaQuestion>, AppError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::InternalServerError(format!("Trivia API request failed: {}", e)))?;

        let body: TriviaResponse = response
            .json()
            .await
            .map_err(|e| AppError::InternalServerError(format!("Trivia API decode failed: {}", e)))?;

        if body.response_code != 0 {
            return Err(AppError::InternalServerError(format!(
                "Trivia API returned response_code {}",
                body.response_code
            )));
        }

        Ok(body.results)
    }
}
