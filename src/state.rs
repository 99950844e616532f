use std::sync::Arc;

use crate::{config::Config, utils::trivia::QuestionSource};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub questions: Arc<dyn QuestionSource>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuestionSource> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}
