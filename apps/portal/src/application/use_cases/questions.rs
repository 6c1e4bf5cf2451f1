use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use alasr_types::{Question, QuestionStatistics, QuestionStatus};

use crate::app_error::AppResult;
use crate::application::ports::QuestionGateway;
use crate::application::state::PortalState;
use crate::application::validators::matches_term;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuestionCounts {
    pub total: usize,
    pub pending: usize,
    pub replied: usize,
}

#[derive(Clone)]
pub struct QuestionsUseCases {
    questions: Arc<dyn QuestionGateway>,
}

impl QuestionsUseCases {
    pub fn new(questions: Arc<dyn QuestionGateway>) -> Self {
        Self { questions }
    }

    /// Load all questions, bypassing the cache.
    #[instrument(skip(self, state))]
    pub async fn load(&self, state: &mut PortalState) -> AppResult<()> {
        state.questions.set_loading(true);
        match self.questions.list(false).await {
            Ok(items) => {
                info!(count = items.len(), "Questions loaded");
                state.questions.set_items(items);
                Ok(())
            }
            Err(e) => {
                state.questions.set_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Load only the questions of `masjid_id`.
    #[instrument(skip(self, state))]
    pub async fn load_for_masjid(&self, state: &mut PortalState, masjid_id: &str) -> AppResult<()> {
        state.questions.set_loading(true);
        match self.questions.by_masjid(masjid_id).await {
            Ok(items) => {
                info!(masjid_id, count = items.len(), "Masjid questions loaded");
                state.questions.set_items(items);
                Ok(())
            }
            Err(e) => {
                state.questions.set_error(e.user_message());
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> AppResult<Question> {
        self.questions.get(id).await
    }

    #[instrument(skip(self, state))]
    pub async fn delete(&self, state: &mut PortalState, id: &str) -> AppResult<()> {
        self.questions.delete(id).await?;
        state.questions.remove(id);
        info!(question_id = %id, "Question deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn masjid_statistics(&self, masjid_id: &str) -> AppResult<QuestionStatistics> {
        self.questions.masjid_statistics(masjid_id).await
    }

    /// Number of questions still waiting for a reply. Uses the cached list.
    pub async fn pending_count(&self) -> AppResult<usize> {
        let questions = self.questions.list(true).await?;
        Ok(count_questions(&questions).pending)
    }
}

/// Questions matching `term` in title, asker or masjid name, and `status` when given.
pub fn filter_questions<'a>(
    questions: &'a [Question],
    term: &str,
    status: Option<QuestionStatus>,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| {
            matches_term(&q.title, term)
                || matches_term(&q.user_name, term)
                || q.masjid_name.as_deref().is_some_and(|name| matches_term(name, term))
        })
        .filter(|q| status.is_none_or(|s| q.status == s))
        .collect()
}

pub fn count_questions(questions: &[Question]) -> QuestionCounts {
    let pending = questions.iter().filter(|q| q.status.is_pending()).count();
    QuestionCounts {
        total: questions.len(),
        pending,
        replied: questions.len() - pending,
    }
}
