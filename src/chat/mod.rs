mod gemini;
mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{build_prompt, fallback_answer};

use crate::config::GeminiConfig;
use crate::domain::event::PlanningEvent;
use crate::domain::overview::OverviewResult;
use crate::errors::ServerError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Citation {
    pub planning_reference: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub overview: OverviewResult,
}

/// Produces answers from retrieved context: Gemini when a key is set,
/// otherwise the offline bullet list.
pub struct Answerer {
    gemini: Option<GeminiClient>,
}

impl Answerer {
    pub fn new(cfg: &GeminiConfig) -> Result<Self, ServerError> {
        let gemini = if cfg.api_key.is_empty() {
            None
        } else {
            Some(GeminiClient::new(cfg)?)
        };
        Ok(Self { gemini })
    }

    pub fn is_configured(&self) -> bool {
        self.gemini.is_some()
    }

    pub fn answer(
        &self,
        question: &str,
        ctx: &[&PlanningEvent],
        overview: OverviewResult,
    ) -> Result<ChatAnswer, ServerError> {
        let answer = match &self.gemini {
            Some(client) => client.generate(&build_prompt(question, ctx))?,
            None => fallback_answer(ctx),
        };

        let citations = ctx
            .iter()
            .map(|e| Citation {
                planning_reference: e.reference.clone(),
                url: e.url.clone(),
            })
            .collect();

        Ok(ChatAnswer {
            answer,
            citations,
            overview,
        })
    }
}
