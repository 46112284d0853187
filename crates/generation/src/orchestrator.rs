//! Generation orchestrator: validation through persisted, parsed content.

use std::sync::Arc;
use std::time::Instant;

use database::post::{CompletedPost, NewCitation};
use database::{engagement, persona, post, Database, DatabaseError, Persona, Post};
use provider_core::{CompletionRequest, Provider};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::circuit::CircuitBreaker;
use crate::error::{GenerationError, Result};
use crate::parser;
use crate::prompts::{self, Speed};
use crate::retry::with_retry;
use crate::settings::GenerationSettings;

const MIN_TOPIC_CHARS: usize = 5;
const MAX_TITLE_CHARS: usize = 300;

/// Orchestrates one generation request end to end: validate, resolve the
/// persona, build prompts, persist a generating record, call the provider
/// through the circuit breaker and retry executor, parse, and complete.
pub struct Orchestrator {
    db: Database,
    provider: Arc<dyn Provider>,
    breaker: Arc<CircuitBreaker>,
    settings: GenerationSettings,
}

impl Orchestrator {
    pub fn new(
        db: Database,
        provider: Arc<dyn Provider>,
        breaker: Arc<CircuitBreaker>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            db,
            provider,
            breaker,
            settings,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Generate a post for the given topic and persona.
    ///
    /// Validation and persona lookup happen before any record exists and
    /// leave nothing behind on failure. Once the generating record is
    /// created, any later error marks it failed (with the error text in its
    /// metadata) before propagating.
    pub async fn generate(
        &self,
        topic: &str,
        persona_slug: &str,
        additional_context: &Value,
        speed: Speed,
    ) -> Result<Post> {
        validate_input(topic, persona_slug)?;
        let persona = self.resolve_persona(persona_slug).await?;

        let prompts = prompts::build(topic, &persona, additional_context, speed);
        let record =
            post::create_generating(self.db.pool(), topic, &prompts.user_prompt, persona.id)
                .await?;

        info!(
            post_id = record.id,
            persona = %persona.slug,
            speed = speed.as_str(),
            "starting generation"
        );

        match self
            .run_generation(&record, &persona, &prompts, speed)
            .await
        {
            Ok(post) => Ok(post),
            Err(err) => {
                error!(post_id = record.id, error = %err, "generation failed");
                post::fail_post(self.db.pool(), record.id, &err.to_string()).await?;
                Err(err)
            }
        }
    }

    async fn resolve_persona(&self, slug: &str) -> Result<Persona> {
        match persona::get_active_by_slug(self.db.pool(), slug).await {
            Ok(persona) => Ok(persona),
            Err(DatabaseError::NotFound { .. }) => {
                Err(GenerationError::PersonaNotFound(slug.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn run_generation(
        &self,
        record: &Post,
        persona: &Persona,
        prompts: &prompts::PromptPair,
        speed: Speed,
    ) -> Result<Post> {
        let provider_name = self.provider.name().to_string();
        self.breaker.check_open(&provider_name)?;

        let request = self.build_request(persona, prompts, speed);
        let max_retries = if speed.is_fast() {
            0
        } else {
            self.settings.max_retries
        };

        let started = Instant::now();
        let outcome = {
            let provider = Arc::clone(&self.provider);
            let result = with_retry(
                &provider_name,
                max_retries,
                self.settings.retry_base_delay,
                move |_| {
                    let provider = Arc::clone(&provider);
                    let request = request.clone();
                    async move { provider.complete(request).await }
                },
            )
            .await;

            match result {
                Ok(outcome) => {
                    self.breaker.record_success(&provider_name);
                    outcome
                }
                Err(err) => {
                    if matches!(err, GenerationError::Api { .. }) {
                        self.breaker.record_failure(&provider_name);
                    }
                    return Err(err);
                }
            }
        };
        let generation_time = started.elapsed().as_secs_f64();

        let parsed = parser::parse(&outcome.value.text);

        let title = match &parsed.title {
            Some(title) => title.chars().take(MAX_TITLE_CHARS).collect(),
            None => record.title.clone(),
        };
        let metadata = json!({
            "provider": provider_name,
            "model": self.resolve_model(speed),
            "input_tokens": outcome.value.usage.input_tokens,
            "output_tokens": outcome.value.usage.output_tokens,
            "total_tokens": outcome.value.usage.total_tokens,
            "generation_time_seconds": (generation_time * 100.0).round() / 100.0,
            "retry_count": outcome.attempts,
        });

        let citations: Vec<NewCitation> = parsed
            .sources
            .iter()
            .map(|source| NewCitation {
                title: source.title.clone(),
                url: source.url.clone(),
                domain: source.domain.clone(),
            })
            .collect();

        let completed = CompletedPost {
            title,
            generated_content: parsed.markdown,
            content_structure: serde_json::to_value(&parsed.structure)
                .unwrap_or_else(|_| json!({})),
            sources: serde_json::to_value(&parsed.sources).unwrap_or_else(|_| json!([])),
            metadata,
        };

        let post = post::complete_post(self.db.pool(), record.id, &completed, &citations).await?;
        engagement::recompute_sentiment(self.db.pool(), post.id).await?;

        info!(
            post_id = post.id,
            words = parsed.structure.word_count,
            sources = parsed.sources.len(),
            "generation completed"
        );

        Ok(post)
    }

    fn build_request(
        &self,
        persona: &Persona,
        prompts: &prompts::PromptPair,
        speed: Speed,
    ) -> CompletionRequest {
        let max_tokens = if speed.is_fast() {
            (persona.max_tokens as u32).min(self.settings.fast_max_tokens)
        } else {
            persona.max_tokens as u32
        };
        let timeout = if speed.is_fast() {
            self.settings.generation_timeout.min(self.settings.fast_timeout)
        } else {
            self.settings.generation_timeout
        };

        CompletionRequest {
            system_prompt: prompts.system_prompt.clone(),
            user_prompt: prompts.user_prompt.clone(),
            model: self.resolve_model(speed).to_string(),
            temperature: persona.temperature as f32,
            max_tokens,
            top_p: Some(persona.top_p as f32),
            timeout,
        }
    }

    fn resolve_model(&self, speed: Speed) -> &str {
        if speed.is_fast() {
            self.provider.fast_model()
        } else {
            self.provider.default_model()
        }
    }
}

/// Check topic and persona fields before any record is created.
///
/// Callers that queue work (rather than generating inline) run this first so
/// malformed requests are rejected without leaving a job row behind.
pub fn validate_input(topic: &str, persona_slug: &str) -> Result<()> {
    if topic.trim().chars().count() < MIN_TOPIC_CHARS {
        return Err(GenerationError::InvalidInput(
            "topic must be at least 5 characters long".to_string(),
        ));
    }
    if persona_slug.trim().is_empty() {
        return Err(GenerationError::InvalidInput(
            "persona slug is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        assert!(validate_input("Future of renewable energy", "technical").is_ok());
        assert!(matches!(
            validate_input("hi", "technical"),
            Err(GenerationError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_input("    ab   ", "technical"),
            Err(GenerationError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_input("a valid topic", "   "),
            Err(GenerationError::InvalidInput(_))
        ));
    }
}
