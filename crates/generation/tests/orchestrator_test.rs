//! End-to-end orchestrator tests against an in-memory database and mock
//! providers.

use std::sync::Arc;
use std::time::Duration;

use database::{job, persona, post, Database, JobStatus, PostStatus};
use generation::{CircuitBreaker, GenerationError, GenerationSettings, Orchestrator, Speed};
use mock_provider::{FailingProvider, ScriptedProvider, StaticProvider};
use provider_core::{Provider, ProviderError};
use serde_json::{json, Value};

async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    persona::ensure_default_personas(db.pool()).await.unwrap();
    db
}

fn settings() -> GenerationSettings {
    GenerationSettings::default().with_retry_base_delay(Duration::from_millis(1))
}

fn orchestrator(db: Database, provider: Arc<dyn Provider>) -> Orchestrator {
    let config = settings();
    let breaker = Arc::new(CircuitBreaker::new(
        config.circuit_failure_threshold,
        config.circuit_cool_off,
    ));
    Orchestrator::new(db, provider, breaker, config)
}

#[tokio::test]
async fn test_fast_generation_completes() {
    let db = test_db().await;
    let provider = Arc::new(StaticProvider::new("# Title\nShort body"));
    let orchestrator = orchestrator(db.clone(), provider.clone());

    let result = orchestrator
        .generate("Future of renewable energy", "technical", &json!({}), Speed::Fast)
        .await
        .unwrap();

    assert_eq!(result.status, PostStatus::Completed);
    assert_eq!(result.title, "Title");
    assert!(result.generated_content.contains("Short body"));
    assert_eq!(result.sentiment_score, 0);
    assert!(result.published_at.is_some());
    assert_eq!(provider.call_count(), 1);

    let metadata: Value = serde_json::from_str(&result.metadata).unwrap();
    assert_eq!(metadata["retry_count"], 0);
    assert_eq!(metadata["model"], "mock-fast");
}

#[tokio::test]
async fn test_sources_extracted_and_persisted() {
    let db = test_db().await;
    let text = "# Post\n\nBody text here.\n\n## Sources\n- [Example](https://www.example.com/a)\n";
    let orchestrator = orchestrator(db.clone(), Arc::new(StaticProvider::new(text)));

    let result = orchestrator
        .generate("A topic with sources", "analyst", &json!({}), Speed::Normal)
        .await
        .unwrap();

    assert!(!result.generated_content.contains("## Sources"));
    let sources: Value = serde_json::from_str(&result.sources).unwrap();
    assert_eq!(sources[0]["domain"], "example.com");

    let citations = post::list_citations(db.pool(), result.id).await.unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].url, "https://www.example.com/a");
}

#[tokio::test]
async fn test_invalid_topic_creates_no_record() {
    let db = test_db().await;
    let orchestrator = orchestrator(db.clone(), Arc::new(StaticProvider::new("x")));

    let err = orchestrator
        .generate("hi", "technical", &json!({}), Speed::Fast)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidInput(_)));

    let posts = post::list_posts(db.pool(), None, None, 50).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_unknown_persona_creates_no_record() {
    let db = test_db().await;
    let orchestrator = orchestrator(db.clone(), Arc::new(StaticProvider::new("x")));

    let err = orchestrator
        .generate("a perfectly fine topic", "ghost", &json!({}), Speed::Fast)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::PersonaNotFound(slug) if slug == "ghost"));

    let posts = post::list_posts(db.pool(), None, None, 50).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_auth_error_fails_post_without_retry() {
    let db = test_db().await;
    let provider = Arc::new(FailingProvider::new(ProviderError::Auth("bad key".into())));
    let orchestrator = orchestrator(db.clone(), provider.clone());

    let err = orchestrator
        .generate("a doomed generation", "technical", &json!({}), Speed::Normal)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Provider(ProviderError::Auth(_))
    ));
    assert_eq!(provider.call_count(), 1);

    let posts = post::list_posts(db.pool(), Some(PostStatus::Failed), None, 50)
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    let metadata: Value = serde_json::from_str(&posts[0].metadata).unwrap();
    assert!(metadata["error"].as_str().unwrap().contains("bad key"));
}

#[tokio::test]
async fn test_normal_speed_retries_transient_failures() {
    let db = test_db().await;
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(ProviderError::Server {
            status: 503,
            message: "overloaded".into(),
        }),
        Ok("# Recovered\nBody".into()),
    ]));
    let orchestrator = orchestrator(db.clone(), provider.clone());

    let result = orchestrator
        .generate("a flaky generation", "technical", &json!({}), Speed::Normal)
        .await
        .unwrap();

    assert_eq!(result.status, PostStatus::Completed);
    assert_eq!(provider.call_count(), 2);

    let metadata: Value = serde_json::from_str(&result.metadata).unwrap();
    assert_eq!(metadata["retry_count"], 1);
}

#[tokio::test]
async fn test_fast_speed_never_retries() {
    let db = test_db().await;
    let provider = Arc::new(FailingProvider::new(ProviderError::Server {
        status: 500,
        message: "down".into(),
    }));
    let orchestrator = orchestrator(db.clone(), provider.clone());

    let err = orchestrator
        .generate("a fast failing topic", "technical", &json!({}), Speed::Fast)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Api { .. }));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_circuit_opens_after_repeated_exhaustion() {
    let db = test_db().await;
    let provider = Arc::new(FailingProvider::new(ProviderError::Server {
        status: 500,
        message: "down".into(),
    }));
    let orchestrator = orchestrator(db.clone(), provider.clone());

    for _ in 0..3 {
        let err = orchestrator
            .generate("a repeatedly failing topic", "technical", &json!({}), Speed::Fast)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Api { .. }));
    }

    let err = orchestrator
        .generate("one request too many", "technical", &json!({}), Speed::Fast)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::ProviderUnavailable { .. }));

    // The rejected request still created and failed its record.
    let failed = post::list_posts(db.pool(), Some(PostStatus::Failed), None, 50)
        .await
        .unwrap();
    assert_eq!(failed.len(), 4);
}

#[tokio::test]
async fn test_worker_runs_job_to_completion() {
    let db = test_db().await;
    let orchestrator = orchestrator(db.clone(), Arc::new(StaticProvider::new("# Done\nBody")));

    let queued = job::create_job(
        db.pool(),
        job::NewJob {
            topic: "a queued topic",
            persona_slug: "educator",
            session_id: "sess-1",
            speed: "fast",
            additional_context: &json!({}),
        },
    )
    .await
    .unwrap();

    let finished = generation::worker::run_generation_job(&orchestrator, queued.id, "task-1")
        .await
        .unwrap();

    assert_eq!(finished.status, JobStatus::Completed);
    assert_eq!(finished.progress, 100);
    let post = post::get_post(db.pool(), finished.post_id.unwrap())
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Completed);
}

#[tokio::test]
async fn test_worker_records_job_failure() {
    let db = test_db().await;
    let orchestrator = orchestrator(
        db.clone(),
        Arc::new(FailingProvider::new(ProviderError::Billing(
            "credit balance is too low".into(),
        ))),
    );

    let queued = job::create_job(
        db.pool(),
        job::NewJob {
            topic: "a billing-doomed topic",
            persona_slug: "technical",
            session_id: "",
            speed: "normal",
            additional_context: &json!({}),
        },
    )
    .await
    .unwrap();

    let err = generation::worker::run_generation_job(&orchestrator, queued.id, "task-2")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BILLING_ERROR");

    let reloaded = job::get_job(db.pool(), queued.id).await.unwrap();
    assert_eq!(reloaded.status, JobStatus::Failed);
    assert_eq!(reloaded.progress, 100);
    assert!(reloaded.error_message.contains("credit balance"));
    assert_eq!(reloaded.post_id, None);
}
