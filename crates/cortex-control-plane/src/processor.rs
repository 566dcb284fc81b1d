//! Search job processing.
//!
//! Runs the model for a processing job, recovers the structured report from
//! its raw output, records the outcome and notifies the job's creator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use cortex_core::{extract, CoreError, JobId, JobStatus, NewNotification, SearchJob};
use cortex_model_client::{Completion, CompletionRequest, ModelClient, ModelError};

use crate::notify::NotificationDispatcher;
use crate::store::{JobStore, StoreError};

/// Errors from processing a search job.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Job does not exist.
    #[error("Search not found: {0}")]
    NotFound(JobId),

    /// Job is not in the processing state.
    #[error("Search is not in processing state (status: {0})")]
    NotProcessing(JobStatus),

    /// Model call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Model output could not be turned into a report, or the job rejected
    /// the transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Successful processing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The job was processed by this call.
    Completed,
    /// The job had already completed; nothing was done.
    AlreadyCompleted,
}

/// Structured report the model is asked to produce.
///
/// `summary`, `overall_sentiment` and `trending_topics` are required. Any
/// other field the model returns is kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub summary: String,
    /// Sentiment across all sources, from -1.0 to 1.0.
    pub overall_sentiment: f64,
    pub trending_topics: Vec<TrendingTopic>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A sub-topic the conversation is gathering around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingTopic {
    pub name: String,
    pub sentiment: f64,
    pub resonance: Resonance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<TopicSource>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// How strongly a topic resonates with its audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resonance {
    Low,
    Medium,
    High,
    Viral,
}

/// A web page, discussion or video backing a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<String>,
}

/// Build the research prompt for a query.
pub fn build_prompt(query: &str) -> String {
    format!(
        "You are a social media research analyst. Research what people are \
         currently saying about the topic below.\n\n\
         Topic: {query}\n\n\
         Respond with a single JSON object and nothing else. It must contain a \
         \"summary\" string (2-3 sentences), an \"overall_sentiment\" number \
         (-1 to 1) and a \"trending_topics\" array where each entry has \
         \"name\", \"sentiment\" (-1 to 1), \"resonance\" (low, medium, high \
         or viral) and optionally \"sources\", a list of objects with \"url\", \
         \"title\", \"type\" and \"relevance\"."
    )
}

/// Drives a processing job to completion or failure.
pub struct SearchProcessor {
    jobs: Arc<dyn JobStore>,
    dispatcher: NotificationDispatcher,
    model: Arc<dyn ModelClient>,
    max_tokens: u32,
}

impl SearchProcessor {
    /// Create a new processor.
    pub fn new(
        jobs: Arc<dyn JobStore>,
        dispatcher: NotificationDispatcher,
        model: Arc<dyn ModelClient>,
        max_tokens: u32,
    ) -> Self {
        Self {
            jobs,
            dispatcher,
            model,
            max_tokens,
        }
    }

    /// Process the job with the given id.
    ///
    /// On model or extraction failure the job is marked failed and the error
    /// is returned. The completion notification is best effort and never
    /// affects the outcome.
    pub async fn process(&self, id: &JobId) -> Result<ProcessOutcome, ProcessError> {
        let mut job = self
            .jobs
            .get_job(id)
            .await?
            .ok_or_else(|| ProcessError::NotFound(id.clone()))?;

        match job.status {
            JobStatus::Completed => return Ok(ProcessOutcome::AlreadyCompleted),
            JobStatus::Pending | JobStatus::Failed => {
                return Err(ProcessError::NotProcessing(job.status))
            }
            JobStatus::Processing => {}
        }

        info!(job_id = %id, "Processing search");

        match self.run(&job).await {
            Ok((completion, report)) => {
                let result = serde_json::to_value(&report)
                    .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
                job.complete(completion.text, result, Some(report.summary))?;
                job.tokens_used = Some(completion.usage.total_tokens());
                job.estimated_cost = Some(completion.usage.estimated_cost());

                // Another call may have finished the job while the model ran.
                match self.jobs.update_job(job.clone()).await {
                    Ok(()) => {}
                    Err(StoreError::TerminalJob { status, .. }) => {
                        info!(job_id = %id, status = %status, "Search finished elsewhere");
                        return match status {
                            JobStatus::Completed => Ok(ProcessOutcome::AlreadyCompleted),
                            JobStatus::Pending | JobStatus::Processing | JobStatus::Failed => {
                                Err(ProcessError::NotProcessing(status))
                            }
                        };
                    }
                    Err(e) => return Err(e.into()),
                }

                info!(
                    job_id = %id,
                    tokens = completion.usage.total_tokens(),
                    "Search completed"
                );

                self.dispatcher
                    .send(NewNotification::search_completed(
                        job.created_by.clone(),
                        &job.id,
                        &job.query,
                    ))
                    .await;

                Ok(ProcessOutcome::Completed)
            }
            Err(e) => {
                error!(job_id = %id, error = %e, "Search processing failed");
                self.mark_failed(job, &e).await;
                Err(e)
            }
        }
    }

    async fn run(&self, job: &SearchJob) -> Result<(Completion, SearchReport), ProcessError> {
        let request = CompletionRequest::prompt(build_prompt(&job.query), self.max_tokens);
        let completion = self.model.complete(request).await?;

        let report: SearchReport = match extract(&completion.text) {
            Ok(report) => report,
            Err(e) => {
                if let CoreError::MalformedOutput { candidate, .. } = &e {
                    warn!(job_id = %job.id, candidate = %candidate, "Malformed model output");
                }
                return Err(e.into());
            }
        };

        Ok((completion, report))
    }

    async fn mark_failed(&self, mut job: SearchJob, cause: &ProcessError) {
        let id = job.id.clone();
        if let Err(e) = job.fail(format!("Search failed: {cause}")) {
            warn!(job_id = %id, error = %e, "Could not mark search failed");
            return;
        }
        match self.jobs.update_job(job).await {
            Ok(()) => {}
            Err(StoreError::TerminalJob { status, .. }) => {
                warn!(job_id = %id, status = %status, "Search already finished, failure not recorded");
            }
            Err(e) => {
                error!(job_id = %id, error = %e, "Failed to record search failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cortex_core::{UserId, SEARCH_COMPLETED};
    use cortex_model_client::Usage;

    use crate::store::{MemoryJobStore, MemoryNotificationStore, NotificationStore};

    /// Model that replays a canned response.
    struct ScriptedModel {
        response: Mutex<Option<Result<String, ModelError>>>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Self {
            Self {
                response: Mutex::new(Some(Ok(text.to_string()))),
            }
        }

        fn failing(err: ModelError) -> Self {
            Self {
                response: Mutex::new(Some(Err(err))),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn complete(&self, _: CompletionRequest) -> Result<Completion, ModelError> {
            let next = self
                .response
                .lock()
                .unwrap()
                .take()
                .expect("model called more than once");
            next.map(|text| Completion {
                text,
                usage: Usage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                },
            })
        }
    }

    /// Model that holds every caller until `parties` calls are in flight.
    struct GatedModel {
        gate: tokio::sync::Barrier,
        text: &'static str,
    }

    #[async_trait]
    impl ModelClient for GatedModel {
        async fn complete(&self, _: CompletionRequest) -> Result<Completion, ModelError> {
            self.gate.wait().await;
            Ok(Completion {
                text: self.text.to_string(),
                usage: Usage::default(),
            })
        }
    }

    const REPORT: &str =
        r#"{"summary": "Steady interest.", "overall_sentiment": 0.1, "trending_topics": []}"#;

    struct Fixture {
        jobs: Arc<MemoryJobStore>,
        notifications: Arc<MemoryNotificationStore>,
        processor: SearchProcessor,
    }

    async fn fixture(model: impl ModelClient + 'static, status: JobStatus) -> Fixture {
        let jobs = Arc::new(MemoryJobStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let job = SearchJob::new("cold brew", UserId::new("creator"))
            .with_id(JobId::new("j1"))
            .with_status(status);
        jobs.insert_job(job).await.unwrap();

        let processor = SearchProcessor::new(
            jobs.clone(),
            NotificationDispatcher::new(notifications.clone()),
            Arc::new(model),
            1000,
        );
        Fixture {
            jobs,
            notifications,
            processor,
        }
    }

    #[tokio::test]
    async fn test_process_completes_and_notifies() {
        let raw = "Sure! Here you go:\n```json\n{\"summary\": \"People love it.\", \
                   \"overall_sentiment\": 0.6, \"trending_topics\": [{\"name\": \"Iced\", \
                   \"sentiment\": 0.8, \"resonance\": \"viral\", \"video_ideas\": []}]}\n```";
        let f = fixture(ScriptedModel::replying(raw), JobStatus::Processing).await;

        let outcome = f.processor.process(&JobId::new("j1")).await.unwrap();
        assert_eq!(outcome, ProcessOutcome::Completed);

        let job = f.jobs.get_job(&JobId::new("j1")).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.summary.as_deref(), Some("People love it."));
        assert_eq!(job.raw_output.as_deref(), Some(raw));
        assert_eq!(job.tokens_used, Some(150));
        let report: SearchReport = serde_json::from_value(job.result.clone().unwrap()).unwrap();
        assert_eq!(report.overall_sentiment, 0.6);
        assert_eq!(report.trending_topics[0].resonance, Resonance::Viral);
        assert_eq!(report.trending_topics[0].sources, None);
        assert!(report.trending_topics[0].extra.contains_key("video_ideas"));

        let feed = f
            .notifications
            .list(&UserId::new("creator"), 10, false)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].content.kind, SEARCH_COMPLETED);
        assert_eq!(feed[0].content.link_path.as_deref(), Some("/admin/search/j1"));
    }

    #[tokio::test]
    async fn test_malformed_output_fails_job() {
        let f = fixture(
            ScriptedModel::replying("I could not find anything, sorry."),
            JobStatus::Processing,
        )
        .await;

        let err = f.processor.process(&JobId::new("j1")).await.unwrap_err();
        assert!(matches!(err, ProcessError::Core(ref e) if e.is_malformed_output()));

        let job = f.jobs.get_job(&JobId::new("j1")).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.summary.unwrap().starts_with("Search failed: "));
        assert_eq!(f.notifications.total_unread().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wrongly_typed_topics_fail_job() {
        let raw = r#"{"summary": "ok", "overall_sentiment": 0.2, "trending_topics": "none"}"#;
        let f = fixture(ScriptedModel::replying(raw), JobStatus::Processing).await;

        let err = f.processor.process(&JobId::new("j1")).await.unwrap_err();
        match err {
            ProcessError::Core(CoreError::MalformedOutput { candidate, .. }) => {
                assert_eq!(candidate, raw);
            }
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }

        let job = f.jobs.get_job(&JobId::new("j1")).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_missing_sentiment_fails_job() {
        let raw = r#"{"summary": "ok", "trending_topics": []}"#;
        let f = fixture(ScriptedModel::replying(raw), JobStatus::Processing).await;

        let err = f.processor.process(&JobId::new("j1")).await.unwrap_err();
        assert!(matches!(err, ProcessError::Core(ref e) if e.is_malformed_output()));
    }

    #[tokio::test]
    async fn test_overlapping_process_completes_once() {
        let model = GatedModel {
            gate: tokio::sync::Barrier::new(2),
            text: REPORT,
        };
        let f = fixture(model, JobStatus::Processing).await;
        let id = JobId::new("j1");

        let (a, b) = tokio::join!(f.processor.process(&id), f.processor.process(&id));
        let mut outcomes = vec![a.unwrap(), b.unwrap()];
        outcomes.sort_by_key(|o| *o == ProcessOutcome::AlreadyCompleted);
        assert_eq!(
            outcomes,
            vec![ProcessOutcome::Completed, ProcessOutcome::AlreadyCompleted]
        );

        let job = f.jobs.get_job(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(f.notifications.total_unread().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_model_error_fails_job() {
        let f = fixture(
            ScriptedModel::failing(ModelError::EmptyResponse),
            JobStatus::Processing,
        )
        .await;

        let err = f.processor.process(&JobId::new("j1")).await.unwrap_err();
        assert!(matches!(err, ProcessError::Model(ModelError::EmptyResponse)));

        let job = f.jobs.get_job(&JobId::new("j1")).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_completed_job_is_not_reprocessed() {
        let f = fixture(
            ScriptedModel::failing(ModelError::EmptyResponse),
            JobStatus::Completed,
        )
        .await;

        let outcome = f.processor.process(&JobId::new("j1")).await.unwrap();
        assert_eq!(outcome, ProcessOutcome::AlreadyCompleted);
    }

    #[tokio::test]
    async fn test_failed_job_is_not_processing() {
        let f = fixture(ScriptedModel::replying("{}"), JobStatus::Failed).await;

        let err = f.processor.process(&JobId::new("j1")).await.unwrap_err();
        assert!(matches!(err, ProcessError::NotProcessing(JobStatus::Failed)));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let f = fixture(ScriptedModel::replying("{}"), JobStatus::Processing).await;

        let err = f.processor.process(&JobId::new("nope")).await.unwrap_err();
        assert!(matches!(err, ProcessError::NotFound(_)));
    }
}
