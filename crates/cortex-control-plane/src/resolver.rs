//! Job status resolution for the search processing view.
//!
//! The resolver answers one question with a single read: is the job done?
//! Polling cadence, retries and timeouts belong to the polling view that a
//! [`Decision::Delegate`] hands control to.

use std::sync::Arc;

use tracing::debug;

use cortex_core::{Decision, DelegateContext, JobId, JobStatus};

use crate::store::{JobStore, StoreError};

/// Decides where a viewer of a job's processing page should go.
pub struct JobStatusResolver {
    jobs: Arc<dyn JobStore>,
}

impl JobStatusResolver {
    /// Create a resolver over a job store.
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }

    /// Resolve a job id under the viewer's path `prefix`.
    ///
    /// Performs exactly one status lookup and no writes. A stale read can
    /// only produce an extra delegation, never a premature redirect, because
    /// job status is monotonic.
    pub async fn resolve(&self, id: &JobId, prefix: &str) -> Result<Decision, StoreError> {
        let Some(job) = self.jobs.get_job(id).await? else {
            debug!(job_id = %id, "Job not found");
            return Ok(Decision::NotFound);
        };

        let decision = match job.status {
            JobStatus::Completed => Decision::Redirect(Decision::result_path(prefix, &job.id)),
            JobStatus::Pending | JobStatus::Processing | JobStatus::Failed => {
                Decision::Delegate(DelegateContext {
                    id: job.id,
                    query: job.query,
                    redirect_prefix: prefix.to_string(),
                })
            }
        };

        debug!(job_id = %id, status = %job.status, decision = decision.kind(), "Resolved job");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use cortex_core::{SearchJob, UserId};

    use crate::store::MemoryJobStore;

    /// Job store wrapper that counts reads and writes.
    #[derive(Default)]
    struct CountingJobStore {
        inner: MemoryJobStore,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl JobStore for CountingJobStore {
        async fn get_job(&self, id: &JobId) -> Result<Option<SearchJob>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_job(id).await
        }

        async fn insert_job(&self, job: SearchJob) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_job(job).await
        }

        async fn update_job(&self, job: SearchJob) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update_job(job).await
        }

        async fn count_by_status(&self) -> Result<HashMap<JobStatus, u64>, StoreError> {
            self.inner.count_by_status().await
        }
    }

    async fn store_with(jobs: &[(&str, &str, JobStatus)]) -> Arc<CountingJobStore> {
        let store = Arc::new(CountingJobStore::default());
        for (id, query, status) in jobs {
            let job = SearchJob::new(*query, UserId::new("u1"))
                .with_id(JobId::new(*id))
                .with_status(*status);
            store.inner.insert_job(job).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let store = store_with(&[]).await;
        let resolver = JobStatusResolver::new(store.clone());

        let decision = resolver.resolve(&JobId::new("missing"), "/admin").await.unwrap();
        assert_eq!(decision, Decision::NotFound);
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_processing_job_delegates() {
        let store = store_with(&[("j1", "vegan snacks", JobStatus::Processing)]).await;
        let resolver = JobStatusResolver::new(store.clone());

        let decision = resolver.resolve(&JobId::new("j1"), "/admin").await.unwrap();
        assert_eq!(
            decision,
            Decision::Delegate(DelegateContext {
                id: JobId::new("j1"),
                query: "vegan snacks".to_string(),
                redirect_prefix: "/admin".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_completed_job_redirects_with_single_read() {
        let store = store_with(&[("j2", "q", JobStatus::Completed)]).await;
        let resolver = JobStatusResolver::new(store.clone());

        let decision = resolver.resolve(&JobId::new("j2"), "/admin").await.unwrap();
        assert_eq!(decision, Decision::Redirect("/admin/search/j2".to_string()));
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_redirect_follows_prefix() {
        let store = store_with(&[("j2", "q", JobStatus::Completed)]).await;
        let resolver = JobStatusResolver::new(store);

        let decision = resolver.resolve(&JobId::new("j2"), "/portal").await.unwrap();
        assert_eq!(decision, Decision::Redirect("/portal/search/j2".to_string()));
    }

    #[tokio::test]
    async fn test_non_completed_statuses_delegate() {
        let store = store_with(&[
            ("p", "q", JobStatus::Pending),
            ("r", "q", JobStatus::Processing),
            ("f", "q", JobStatus::Failed),
        ])
        .await;
        let resolver = JobStatusResolver::new(store.clone());

        for id in ["p", "r", "f"] {
            let decision = resolver.resolve(&JobId::new(id), "/admin").await.unwrap();
            assert!(
                matches!(decision, Decision::Delegate(ref ctx) if ctx.id.as_str() == id),
                "expected delegate for {id}, got {decision:?}"
            );
        }
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let store = store_with(&[
            ("done", "q", JobStatus::Completed),
            ("busy", "q", JobStatus::Processing),
        ])
        .await;
        let resolver = JobStatusResolver::new(store);

        for id in ["done", "busy", "missing"] {
            let id = JobId::new(id);
            let first = resolver.resolve(&id, "/admin").await.unwrap();
            let second = resolver.resolve(&id, "/admin").await.unwrap();
            assert_eq!(first, second);
        }
    }
}
