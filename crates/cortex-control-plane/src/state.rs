//! Shared application state.

use std::sync::Arc;

use cortex_model_client::ModelClient;

use crate::config::Config;
use crate::notify::NotificationDispatcher;
use crate::processor::SearchProcessor;
use crate::resolver::JobStatusResolver;
use crate::store::{JobStore, MemoryJobStore, MemoryNotificationStore, NotificationStore};

/// Shared application state.
pub struct AppState {
    /// Search jobs.
    pub jobs: Arc<dyn JobStore>,

    /// Notifications, accessed with privileged scope.
    pub notifications: Arc<dyn NotificationStore>,

    /// Model backend used to process searches.
    ///
    /// `None` when no provider is configured; processing requests then fail.
    pub model: Option<Arc<dyn ModelClient>>,

    /// Runtime configuration.
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with in-memory stores, wrapped in Arc.
    pub fn new(config: Config, model: Option<Arc<dyn ModelClient>>) -> Arc<Self> {
        Self::with_stores(
            config,
            Arc::new(MemoryJobStore::new()),
            Arc::new(MemoryNotificationStore::new()),
            model,
        )
    }

    /// Create a new AppState over the given stores.
    pub fn with_stores(
        config: Config,
        jobs: Arc<dyn JobStore>,
        notifications: Arc<dyn NotificationStore>,
        model: Option<Arc<dyn ModelClient>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            jobs,
            notifications,
            model,
            config,
        })
    }

    /// Resolver over this state's job store.
    pub fn resolver(&self) -> JobStatusResolver {
        JobStatusResolver::new(self.jobs.clone())
    }

    /// Dispatcher over this state's notification store.
    pub fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.notifications.clone())
    }

    /// Processor for search jobs, if a model backend is configured.
    pub fn processor(&self) -> Option<SearchProcessor> {
        self.model.as_ref().map(|model| {
            SearchProcessor::new(
                self.jobs.clone(),
                self.dispatcher(),
                model.clone(),
                self.config.max_tokens,
            )
        })
    }
}
