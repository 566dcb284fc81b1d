//! Cortex Control Plane Library
//!
//! This crate provides the search-job pipeline: status resolution for the
//! processing view, model-driven processing with structured extraction,
//! best-effort notifications, and the HTTP surface over them.

pub mod config;
pub mod http;
pub mod metrics;
pub mod notify;
pub mod processor;
pub mod resolver;
pub mod state;
pub mod store;

pub use config::Config;
pub use notify::NotificationDispatcher;
pub use processor::{
    ProcessError, ProcessOutcome, Resonance, SearchProcessor, SearchReport, TopicSource,
    TrendingTopic,
};
pub use resolver::JobStatusResolver;
pub use state::AppState;
pub use store::{JobStore, MemoryJobStore, MemoryNotificationStore, NotificationStore, StoreError};
