//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use tracing::warn;

use cortex_core::JobStatus;

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_job_metrics(state, &mut output).await;
    collect_notification_metrics(state, &mut output).await;

    output
}

/// Collect job metrics by status.
async fn collect_job_metrics(state: &Arc<AppState>, output: &mut String) {
    let counts = match state.jobs.count_by_status().await {
        Ok(counts) => counts,
        Err(e) => {
            warn!(error = %e, "Failed to collect job metrics");
            return;
        }
    };

    writeln!(
        output,
        "# HELP cortex_search_jobs_total Total number of search jobs by status"
    )
    .ok();
    writeln!(output, "# TYPE cortex_search_jobs_total gauge").ok();
    for status in JobStatus::ALL {
        let count = counts.get(&status).copied().unwrap_or(0);
        writeln!(
            output,
            "cortex_search_jobs_total{{status=\"{status}\"}} {count}"
        )
        .ok();
    }
}

/// Collect unread notification count.
async fn collect_notification_metrics(state: &Arc<AppState>, output: &mut String) {
    let unread = match state.notifications.total_unread().await {
        Ok(unread) => unread,
        Err(e) => {
            warn!(error = %e, "Failed to collect notification metrics");
            return;
        }
    };

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP cortex_notifications_unread Number of unread notifications"
    )
    .ok();
    writeln!(output, "# TYPE cortex_notifications_unread gauge").ok();
    writeln!(output, "cortex_notifications_unread {unread}").ok();
}
