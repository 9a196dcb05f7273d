//! User interface module - reporting progress and outcomes.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Summaries built from workflow results

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success,
    format_push_streams,
};

use crate::cli::orchestration::WorkflowResult;
use crate::publisher::PublishOutcome;

/// Print the final line(s) for a finished run.
pub fn display_workflow_result(result: &WorkflowResult) {
    match &result.outcome {
        PublishOutcome::NoChanges => {
            display_status("No changes!");
        }
        PublishOutcome::DryRun { would_change } => {
            display_status(&format!(
                "Dry run: {} replacement(s) with '{}', file {}",
                result.replacements,
                result.substituted,
                if *would_change {
                    "would change"
                } else {
                    "unchanged"
                }
            ));
        }
        PublishOutcome::Pushed { commit, branch } => {
            let short = commit.get(..7).unwrap_or(commit);
            display_success(&format!(
                "Changes have been committed ({}) and pushed to {}.",
                short, branch
            ));
        }
    }
}
