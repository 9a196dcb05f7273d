//! Command-line facing workflow, decoupled from clap

pub mod orchestration;

pub use orchestration::{run_update_workflow, UpdateRequest, WorkflowResult};
