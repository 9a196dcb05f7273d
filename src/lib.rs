pub mod auth;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod patcher;
pub mod publisher;
pub mod release;
pub mod ui;

pub use error::{BumpError, Result};
