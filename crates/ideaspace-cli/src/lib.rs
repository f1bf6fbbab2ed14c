#![forbid(unsafe_code)]

//! `ideaspace`: a line-oriented explorer over the idea-expansion service.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod view;

pub use cli::{run, run_from_env};
pub use error::{CliError, Result};
