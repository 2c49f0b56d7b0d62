//! Support library for the `bcp` binary: logging, exit codes and input
//! loading.

pub mod error;
pub mod exit_codes;
pub mod input;
pub mod logging;

pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
