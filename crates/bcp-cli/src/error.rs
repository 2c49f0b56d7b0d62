//! CLI error type and its exit code mapping.

use crate::exit_codes::ExitCode;
use bcp_plot::PlotError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid arguments: {0}")]
    Args(String),

    /// A snapshot or configuration file could not be loaded.
    #[error("failed to load {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: PlotError,
    },

    #[error(transparent)]
    Plot(#[from] PlotError),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Args(_) => ExitCode::ArgsError,
            CliError::Input { .. } => ExitCode::InputError,
            CliError::Plot(err) => match err {
                PlotError::InvalidConfig(_) | PlotError::UnsupportedFormat(_) => ExitCode::ArgsError,
                PlotError::NonFiniteRange { .. } | PlotError::MissingData(_) | PlotError::Math(_) => {
                    ExitCode::InputError
                }
                PlotError::Io(_) => ExitCode::IoError,
                PlotError::Json(_) | PlotError::Render(_) => ExitCode::InternalError,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(CliError::Args("x".into()).exit_code(), ExitCode::ArgsError);
        let input = CliError::Input {
            path: PathBuf::from("a.json"),
            source: PlotError::MissingData("x".into()),
        };
        assert_eq!(input.exit_code(), ExitCode::InputError);
        assert!(input.to_string().contains("a.json"));
        assert_eq!(
            CliError::from(PlotError::UnsupportedFormat("gif".into())).exit_code(),
            ExitCode::ArgsError
        );
        assert_eq!(
            CliError::from(PlotError::NonFiniteRange {
                lo: f64::NAN,
                hi: 1.0
            })
            .exit_code(),
            ExitCode::InputError
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CliError::from(PlotError::from(io)).exit_code(), ExitCode::IoError);
    }
}
