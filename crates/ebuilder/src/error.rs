//! Errors surfaced by the resolution pipeline and the command line host.

use ebuilder_core::CoreError;
use ebuilder_maven::MavenError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Maven(#[from] MavenError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Project '{project}' has licenses with no Gentoo equivalent: {}", licenses.join(", "))]
    UnmappedLicense {
        project: String,
        licenses: Vec<String>,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
