//! Errors raised while reading effective POM documents.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Malformed descriptor: {message}")]
    DocumentMalformed { message: String },

    #[error("Unsupported descriptor root element '{root}': expected 'project' or 'projects'")]
    UnsupportedRoot { root: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MavenError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::DocumentMalformed {
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for MavenError {
    fn from(err: quick_xml::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MavenError>;
