//! Errors raised by the core model.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid Maven coordinates '{coordinates}': expected 'groupId:artifactId:version'")]
    InvalidCoordinates { coordinates: String },

    #[error("Failed to load license table: {message}")]
    LicenseTable { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
