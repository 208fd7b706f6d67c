//! Core model shared by the ebuilder crates.
//!
//! This crate holds the data types both sides of the resolver agree on:
//! Maven coordinates, parsed build-script records, Maven version ordering,
//! and the two static lookup tables (license names and testing frameworks).

pub mod coordinate;
pub mod error;
pub mod license;
pub mod record;
pub mod testing;
pub mod version;

pub use coordinate::{Coordinate, strip_snapshot};
pub use error::{CoreError, Result};
pub use license::{LicenseMappingEntry, LicenseNormalizer, LicenseTable};
pub use record::{BuildScriptRecord, DEFAULT_SLOT};
pub use testing::{TestingFrameworkClassifier, TestingFrameworkSpec};
pub use version::compare_versions;
