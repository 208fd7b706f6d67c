//! Ebuild parsing and Portage tree indexing.
//!
//! [`EbuildParser`] turns one ebuild into a [`BuildScriptRecord`];
//! [`TreeIndexer`] walks whole trees and indexes every Maven coordinate an
//! ebuild declares to provide.
//!
//! [`BuildScriptRecord`]: ebuilder_core::BuildScriptRecord

pub mod error;
pub mod index;
pub mod parser;

pub use error::{ParseFailure, ParseFailureKind, Result};
pub use index::{CoordinateIndex, IndexOptions, IndexResult, TreeIndexer};
pub use parser::{DEFAULT_ANT_TASKS, EBUILD_EXTENSION, EbuildParser};
