//! # OpenAlex Works
//!
//! Fetch a scholarly work from the OpenAlex API and render it as a BibTeX or
//! RIS citation, optionally following one hop of related, referenced or
//! citing works.
//!
//! ## Architecture
//!
//! - [`models`]: typed work records and the inverted-index abstract
//! - [`sources`]: the [`WorkSource`] trait, the OpenAlex client and a mock
//! - [`graph`]: one-hop traversal with request pacing
//! - [`utils`]: HTTP client, throttling and citation formatting
//! - [`config`]: configuration management

pub mod config;
pub mod graph;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use graph::{Hop, WorkGraph};
pub use models::{Work, WorkId};
pub use sources::{OpenAlexSource, SourceError, WorkSource};
pub use utils::{format_bibtex, format_ris, EntryType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
