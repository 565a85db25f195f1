//! Utility modules supporting work lookups.
//!
//! - [`HttpClient`]: reqwest client with a fixed timeout and a polite-pool user agent
//! - [`Throttle`]: pacing between traversal requests ([`SleepThrottle`], [`RecordingThrottle`])
//! - [`format_bibtex`] / [`format_ris`]: citation formatting
//!
//! # Formatting a work
//!
//! ```rust
//! use openalex_works::models::{Biblio, WorkBuilder};
//! use openalex_works::utils::{format_entry, EntryType};
//!
//! let work = WorkBuilder::new("https://openalex.org/W1")
//!     .title("A Paper")
//!     .author("Ada Lovelace")
//!     .year(1843)
//!     .work_type("journal-article")
//!     .biblio(Biblio::default())
//!     .build();
//!
//! let bibtex = format_entry(&work, EntryType::Bibtex).unwrap();
//! assert!(bibtex.starts_with("@journal-article{Lovelace1843,"));
//! ```

pub mod cite;
mod http;
mod throttle;

pub use cite::{
    bibtex_key, format_bibtex, format_entry, format_ris, BibtexOptions, EntryType, EntryTypeError,
};
pub use http::{user_agent, HttpClient};
pub use throttle::{RecordingThrottle, SleepThrottle, Throttle};
