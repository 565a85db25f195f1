//! Core data models for OpenAlex works.

mod abstract_index;
mod id;
mod work;

pub use abstract_index::AbstractIndex;
pub use id::WorkId;
pub use work::{Author, Authorship, Biblio, Location, Venue, Work, WorkBuilder, WorkList, WorkStub};
