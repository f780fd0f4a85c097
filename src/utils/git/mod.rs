//! Git queries for document metadata.
//!
//! Read-only: the tool never writes to the repository it finds.

mod history;

pub use history::last_commit_date;
