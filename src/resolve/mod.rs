//! Reference resolution for source documents.
//!
//! Three text passes run in a fixed order, each over the output of the one
//! before:
//!
//! 1. metadata markers (`@git:lastUpdated`)
//! 2. `@define(type, id, "caption")` -> numbered caption, id recorded
//! 3. `@reference(type, id)` -> ordinal, or `??`
//!
//! Because every definition is recorded before the first reference is looked
//! up, a reference may appear before or after the caption it points to.

mod directive;
mod meta;
mod table;

pub use directive::Unresolved;
pub use meta::{GitHistory, MetadataSource};
pub use table::ReferenceTable;

use crate::log;
use std::path::Path;

/// Output of a resolution run.
#[derive(Debug)]
pub struct Resolved {
    /// Source text with every directive substituted.
    pub text: String,
    /// Final numbering state.
    pub table: ReferenceTable,
    /// References rendered as `??`, in document order.
    pub unresolved: Vec<Unresolved>,
}

/// Resolve metadata markers, captions and references in `source`.
///
/// `path` identifies the source file for metadata lookups. Nothing here
/// fails: unknown references and metadata errors degrade to visible
/// placeholders and are logged.
pub fn resolve(source: &str, path: &Path, metadata: &dyn MetadataSource) -> Resolved {
    let text = meta::substitute(source, path, metadata);

    let mut table = ReferenceTable::new();
    let text = directive::substitute_defines(&text, &mut table);

    let (text, unresolved) = directive::substitute_references(&text, &table);
    for Unresolved { kind, id } in &unresolved {
        log!("resolve"; "unresolved reference {kind}:{id}");
    }

    Resolved {
        text,
        table,
        unresolved,
    }
}
