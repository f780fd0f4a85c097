//! Run-scoped numbering state for captioned items.

use rustc_hash::FxHashMap;

/// Ordered ids per caption type, in definition order.
///
/// Types are keyed lower-case so `Figure` and `figure` share one sequence.
/// The table only ever grows: an ordinal handed out by [`define`] stays
/// valid for the rest of the run.
///
/// [`define`]: ReferenceTable::define
#[derive(Debug, Default, Clone)]
pub struct ReferenceTable {
    kinds: FxHashMap<String, Vec<String>>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the sequence of `kind` and return its 1-based ordinal.
    ///
    /// Duplicate ids are appended again and receive a fresh ordinal.
    pub fn define(&mut self, kind: &str, id: &str) -> usize {
        let ids = self.kinds.entry(kind.to_lowercase()).or_default();
        ids.push(id.to_owned());
        ids.len()
    }

    /// 1-based ordinal of the first definition of `id` under `kind`.
    pub fn ordinal(&self, kind: &str, id: &str) -> Option<usize> {
        self.ids(kind)
            .iter()
            .position(|defined| defined == id)
            .map(|index| index + 1)
    }

    /// Ids defined under `kind`, empty for a type never defined.
    pub fn ids(&self, kind: &str) -> &[String] {
        self.kinds
            .get(&kind.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of definitions across all types.
    pub fn len(&self) -> usize {
        self.kinds.values().map(Vec::len).sum()
    }
}
