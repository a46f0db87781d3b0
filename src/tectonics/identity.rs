//! Ordered set of plate identity values.
//!
//! Keys are raw `f32` noise values compared with `total_cmp`. This is sound
//! because cellular values are exact hash fractions: every cell owned by a
//! feature point reproduces the same bits.

/// Sorted, deduplicated plate identity values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateIdentitySet {
    values: Vec<f32>,
}

impl PlateIdentitySet {
    /// Collects the distinct values of `values`.
    pub fn from_values(values: &[f32]) -> Self {
        let mut values = values.to_vec();
        values.sort_by(f32::total_cmp);
        values.dedup_by(|a, b| a.total_cmp(b).is_eq());
        Self { values }
    }

    /// Returns the index of `value`, if present.
    pub fn index_of(&self, value: f32) -> Option<usize> {
        self.search(value).ok()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn search(&self, value: f32) -> Result<usize, usize> {
        self.values.binary_search_by(|v| v.total_cmp(&value))
    }
}
