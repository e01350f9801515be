// ============================================================
// Layer 5 — One-Hot Encoder
// ============================================================
// One indicator column per category seen at fit time, sorted by
// label. A label that was never seen during training encodes as
// all zeros instead of failing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit(values: &[&str]) -> Self {
        let mut categories: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        categories.sort_unstable();
        categories.dedup();
        Self { categories }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Append this value's indicator columns to `out`.
    pub fn encode_into(&self, value: &str, out: &mut Vec<f32>) {
        out.extend(
            self.categories
                .iter()
                .map(|c| if c == value { 1.0 } else { 0.0 }),
        );
    }
}
