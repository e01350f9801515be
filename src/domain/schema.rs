// ============================================================
// Layer 3 — Feature Schema
// ============================================================
// The ordered feature names the pipeline is fitted on, and the
// schema id stamped into every saved artifact. Reordering or
// renaming a feature changes the id, and the predictor refuses
// to load an artifact whose id differs from its own.

use sha2::{Digest, Sha256};

/// All model inputs, in record order.
pub const FEATURE_NAMES: [&str; 6] = [
    "age",
    "sex",
    "has_physical_condition",
    "screen_time_hours",
    "exercise_frequency",
    "smokes_or_drinks",
];

/// Median-imputed, robust-scaled inputs.
pub const NUMERIC_FEATURES: [&str; 2] = ["age", "screen_time_hours"];

/// Mode-imputed, one-hot encoded inputs.
pub const CATEGORICAL_FEATURES: [&str; 4] = [
    "sex",
    "has_physical_condition",
    "exercise_frequency",
    "smokes_or_drinks",
];

/// Regression target.
pub const TARGET: &str = "sleep_time";

const SCHEMA_ID_PREFIX: &str = "sha256:";

/// Schema id of an ordered feature-name list.
pub fn schema_id_of<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names.iter().map(|n| n.as_ref()).collect::<Vec<_>>().join("\n");
    let digest = Sha256::digest(joined.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{SCHEMA_ID_PREFIX}{hex}")
}

/// Schema id of this build's feature set.
pub fn schema_id() -> String {
    schema_id_of(&FEATURE_NAMES)
}
