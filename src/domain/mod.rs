// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits. No burn types, no file I/O.

/// FeatureRecord and its categorical answer types
pub mod record;

/// Free-text screen-time bucket → numeric surrogate
pub mod screen_time;

/// Ordered feature names and the artifact schema id
pub mod schema;

/// Predicted hours → advisory message
pub mod conclusion;

pub mod traits;
