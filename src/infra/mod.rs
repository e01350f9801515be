// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by the use cases:
//
//   artifact.rs   — the single model artifact (model.json) and
//                   the saved TrainConfig. Embeds the feature
//                   schema id and refuses mismatched artifacts.
//
//   search_log.rs — one CSV row per scored search candidate,
//                   appended across runs.

/// Model artifact saving and loading
pub mod artifact;

/// Halving-search CSV logger
pub mod search_log;
