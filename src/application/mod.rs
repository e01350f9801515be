// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no printing.
//
//   train_use_case    — survey → search → refit → artifact
//   predict_use_case  — record → hours + conclusion
//   evaluate_use_case — re-measure the stored model
//   session           — page navigation for the interactive app

// The training workflow
pub mod train_use_case;

// Single-record prediction with the saved model
pub mod predict_use_case;

pub mod evaluate_use_case;

pub mod session;
