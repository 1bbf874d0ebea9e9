//! Run orchestration: reconciliation, the run pipeline, and event
//! rendering.

pub mod pipeline;
/// Diffing of the edited listing and application of its changes.
pub mod reconcile;
pub mod sink;
