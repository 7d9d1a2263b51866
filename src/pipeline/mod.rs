//! The pipeline core: configuration state machine, run orchestration,
//! prediction client, and the workflow projection.

/// Five-stage workflow graph projection.
pub mod flow;
/// Ad-hoc prediction client.
pub mod predict;
/// Run orchestration and failure classification.
pub mod runner;
/// Durable session snapshot (field whitelist).
pub mod snapshot;
/// Session state and its mutation operations.
pub mod store;
/// Value and wire types.
pub mod types;
