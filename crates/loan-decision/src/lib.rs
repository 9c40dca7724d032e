//! Confidence-aware loan decisioning.
//!
//! Static business rules are blended with the output of a pre-trained binary
//! classifier through an ordered rule cascade. See [`decision`] for the engine
//! and its collaborators.

pub mod config;
pub mod decision;
pub mod error;
pub mod telemetry;
