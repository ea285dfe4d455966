//! Data transfer objects for the pipeline and analytics APIs
//!
//! These mirror the JSON contracts owned by the external service. Analytics
//! payloads are black-box data: the client deserializes them for display only
//! and performs no logic beyond direct field access and formatting.

pub mod evals;
pub mod news;
pub mod pipeline;
pub mod recommendation;
pub mod signals;
