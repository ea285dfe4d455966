//! Core domain types
//!
//! This module contains the domain structures shared between the client and the
//! CLI. The pipeline run itself lives server-side; everything here is either a
//! read-only snapshot of it or client-local bookkeeping around that snapshot.

pub mod log;
pub mod pipeline;
pub mod run;
