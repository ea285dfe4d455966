//! Tradewatch Core
//!
//! Core types for the tradewatch news-analysis pipeline tooling.
//!
//! This crate contains:
//! - Domain types: pipeline run snapshots, configuration, log entries, run states
//! - DTOs: payloads exchanged with the pipeline and analytics APIs

pub mod domain;
pub mod dto;
