//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod metrics;
pub mod presentation;
pub mod trade;
