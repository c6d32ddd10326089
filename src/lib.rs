//! Compliance engine and HTTP surface for short-term international remote
//! work (SIRW) requests.
//!
//! The decision core lives in [`workflows::sirw`]: a fixed, ordered rule set
//! evaluated against a normalized context, plus the calendar and overlap
//! calculators the host composes around it. Everything here is deterministic;
//! persistence and notification belong to the caller.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
