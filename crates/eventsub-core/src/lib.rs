//! # eventsub-core
//!
//! Shared vocabulary for the eventsub crates:
//!
//! - **Errors**: [`ClientError`] and [`TransportError`] via `thiserror`, with
//!   stable machine-readable codes
//! - **Logging**: `tracing` subscriber setup and an in-memory capture layer
//!   for asserting on log output in tests

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;

pub use errors::{ClientError, Result, TransportError};
