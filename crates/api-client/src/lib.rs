//! # API Client
//!
//! REST transport for LASAMBUS.
//!
//! Handles:
//! - Bearer token injection from the session store
//! - Session teardown and the single redirect to login on `401`
//! - Mapping HTTP failures onto `lasambus_core::BackendError`
//!
//! Implements the ports in `lasambus_core::ports`, so every flow in `lasambus-core` runs
//! against the real backend through [`ApiClient`].

#![warn(rust_2018_idioms)]

mod client;
mod errors;

pub use client::ApiClient;
