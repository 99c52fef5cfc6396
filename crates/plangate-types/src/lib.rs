//! Shared types, the store adapter trait, and error types for plangate.
//!
//! The entitlement core and every store adapter depend on this crate only,
//! so adapters compile independently of the core and the server.

#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
