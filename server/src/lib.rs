//! plangate grants or denies calls to named service endpoints based on the
//! caller's subscription plan, and meters every granted call against the
//! plan's cumulative limits.
//!
//! # Modules
//!
//! - `plan`, `permission` - catalog management
//! - `subscription` - subscribing users and describing their plan
//! - `access` - access checks, usage recording and limit status
//! - `service` - mock service gateway guarded by the evaluator

#![forbid(unsafe_code)]

pub mod access;
pub mod app;
pub mod permission;
pub mod plan;
pub mod prelude;
pub mod routes;
pub mod service;
pub mod subscription;
pub mod types;

pub use crate::app::{App, AppBuilder, AppState};

// vim: ts=4
