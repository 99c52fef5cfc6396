pub use plangate_types::prelude::*;

pub use crate::evaluator::{Decision, DenyReason};

// vim: ts=4
