pub use crate::app::App;
pub use plangate_core::prelude::*;

// vim: ts=4
