//! HTTP request handlers.

pub mod bindings;
pub mod catalog;
pub mod health;
pub mod instances;

pub use bindings::*;
pub use catalog::*;
pub use health::*;
pub use instances::*;

use serde::Serialize;

/// Empty JSON object returned by lifecycle operations without a payload.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}
