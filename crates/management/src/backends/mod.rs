//! Management API backend implementations.

pub mod http;
pub mod memory;
