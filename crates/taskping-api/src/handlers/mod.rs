//! HTTP handlers for the mock endpoints.

pub mod notify;
pub mod push;
