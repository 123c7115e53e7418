//! Request gateway for a text-classifier prediction service.
//!
//! One front door: every inbound request gets a correlation id, protected
//! routes are checked against the configured API keys, and validated
//! requests are forwarded to the upstream prediction/model-registry
//! service with its outcomes mapped back onto the gateway's response
//! contract.

pub mod config;
pub mod error;
pub mod handlers;
pub mod keys;
pub mod pipeline;
pub mod server;
pub mod upstream;
