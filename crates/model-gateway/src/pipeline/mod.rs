//! Ordered per-request pipeline stages.
//!
//! Every inbound request passes through correlation assignment, then the
//! auth gate, then the matched handler. The ordering is fixed by the layer
//! stack in [`crate::server::app`].

pub mod auth;
pub mod context;
pub mod correlation;
