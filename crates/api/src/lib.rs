//! HTTP boundary: Basic authentication, path normalization and routing in
//! front of the `gatehouse-auth` gatekeeper.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod normalize;
