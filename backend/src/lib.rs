//! Subscriptions aggregator service.
//!
//! Records users' online subscriptions and aggregates their cost over a
//! window of months. Layout follows ports and adapters: `domain` holds the
//! model and use cases, `inbound` the HTTP adapter, `outbound` the stores and
//! `server` the wiring.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
