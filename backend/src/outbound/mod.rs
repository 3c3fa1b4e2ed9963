//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local store for running without a database.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules beyond those the schema enforces.

pub mod memory;
pub mod persistence;
