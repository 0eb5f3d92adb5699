//! azdo-core
//!
//! Resource model shared by the reconciliation driver and its providers:
//! declared resources, observed state, attribute schemas, and the
//! `Provider` trait that turns declarations into remote calls.

pub mod provider;
pub mod resource;
pub mod schema;
