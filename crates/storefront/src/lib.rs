//! LUXE storefront library.
//!
//! Catalog, per-client cart and wishlist stores, and the web layer that
//! renders them. The binary in `main.rs` only wires configuration,
//! telemetry, and the listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
