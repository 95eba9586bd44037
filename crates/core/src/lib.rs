//! Luxe Collection Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! catalog products, cart lines, prices, quantities, and validated emails.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP.
//! Invariants that can be expressed in the type system live here (a
//! [`Quantity`] is never zero, a [`Price`] is never negative and never finer
//! than a cent) so the store and the routes cannot violate them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
