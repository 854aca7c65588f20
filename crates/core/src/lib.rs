//! Minishop Core - Shared types library.
//!
//! This crate provides common types used across all Minishop components:
//! - `api` - JSON HTTP backend (catalog, cart, checkout, orders, auth)
//! - `cli` - Command-line tools for migrations, seeding and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, statuses,
//!   and the session cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
