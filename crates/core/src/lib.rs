//! HVAC Dashboard Core - Shared types library.
//!
//! This crate provides common types used across the dashboard components:
//! - `server` - JSON API backing the dashboard, leads, pricing and settings views
//! - `cli` - Command-line tools for migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, lead status and territory sets, risk bands,
//!   search terms, ROI projection, and money formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
