//! Core types for the HVAC dashboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod risk;
pub mod roi;
pub mod search;
pub mod status;
pub mod territory;
pub mod username;

pub use id::*;
pub use money::{CurrencyCode, Price};
pub use risk::RiskBand;
pub use roi::{RoiAssumptions, RoiProjection};
pub use search::SearchTerm;
pub use status::*;
pub use territory::Territory;
pub use username::{Username, UsernameError};
