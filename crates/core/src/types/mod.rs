//! Core types for Rupshari.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod phone;

pub use id::*;
pub use money::Taka;
pub use phone::{PhoneError, PhoneNumber};
