//! Utility functions
//!
//! Provides logging setup and command argument validation.

pub mod logging;
pub mod validation;
