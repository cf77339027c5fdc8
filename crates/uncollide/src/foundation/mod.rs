//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and the per-dimension distance formulas
//! - Logging utilities

pub mod math;
pub mod logging;
