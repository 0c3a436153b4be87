//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types (positions, rotations, poses)
//! - Logging utilities

pub mod math;
pub mod logging;
