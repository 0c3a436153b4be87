//! # Core Module
//!
//! Shared configuration types used by the pooling system and by applications
//! that provision pools from files.
//!
//! ## Organization
//!
//! - **Config**: Pool and registry configuration
//! - **Foundation**: Low-level utilities (math, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    DespawnStrategy,
    PoolConfig,
    PoolDescriptor,
    RegistryConfig,
};
