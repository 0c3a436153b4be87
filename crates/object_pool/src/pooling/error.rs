//! Pooling errors

use super::{FactoryError, InstanceHandle};
use crate::config::ConfigError;

/// Result type for pooling operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur while pooling
///
/// `NoSuchPool` and `PoolExhausted` are recoverable and usually surface as an
/// empty spawn result. `NotOwned` and `UnmanagedInstance` point at a caller bug
/// (double despawn, leaked handle) and are always reported.
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    /// Name-based lookup found no pool
    #[error("No pool named '{name}'")]
    NoSuchPool {
        /// Requested logical name
        name: String,
    },

    /// No available instance and growth is disabled
    #[error("Pool '{pool}' is exhausted ({in_use} in use, growth disabled)")]
    PoolExhausted {
        /// Logical name of the pool
        pool: String,
        /// Instances currently handed out
        in_use: usize,
    },

    /// Release of a handle this pool has not handed out
    #[error("Instance {instance:?} is not in use by pool '{pool}'")]
    NotOwned {
        /// Logical name of the pool
        pool: String,
        /// Offending handle
        instance: InstanceHandle,
    },

    /// Despawn of a handle no pool is tracking as in use
    #[error("Instance {instance:?} is not managed by any pool")]
    UnmanagedInstance {
        /// Offending handle
        instance: InstanceHandle,
    },

    /// A pool for this prototype is already registered
    #[error("A pool for prototype {prototype} already exists")]
    DuplicatePool {
        /// Prototype display form
        prototype: String,
    },

    /// Another prototype already uses this logical name
    #[error("Pool name '{name}' is already taken")]
    DuplicateName {
        /// Conflicting logical name
        name: String,
    },

    /// Host failed to create or destroy something
    #[error("Instance factory failure: {0}")]
    Factory(#[from] FactoryError),

    /// Registry configuration could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PoolError {
    /// Whether spawn-by-name degrades this error into an empty result
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoSuchPool { .. } | Self::PoolExhausted { .. })
    }
}
