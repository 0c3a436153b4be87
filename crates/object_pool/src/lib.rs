//! # Object Pool
//!
//! Prototype-keyed instance pooling for frame-driven game engines.
//!
//! ## Features
//!
//! - **Per-prototype pools**: pre-built instances handed out and taken back in O(1)
//! - **Growth on demand**: pools can create instances past their resting capacity
//! - **Two resting strategies**: deactivate in place, or park active instances out of view
//! - **Host agnostic**: all engine-side work goes through the [`InstanceFactory`](pooling::InstanceFactory) trait
//! - **File-driven setup**: registries can be provisioned from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use object_pool::prelude::*;
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut pools = PoolRegistry::new(HeadlessHost::new());
//!     let bullet = Prototype::new(1, "Bullet");
//!     pools.register_pool(bullet.clone(), PoolConfig::new(32).with_growth(true))?;
//!
//!     let shot = bullet.spawn_at(&mut pools, Pose::from_position(Vec3::new(0.0, 1.5, 0.0)))?;
//!     // ... fly, hit something ...
//!     shot.despawn_into(&mut pools)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod pooling;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, DespawnStrategy, PoolConfig, RegistryConfig},
        foundation::math::{Pose, Quat, Vec3},
        pooling::{
            FactoryError, HeadlessHost, InstanceDespawnExt, InstanceFactory, InstanceHandle,
            LifecycleEvent, Pool, PoolError, PoolRegistry, PoolResult, PoolStats, Prototype,
            PrototypeSpawnExt, RegistryStats,
        },
    };
}
