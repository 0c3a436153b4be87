//! Instance pooling
//!
//! Recycles pre-built instances of frequently spawned prototypes (projectiles,
//! terrain chunks, particles) instead of creating and destroying them every
//! time. Each prototype gets one [`Pool`]; the [`PoolRegistry`] owns all of
//! them and routes spawn/despawn requests. Engine-side work is delegated to an
//! [`InstanceFactory`] provided by the host.

pub mod prototype;
pub mod handle;
pub mod factory;
pub mod error;
pub mod stats;
pub mod pool;
pub mod registry;
pub mod extensions;
pub mod host;

#[cfg(test)]
mod tests;

pub use prototype::{Prototype, PrototypeId};
pub use handle::{ContainerId, InstanceHandle, PoolId};
pub use factory::{FactoryError, InstanceFactory, LifecycleEvent};
pub use error::{PoolError, PoolResult};
pub use stats::{PoolStats, RegistryStats};
pub use pool::Pool;
pub use registry::PoolRegistry;
pub use extensions::{InstanceDespawnExt, PrototypeSpawnExt};
pub use host::{HeadlessHost, HostContainer, HostInstance};
