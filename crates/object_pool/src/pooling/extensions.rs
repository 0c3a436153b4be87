//! Call-site shorthands
//!
//! Lets gameplay code write `bullet.spawn_at(&mut pools, pose)` and
//! `handle.despawn_into(&mut pools)`. Everything here forwards to
//! [`PoolRegistry`].

use super::{InstanceFactory, InstanceHandle, PoolRegistry, PoolResult, Prototype};
use crate::foundation::math::Pose;

/// Spawning straight from a prototype
pub trait PrototypeSpawnExt {
    /// Spawn at the origin with no rotation
    fn spawn<F: InstanceFactory>(&self, registry: &mut PoolRegistry<F>) -> PoolResult<InstanceHandle>;

    /// Spawn at `pose`
    fn spawn_at<F: InstanceFactory>(&self, registry: &mut PoolRegistry<F>, pose: Pose) -> PoolResult<InstanceHandle>;
}

impl PrototypeSpawnExt for Prototype {
    fn spawn<F: InstanceFactory>(&self, registry: &mut PoolRegistry<F>) -> PoolResult<InstanceHandle> {
        registry.spawn_by_prototype(self, Pose::identity())
    }

    fn spawn_at<F: InstanceFactory>(&self, registry: &mut PoolRegistry<F>, pose: Pose) -> PoolResult<InstanceHandle> {
        registry.spawn_by_prototype(self, pose)
    }
}

/// Returning an instance through its handle
pub trait InstanceDespawnExt {
    /// Give the instance back to the pool that handed it out
    fn despawn_into<F: InstanceFactory>(self, registry: &mut PoolRegistry<F>) -> PoolResult<()>;
}

impl InstanceDespawnExt for InstanceHandle {
    fn despawn_into<F: InstanceFactory>(self, registry: &mut PoolRegistry<F>) -> PoolResult<()> {
        registry.despawn(self)
    }
}

impl<F: InstanceFactory> PoolRegistry<F> {
    /// Spawn from a named pool at the origin
    pub fn spawn_named(&mut self, name: &str) -> PoolResult<Option<InstanceHandle>> {
        self.spawn_by_name(name, Pose::identity())
    }
}
