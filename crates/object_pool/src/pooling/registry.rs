//! Pool Registry
//!
//! Routes spawn and despawn requests to the pool that owns a prototype or an
//! instance. One registry is created per session and handed to whatever
//! needs pooling; there is no global instance.
//!
//! # Architecture
//!
//! ```text
//! spawn_by_name / spawn_by_prototype          despawn(handle)
//!            │                                      │
//!     name / prototype index                  owner index
//!            └──────────────► Pool ◄────────────────┘
//!                              │
//!                       InstanceFactory (host)
//! ```
//!
//! Every lookup is a hash lookup, so spawn and despawn stay O(1) amortized no
//! matter how many pools are registered.
//!
//! # Usage
//!
//! ```rust
//! use object_pool::prelude::*;
//!
//! let mut registry = PoolRegistry::new(HeadlessHost::new());
//! let chunk = Prototype::new(1, "Chunk");
//! registry.register_pool(chunk.clone(), PoolConfig::new(8))?;
//!
//! let handle = registry
//!     .spawn_by_name("Chunk", Pose::from_position(Vec3::new(20.0, 0.0, 40.0)))?
//!     .expect("pool has resting chunks");
//! registry.despawn(handle)?;
//! # Ok::<(), PoolError>(())
//! ```

use super::{
    InstanceFactory, InstanceHandle, LifecycleEvent, Pool, PoolError, PoolId, PoolResult, PoolStats,
    Prototype, PrototypeId, RegistryStats,
};
use crate::core::config::{PoolConfig, RegistryConfig};
use crate::foundation::math::Pose;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Owner of every pool in a session
pub struct PoolRegistry<F: InstanceFactory> {
    factory: F,
    pools: SlotMap<PoolId, Pool>,
    by_prototype: HashMap<PrototypeId, PoolId>,
    by_name: HashMap<String, PoolId>,
    /// In-use handles and the pool that handed them out
    owners: HashMap<InstanceHandle, PoolId>,
    debug_messages: bool,
    lifecycle_hooks: bool,
    stats: RegistryStats,
}

impl<F: InstanceFactory> PoolRegistry<F> {
    /// Create an empty registry around a host
    pub fn new(factory: F) -> Self {
        let defaults = RegistryConfig::default();
        Self {
            factory,
            pools: SlotMap::with_key(),
            by_prototype: HashMap::new(),
            by_name: HashMap::new(),
            owners: HashMap::new(),
            debug_messages: defaults.debug_messages,
            lifecycle_hooks: defaults.lifecycle_hooks,
            stats: RegistryStats::default(),
        }
    }

    /// Create a registry and provision every configured pool
    ///
    /// Each pool is registered and preallocated in configuration order.
    pub fn from_config(config: RegistryConfig, factory: F) -> PoolResult<Self> {
        config.validate()?;

        let mut registry = Self::new(factory);
        registry.debug_messages = config.debug_messages;
        registry.lifecycle_hooks = config.lifecycle_hooks;

        for descriptor in config.pools {
            registry.register_pool(descriptor.prototype, descriptor.config)?;
        }

        log::info!("Pool registry ready with {} pools", registry.pools.len());
        Ok(registry)
    }

    /// Enable or disable diagnostics for the registry and every pool
    pub fn set_debug_messages(&mut self, enabled: bool) {
        self.debug_messages = enabled;
        for pool in self.pools.values_mut() {
            let pool_enabled = enabled && pool.config().debug_messages;
            pool.set_diagnostics(pool_enabled);
        }
    }

    /// Enable or disable spawn/despawn notifications
    pub fn set_lifecycle_hooks(&mut self, enabled: bool) {
        self.lifecycle_hooks = enabled;
    }

    /// Register a pool and fill it to its capacity
    ///
    /// Fails if the prototype already has a pool or its logical name is
    /// taken by another prototype.
    pub fn register_pool(&mut self, prototype: Prototype, config: PoolConfig) -> PoolResult<PoolId> {
        if self.by_prototype.contains_key(&prototype.id()) {
            return Err(PoolError::DuplicatePool {
                prototype: prototype.to_string(),
            });
        }
        if self.by_name.contains_key(prototype.name()) {
            return Err(PoolError::DuplicateName {
                name: prototype.name().to_string(),
            });
        }

        let id = self.insert_pool(prototype, config)?;
        self.pools[id].preallocate(&mut self.factory)?;
        Ok(id)
    }

    /// Spawn from the pool registered under `name`
    ///
    /// Never creates a pool. An unknown name or an exhausted pool yields
    /// `Ok(None)`; only host failures are errors.
    pub fn spawn_by_name(&mut self, name: &str, pose: Pose) -> PoolResult<Option<InstanceHandle>> {
        match self.try_spawn_by_name(name, pose) {
            Ok(handle) => Ok(Some(handle)),
            Err(err) if err.is_recoverable() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Spawn from the pool registered under `name`, reporting why nothing
    /// was spawned
    pub fn try_spawn_by_name(&mut self, name: &str, pose: Pose) -> PoolResult<InstanceHandle> {
        let Some(&id) = self.by_name.get(name) else {
            log::warn!("Spawn requested from unknown pool '{}'", name);
            self.stats.failed_spawns += 1;
            return Err(PoolError::NoSuchPool { name: name.to_string() });
        };

        self.spawn_from(id, pose)
    }

    /// Spawn an instance of `prototype`, creating its pool on first use
    ///
    /// Pools created here start empty with growth enabled, so the call only
    /// fails when the host cannot build an instance, or when an explicitly
    /// registered pool without growth is exhausted.
    pub fn spawn_by_prototype(&mut self, prototype: &Prototype, pose: Pose) -> PoolResult<InstanceHandle> {
        let id = self.ensure_pool(prototype)?;
        self.spawn_from(id, pose)
    }

    /// Return an instance to the pool that handed it out
    ///
    /// The despawn notification is delivered before the owning pool is looked
    /// up, so a managed instance receives it while still in use. Handles that
    /// no pool has handed out still get the notification, are reported as
    /// [`PoolError::UnmanagedInstance`] and leave every pool unchanged.
    pub fn despawn(&mut self, handle: InstanceHandle) -> PoolResult<()> {
        if self.lifecycle_hooks {
            self.factory.notify(handle, LifecycleEvent::Despawned);
        }

        let Some(&id) = self.owners.get(&handle) else {
            log::error!("Despawn of {:?}, which no pool has handed out", handle);
            return Err(PoolError::UnmanagedInstance { instance: handle });
        };

        self.pools[id].release(&mut self.factory, handle)?;
        self.owners.remove(&handle);
        self.stats.total_despawned += 1;
        Ok(())
    }

    /// Make sure the pool for `prototype` keeps at least `count` instances
    ///
    /// Creates the pool on first use like [`spawn_by_prototype`](Self::spawn_by_prototype),
    /// raises its capacity to `count` and builds the missing instances.
    /// Returns how many were created.
    pub fn preallocate(&mut self, prototype: &Prototype, count: usize) -> PoolResult<usize> {
        let id = self.ensure_pool(prototype)?;
        let pool = &mut self.pools[id];
        pool.reserve(count);
        pool.preallocate(&mut self.factory)
    }

    /// Fill every pool to its capacity
    ///
    /// Meant for session startup; returns the total number of instances
    /// created.
    pub fn preallocate_all(&mut self) -> PoolResult<usize> {
        let mut created = 0;
        for pool in self.pools.values_mut() {
            created += pool.preallocate(&mut self.factory)?;
        }
        Ok(created)
    }

    /// Destroy the resting instances of one pool, keeping it registered
    ///
    /// Returns `Ok(None)` when the prototype has no pool.
    pub fn clear_pool(&mut self, prototype: &Prototype) -> PoolResult<Option<usize>> {
        let Some(&id) = self.by_prototype.get(&prototype.id()) else {
            return Ok(None);
        };
        self.pools[id].clear_and_destroy(&mut self.factory).map(Some)
    }

    /// Destroy the resting instances of one pool and unregister it
    ///
    /// Instances still in use are orphaned: they stay alive in the host but
    /// can no longer be despawned through this registry. Returns `Ok(None)`
    /// when the prototype has no pool.
    pub fn remove_pool(&mut self, prototype: &Prototype) -> PoolResult<Option<usize>> {
        let Some(&id) = self.by_prototype.get(&prototype.id()) else {
            return Ok(None);
        };
        self.remove_pool_by_id(id).map(Some)
    }

    /// Tear down every pool
    ///
    /// Pools that fail to tear down stay registered and the first failure is
    /// returned; the others are still removed.
    pub fn shutdown(&mut self) -> PoolResult<()> {
        let ids: Vec<PoolId> = self.pools.keys().collect();
        let mut first_error = None;

        for id in ids {
            if let Err(err) = self.remove_pool_by_id(id) {
                log::error!("Failed to tear down pool: {}", err);
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                log::info!("Pool registry shut down");
                Ok(())
            }
        }
    }

    fn ensure_pool(&mut self, prototype: &Prototype) -> PoolResult<PoolId> {
        if let Some(&id) = self.by_prototype.get(&prototype.id()) {
            return Ok(id);
        }

        if self.debug_messages {
            log::debug!("Creating on-demand pool for unseen prototype {}", prototype);
        }
        self.insert_pool(prototype.clone(), PoolConfig::on_demand())
    }

    fn insert_pool(&mut self, prototype: Prototype, config: PoolConfig) -> PoolResult<PoolId> {
        let mut pool = Pool::new(prototype, config, &mut self.factory)?;
        pool.set_diagnostics(self.debug_messages && pool.config().debug_messages);

        let prototype_id = pool.prototype().id();
        let name = pool.name().to_string();
        let id = self.pools.insert(pool);

        self.by_prototype.insert(prototype_id, id);
        if self.by_name.contains_key(&name) {
            log::warn!("Pool name '{}' already taken; prototype {} is only reachable by identity", name, prototype_id);
        } else {
            self.by_name.insert(name, id);
        }
        Ok(id)
    }

    fn spawn_from(&mut self, id: PoolId, pose: Pose) -> PoolResult<InstanceHandle> {
        let pool = &mut self.pools[id];

        let Some(handle) = pool.acquire(&mut self.factory)? else {
            if self.debug_messages {
                log::warn!("Pool '{}' has no instances left", pool.name());
            }
            self.stats.failed_spawns += 1;
            return Err(PoolError::PoolExhausted {
                pool: pool.name().to_string(),
                in_use: pool.in_use_count(),
            });
        };

        self.factory.set_pose(handle, &pose);
        if self.lifecycle_hooks {
            self.factory.notify(handle, LifecycleEvent::Spawned);
        }

        self.owners.insert(handle, id);
        self.stats.total_spawned += 1;
        self.stats.peak_in_use = self.stats.peak_in_use.max(self.owners.len());
        Ok(handle)
    }

    fn remove_pool_by_id(&mut self, id: PoolId) -> PoolResult<usize> {
        let destroyed = self.pools[id].clear_and_destroy(&mut self.factory)?;
        self.factory.destroy_container(self.pools[id].container())?;

        let Some(pool) = self.pools.remove(id) else {
            return Ok(destroyed);
        };

        self.by_prototype.remove(&pool.prototype().id());
        if self.by_name.get(pool.name()) == Some(&id) {
            self.by_name.remove(pool.name());
            // Hand the name to a lazily created pool that lost it on insertion
            let heir = self.pools.iter().find(|(_, other)| other.name() == pool.name()).map(|(key, _)| key);
            if let Some(heir) = heir {
                log::info!("Pool name '{}' now refers to {}", pool.name(), self.pools[heir].prototype());
                self.by_name.insert(pool.name().to_string(), heir);
            }
        }

        let orphaned = pool.in_use_count();
        self.owners.retain(|_, owner| *owner != id);
        if orphaned > 0 {
            log::warn!("Removed pool {} with {} instances still in use", pool.prototype(), orphaned);
        } else {
            log::info!("Removed pool {}", pool.prototype());
        }
        Ok(destroyed)
    }

    /// Pool for a prototype
    pub fn pool(&self, prototype: &Prototype) -> Option<&Pool> {
        self.by_prototype.get(&prototype.id()).map(|&id| &self.pools[id])
    }

    /// Pool registered under a logical name
    pub fn pool_by_name(&self, name: &str) -> Option<&Pool> {
        self.by_name.get(name).map(|&id| &self.pools[id])
    }

    /// Pool that handed out `handle`, if it is still in use
    pub fn owner_of(&self, handle: InstanceHandle) -> Option<&Pool> {
        self.owners.get(&handle).map(|&id| &self.pools[id])
    }

    /// Whether the prototype has a pool
    pub fn contains_prototype(&self, prototype: &Prototype) -> bool {
        self.by_prototype.contains_key(&prototype.id())
    }

    /// Every pooled prototype
    pub fn prototypes(&self) -> Vec<Prototype> {
        self.pools.values().map(|pool| pool.prototype().clone()).collect()
    }

    /// Every pool
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    /// Number of registered pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Whether diagnostics are enabled
    pub fn debug_messages(&self) -> bool {
        self.debug_messages
    }

    /// Whether spawn/despawn notifications are sent
    pub fn lifecycle_hooks(&self) -> bool {
        self.lifecycle_hooks
    }

    /// Registry-wide statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            pool_count: self.pools.len(),
            total_in_use: self.owners.len(),
            total_available: self.pools.values().map(Pool::available_count).sum(),
            ..self.stats.clone()
        }
    }

    /// Per-pool snapshots
    pub fn pool_stats(&self) -> Vec<PoolStats> {
        self.pools.values().map(Pool::stats).collect()
    }

    /// The host
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The host, mutably
    ///
    /// Instances owned by pools must not be destroyed through this.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

impl<F: InstanceFactory> Drop for PoolRegistry<F> {
    fn drop(&mut self) {
        if self.pools.is_empty() {
            return;
        }
        if let Err(err) = self.shutdown() {
            log::error!("Pool registry teardown incomplete: {}", err);
        }
    }
}

impl<F: InstanceFactory> std::fmt::Debug for PoolRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.pool_stats())
            .field("in_use", &self.owners.len())
            .field("debug_messages", &self.debug_messages)
            .field("lifecycle_hooks", &self.lifecycle_hooks)
            .finish_non_exhaustive()
    }
}
