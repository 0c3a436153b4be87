//! Single-prototype pool
//!
//! A [`Pool`] tracks every instance it ever created for one prototype, split
//! into two disjoint sets: *available* (resting, ready to hand out) and
//! *in use* (handed out). Handles only move between the sets through
//! [`Pool::acquire`] and [`Pool::release`]; new ones enter through
//! preallocation or growth and leave through [`Pool::clear_and_destroy`].
//!
//! ```text
//!   preallocate ──► Available ──acquire──► InUse
//!                      ▲  │                  │
//!                      │  └──clear──► gone    │
//!                      └─────release─────────┘
//!   grow ────────────────────────────────► InUse
//! ```
//!
//! Resting instances are parented under the pool's private container and are
//! either deactivated or parked at the relocation target, depending on the
//! [`DespawnStrategy`].

use super::{ContainerId, InstanceFactory, InstanceHandle, PoolError, PoolResult, PoolStats, Prototype};
use crate::core::config::{DespawnStrategy, PoolConfig};
use crate::foundation::math::Pose;
use std::collections::{HashSet, VecDeque};

/// Instances of one prototype, split into available and in-use
#[derive(Debug)]
pub struct Pool {
    prototype: Prototype,
    config: PoolConfig,
    container: ContainerId,
    /// Front is handed out next, released handles go to the back
    available: VecDeque<InstanceHandle>,
    in_use: HashSet<InstanceHandle>,
    diagnostics: bool,
}

impl Pool {
    /// Create an empty pool and its private container
    ///
    /// No instances are built until [`preallocate`](Self::preallocate) or
    /// [`acquire`](Self::acquire) is called.
    pub fn new<F: InstanceFactory + ?Sized>(
        prototype: Prototype,
        config: PoolConfig,
        factory: &mut F,
    ) -> PoolResult<Self> {
        config.validate()?;
        let container = factory.create_container(&format!("{}_Root", prototype.name()))?;

        log::info!(
            "Created pool for {} with capacity {} (growth {}, {} on despawn)",
            prototype,
            config.capacity,
            if config.allow_growth { "on" } else { "off" },
            config.despawn_strategy
        );

        Ok(Self {
            diagnostics: config.debug_messages,
            prototype,
            config,
            container,
            available: VecDeque::new(),
            in_use: HashSet::new(),
        })
    }

    /// Build instances until the pool tracks `capacity` of them
    ///
    /// Returns how many were created; zero when already at capacity. On a
    /// factory failure the instances built so far stay available.
    pub fn preallocate<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> PoolResult<usize> {
        let mut created = 0;

        while self.total_count() < self.config.capacity {
            let handle = factory.create(&self.prototype, self.container)?;
            self.available.push_back(handle);
            self.rest(factory, handle);
            created += 1;
        }

        if created > 0 && self.diagnostics {
            log::debug!("Preallocated {} instances of {}", created, self.prototype);
        }
        Ok(created)
    }

    /// Hand out an instance
    ///
    /// Takes the front of the available queue, or grows by one instance when
    /// the queue is empty and growth is allowed. `Ok(None)` means the pool is
    /// exhausted; only host failures are errors.
    pub fn acquire<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> PoolResult<Option<InstanceHandle>> {
        let handle = match self.available.pop_front() {
            Some(handle) => handle,
            None if self.config.allow_growth => self.grow(factory)?,
            None => {
                if self.diagnostics {
                    log::debug!("No {} left ({} in use)", self.prototype, self.in_use.len());
                }
                return Ok(None);
            }
        };

        self.in_use.insert(handle);
        factory.set_parent(handle, None);
        factory.set_active(handle, true);
        Ok(Some(handle))
    }

    /// Take a handed-out instance back
    ///
    /// Handles that are resting already, or that this pool never handed out,
    /// are left alone and reported as [`PoolError::NotOwned`].
    pub fn release<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F, handle: InstanceHandle) -> PoolResult<()> {
        if !self.in_use.remove(&handle) {
            log::warn!("Ignoring release of {:?}: not in use by pool {}", handle, self.prototype);
            return Err(PoolError::NotOwned {
                pool: self.prototype.name().to_string(),
                instance: handle,
            });
        }

        self.available.push_back(handle);
        self.rest(factory, handle);
        factory.set_parent(handle, Some(self.container));
        Ok(())
    }

    /// Destroy every resting instance
    ///
    /// In-use instances are not touched: they stay alive and stay tracked as
    /// in use. Returns how many instances were destroyed. If the host fails
    /// to destroy one, it and the rest remain available.
    pub fn clear_and_destroy<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> PoolResult<usize> {
        let mut destroyed = 0;

        while let Some(handle) = self.available.pop_front() {
            if let Err(err) = factory.destroy(handle) {
                self.available.push_front(handle);
                return Err(err.into());
            }
            destroyed += 1;
        }

        if destroyed > 0 {
            log::info!("Destroyed {} resting instances of {}", destroyed, self.prototype);
        }
        Ok(destroyed)
    }

    /// Raise the resting capacity to at least `capacity`
    ///
    /// Capacity never decreases; call [`preallocate`](Self::preallocate)
    /// afterwards to build the new instances.
    pub fn reserve(&mut self, capacity: usize) {
        self.config.capacity = self.config.capacity.max(capacity);
    }

    /// Enable or disable diagnostics for this pool
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    fn grow<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> PoolResult<InstanceHandle> {
        let handle = factory.create(&self.prototype, self.container)?;
        self.config.capacity += 1;

        if self.diagnostics {
            log::debug!("Grew pool {} to capacity {}", self.prototype, self.config.capacity);
        }
        Ok(handle)
    }

    fn rest<F: InstanceFactory + ?Sized>(&self, factory: &mut F, handle: InstanceHandle) {
        match self.config.despawn_strategy {
            DespawnStrategy::Deactivate => factory.set_active(handle, false),
            DespawnStrategy::Relocate => {
                factory.set_pose(handle, &Pose::from_position(self.config.relocation_target));
            }
        }
    }

    /// Whether preallocation, growth and exhaustion are logged
    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    /// Prototype this pool produces
    pub fn prototype(&self) -> &Prototype {
        &self.prototype
    }

    /// Logical name of the prototype
    pub fn name(&self) -> &str {
        self.prototype.name()
    }

    /// Current configuration, including grown capacity
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Private container resting instances are attached to
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Current resting capacity
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Instances ready to hand out
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Instances currently handed out
    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    /// Every instance the pool tracks
    pub fn total_count(&self) -> usize {
        self.available.len() + self.in_use.len()
    }

    /// Whether no instance is available
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Whether `handle` is currently handed out by this pool
    pub fn is_in_use(&self, handle: InstanceHandle) -> bool {
        self.in_use.contains(&handle)
    }

    /// Whether `handle` is resting in this pool
    pub fn is_available(&self, handle: InstanceHandle) -> bool {
        self.available.contains(&handle)
    }

    /// Whether this pool tracks `handle` at all
    pub fn contains(&self, handle: InstanceHandle) -> bool {
        self.is_in_use(handle) || self.is_available(handle)
    }

    /// Resting handles in hand-out order
    pub fn available(&self) -> impl Iterator<Item = InstanceHandle> + '_ {
        self.available.iter().copied()
    }

    /// Handed-out handles, in no particular order
    pub fn in_use(&self) -> impl Iterator<Item = InstanceHandle> + '_ {
        self.in_use.iter().copied()
    }

    /// Snapshot of the pool's counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            name: self.prototype.name().to_string(),
            capacity: self.config.capacity,
            available: self.available.len(),
            in_use: self.in_use.len(),
            allow_growth: self.config.allow_growth,
            despawn_strategy: self.config.despawn_strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pooling::HeadlessHost;

    fn chunk_pool(host: &mut HeadlessHost, config: PoolConfig) -> Pool {
        Pool::new(Prototype::new(1, "Chunk"), config, host).unwrap()
    }

    #[test]
    fn test_new_pool_is_empty() {
        let mut host = HeadlessHost::new();
        let pool = chunk_pool(&mut host, PoolConfig::new(3));

        assert_eq!(pool.total_count(), 0);
        assert!(pool.is_empty());
        assert_eq!(host.container_name(pool.container()), Some("Chunk_Root"));
        assert_eq!(host.created_count(), 0);
    }

    #[test]
    fn test_preallocate_is_idempotent() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(3));

        assert_eq!(pool.preallocate(&mut host).unwrap(), 3);
        assert_eq!(pool.preallocate(&mut host).unwrap(), 0);
        assert_eq!(pool.available_count(), 3);
        assert_eq!(host.created_count(), 3);

        for handle in pool.available() {
            let state = host.instance(handle).unwrap();
            assert!(!state.active);
            assert_eq!(state.parent, Some(pool.container()));
        }
    }

    #[test]
    fn test_preallocate_counts_in_use_instances() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(2));
        pool.preallocate(&mut host).unwrap();

        let _held = pool.acquire(&mut host).unwrap().unwrap();
        assert_eq!(pool.preallocate(&mut host).unwrap(), 0);
        assert_eq!(pool.total_count(), 2);
    }

    #[test]
    fn test_acquire_activates_and_detaches() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(1));
        pool.preallocate(&mut host).unwrap();

        let handle = pool.acquire(&mut host).unwrap().unwrap();
        let state = host.instance(handle).unwrap();
        assert!(state.active);
        assert_eq!(state.parent, None);
        assert!(pool.is_in_use(handle));
        assert!(!pool.is_available(handle));
    }

    #[test]
    fn test_release_of_foreign_handle_is_not_owned() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(1));
        pool.preallocate(&mut host).unwrap();
        let resting = pool.available().next().unwrap();

        let err = pool.release(&mut host, resting).unwrap_err();
        assert!(matches!(err, PoolError::NotOwned { .. }));
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.in_use_count(), 0);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(1));
        pool.preallocate(&mut host).unwrap();

        let handle = pool.acquire(&mut host).unwrap().unwrap();
        pool.release(&mut host, handle).unwrap();
        assert!(pool.release(&mut host, handle).is_err());
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_growth_increments_capacity() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::on_demand());

        let handle = pool.acquire(&mut host).unwrap().unwrap();
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.available_count(), 0);
        assert!(pool.is_in_use(handle));
        assert!(host.instance(handle).unwrap().active);
    }

    #[test]
    fn test_failed_growth_leaves_pool_unchanged() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::on_demand());
        host.limit_creations(0);

        let err = pool.acquire(&mut host).unwrap_err();
        assert!(matches!(err, PoolError::Factory(_)));
        assert_eq!(pool.capacity(), 0);
        assert_eq!(pool.total_count(), 0);
    }

    #[test]
    fn test_partial_preallocation_keeps_created_instances() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(4));
        host.limit_creations(2);

        assert!(pool.preallocate(&mut host).is_err());
        assert_eq!(pool.available_count(), 2);

        host.unlimited_creations();
        assert_eq!(pool.preallocate(&mut host).unwrap(), 2);
        assert_eq!(pool.available_count(), 4);
    }

    #[test]
    fn test_failed_destruction_keeps_instances_tracked() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(2));
        pool.preallocate(&mut host).unwrap();
        host.set_fail_destruction(true);

        assert!(pool.clear_and_destroy(&mut host).is_err());
        assert_eq!(pool.available_count(), 2);

        host.set_fail_destruction(false);
        assert_eq!(pool.clear_and_destroy(&mut host).unwrap(), 2);
        assert_eq!(host.live_instances(), 0);
    }

    #[test]
    fn test_reserve_never_shrinks() {
        let mut host = HeadlessHost::new();
        let mut pool = chunk_pool(&mut host, PoolConfig::new(4));
        pool.reserve(2);
        assert_eq!(pool.capacity(), 4);
        pool.reserve(6);
        assert_eq!(pool.capacity(), 6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut host = HeadlessHost::new();
        let config = PoolConfig::new(1).with_relocation_target(crate::foundation::math::Vec3::new(f32::INFINITY, 0.0, 0.0));
        let err = Pool::new(Prototype::new(1, "Chunk"), config, &mut host).unwrap_err();
        assert!(matches!(err, PoolError::Config(_)));
    }
}
