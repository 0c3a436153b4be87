//! Headless host
//!
//! An in-memory [`InstanceFactory`] that keeps the engine-side state of every
//! instance in a slot map. Used by dedicated servers and tools that pool
//! simulation objects without a scene graph, and by the test-suite to observe
//! exactly what the pools asked the host to do.

use super::{ContainerId, FactoryError, InstanceFactory, InstanceHandle, LifecycleEvent, Prototype, PrototypeId};
use crate::foundation::math::Pose;
use slotmap::SlotMap;
use std::collections::HashSet;

/// Engine-side state of one headless instance
#[derive(Debug, Clone)]
pub struct HostInstance {
    /// Prototype the instance was built from
    pub prototype: Prototype,
    /// Whether the instance is active
    pub active: bool,
    /// Current pose
    pub pose: Pose,
    /// Current parent container
    pub parent: Option<ContainerId>,
    /// Notifications received, oldest first
    pub events: Vec<LifecycleEvent>,
}

/// A named parent node
#[derive(Debug, Clone)]
pub struct HostContainer {
    /// Name given at creation
    pub name: String,
}

/// In-memory instance host
#[derive(Debug, Default)]
pub struct HeadlessHost {
    instances: SlotMap<InstanceHandle, HostInstance>,
    containers: SlotMap<ContainerId, HostContainer>,
    listeners: HashSet<PrototypeId>,
    creation_budget: Option<usize>,
    fail_destruction: bool,
    created: usize,
    destroyed: usize,
    dropped_notifications: usize,
}

impl HeadlessHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Let instances of `prototype` receive lifecycle notifications
    ///
    /// Instances of other prototypes have no receiver; their notifications
    /// are counted and dropped.
    pub fn subscribe(&mut self, prototype: &Prototype) {
        self.listeners.insert(prototype.id());
    }

    /// Fail every creation after `remaining` more successful ones
    pub fn limit_creations(&mut self, remaining: usize) {
        self.creation_budget = Some(remaining);
    }

    /// Remove any creation limit
    pub fn unlimited_creations(&mut self) {
        self.creation_budget = None;
    }

    /// Make every destruction fail until reset
    pub fn set_fail_destruction(&mut self, fail: bool) {
        self.fail_destruction = fail;
    }

    /// State of a live instance
    pub fn instance(&self, handle: InstanceHandle) -> Option<&HostInstance> {
        self.instances.get(handle)
    }

    /// Whether the instance still exists
    pub fn is_alive(&self, handle: InstanceHandle) -> bool {
        self.instances.contains_key(handle)
    }

    /// Whether the container still exists
    pub fn has_container(&self, container: ContainerId) -> bool {
        self.containers.contains_key(container)
    }

    /// Name of a live container
    pub fn container_name(&self, container: ContainerId) -> Option<&str> {
        self.containers.get(container).map(|c| c.name.as_str())
    }

    /// Number of live instances
    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }

    /// Number of live instances currently attached to `container`
    pub fn children_of(&self, container: ContainerId) -> usize {
        self.instances
            .values()
            .filter(|instance| instance.parent == Some(container))
            .count()
    }

    /// Instances created since construction
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Instances destroyed since construction
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Notifications sent to instances without a receiver
    pub fn dropped_notifications(&self) -> usize {
        self.dropped_notifications
    }
}

impl InstanceFactory for HeadlessHost {
    fn create_container(&mut self, name: &str) -> Result<ContainerId, FactoryError> {
        Ok(self.containers.insert(HostContainer { name: name.to_string() }))
    }

    fn destroy_container(&mut self, container: ContainerId) -> Result<(), FactoryError> {
        self.containers
            .remove(container)
            .map(|_| ())
            .ok_or(FactoryError::UnknownContainer(container))?;

        for instance in self.instances.values_mut() {
            if instance.parent == Some(container) {
                instance.parent = None;
            }
        }
        Ok(())
    }

    fn create(&mut self, prototype: &Prototype, container: ContainerId) -> Result<InstanceHandle, FactoryError> {
        if !self.containers.contains_key(container) {
            return Err(FactoryError::UnknownContainer(container));
        }

        if let Some(budget) = self.creation_budget.as_mut() {
            if *budget == 0 {
                return Err(FactoryError::CreationFailed {
                    prototype: prototype.name().to_string(),
                    reason: "creation budget exhausted".to_string(),
                });
            }
            *budget -= 1;
        }

        self.created += 1;
        Ok(self.instances.insert(HostInstance {
            prototype: prototype.clone(),
            active: true,
            pose: Pose::identity(),
            parent: Some(container),
            events: Vec::new(),
        }))
    }

    fn destroy(&mut self, instance: InstanceHandle) -> Result<(), FactoryError> {
        if self.fail_destruction {
            return Err(FactoryError::DestructionFailed {
                reason: "host refused destruction".to_string(),
            });
        }

        self.instances
            .remove(instance)
            .ok_or(FactoryError::UnknownInstance(instance))?;
        self.destroyed += 1;
        Ok(())
    }

    fn set_active(&mut self, instance: InstanceHandle, active: bool) {
        if let Some(state) = self.instances.get_mut(instance) {
            state.active = active;
        }
    }

    fn set_pose(&mut self, instance: InstanceHandle, pose: &Pose) {
        if let Some(state) = self.instances.get_mut(instance) {
            state.pose = *pose;
        }
    }

    fn set_parent(&mut self, instance: InstanceHandle, parent: Option<ContainerId>) {
        if let Some(state) = self.instances.get_mut(instance) {
            state.parent = parent;
        }
    }

    fn notify(&mut self, instance: InstanceHandle, event: LifecycleEvent) {
        match self.instances.get_mut(instance) {
            Some(state) if self.listeners.contains(&state.prototype.id()) => state.events.push(event),
            _ => self.dropped_notifications += 1,
        }
    }
}
