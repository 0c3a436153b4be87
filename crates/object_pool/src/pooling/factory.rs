//! Host boundary
//!
//! The pooling engine never creates, positions or destroys anything itself.
//! Every engine-side effect goes through an [`InstanceFactory`] supplied by the
//! host (a scene graph, an ECS world, a headless simulation).

use super::{ContainerId, InstanceHandle, Prototype};
use crate::foundation::math::Pose;

/// Notification sent to an instance when it changes hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The instance was handed out and posed
    Spawned,
    /// The instance is about to return to its pool
    Despawned,
}

/// Errors reported by the host
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Host could not build a new instance
    #[error("Failed to create instance of {prototype}: {reason}")]
    CreationFailed {
        /// Logical name of the prototype
        prototype: String,
        /// Host-provided reason
        reason: String,
    },

    /// Host could not tear an instance down
    #[error("Failed to destroy instance: {reason}")]
    DestructionFailed {
        /// Host-provided reason
        reason: String,
    },

    /// Host does not know the instance
    #[error("Unknown instance {0:?}")]
    UnknownInstance(InstanceHandle),

    /// Host does not know the container
    #[error("Unknown container {0:?}")]
    UnknownContainer(ContainerId),
}

/// Creates, mutates and destroys instances on behalf of pools
///
/// Creation and destruction may fail (host resource limits); state changes
/// on a live instance may not. Implementations should ignore state changes
/// on instances they no longer know about.
pub trait InstanceFactory {
    /// Create a parent node for resting instances
    fn create_container(&mut self, name: &str) -> Result<ContainerId, FactoryError>;

    /// Destroy a container created by [`create_container`](Self::create_container)
    fn destroy_container(&mut self, container: ContainerId) -> Result<(), FactoryError>;

    /// Build a new instance at the default pose, parented under `container`
    fn create(&mut self, prototype: &Prototype, container: ContainerId) -> Result<InstanceHandle, FactoryError>;

    /// Destroy an instance
    fn destroy(&mut self, instance: InstanceHandle) -> Result<(), FactoryError>;

    /// Activate or deactivate an instance
    fn set_active(&mut self, instance: InstanceHandle, active: bool);

    /// Move an instance
    fn set_pose(&mut self, instance: InstanceHandle, pose: &Pose);

    /// Attach an instance to a container, or detach it with `None`
    fn set_parent(&mut self, instance: InstanceHandle, parent: Option<ContainerId>);

    /// Deliver a lifecycle notification
    ///
    /// Only instances that care need to react; the default drops the event.
    fn notify(&mut self, _instance: InstanceHandle, _event: LifecycleEvent) {}
}

impl<F: InstanceFactory + ?Sized> InstanceFactory for &mut F {
    fn create_container(&mut self, name: &str) -> Result<ContainerId, FactoryError> {
        (**self).create_container(name)
    }

    fn destroy_container(&mut self, container: ContainerId) -> Result<(), FactoryError> {
        (**self).destroy_container(container)
    }

    fn create(&mut self, prototype: &Prototype, container: ContainerId) -> Result<InstanceHandle, FactoryError> {
        (**self).create(prototype, container)
    }

    fn destroy(&mut self, instance: InstanceHandle) -> Result<(), FactoryError> {
        (**self).destroy(instance)
    }

    fn set_active(&mut self, instance: InstanceHandle, active: bool) {
        (**self).set_active(instance, active);
    }

    fn set_pose(&mut self, instance: InstanceHandle, pose: &Pose) {
        (**self).set_pose(instance, pose);
    }

    fn set_parent(&mut self, instance: InstanceHandle, parent: Option<ContainerId>) {
        (**self).set_parent(instance, parent);
    }

    fn notify(&mut self, instance: InstanceHandle, event: LifecycleEvent) {
        (**self).notify(instance, event);
    }
}
