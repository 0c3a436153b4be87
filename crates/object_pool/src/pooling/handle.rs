//! Opaque keys handed across the host boundary

use slotmap::new_key_type;

new_key_type! {
    /// Reference to one concrete instance produced from a prototype
    ///
    /// Minted by the [`InstanceFactory`](super::InstanceFactory); the pool
    /// only tracks which set the handle currently sits in.
    pub struct InstanceHandle;

    /// Host-side parent node that resting instances are attached to
    pub struct ContainerId;

    /// Registry-local identifier of a pool
    pub struct PoolId;
}
