//! # Pool Configuration
//!
//! Configuration types for individual pools and for a whole registry. All of
//! them are serde-serializable so a registry can be provisioned from a TOML or
//! RON file through the [`Config`] trait, or built in code with the builder
//! methods.
//!
//! ```toml
//! debug_messages = true
//! lifecycle_hooks = true
//!
//! [[pools]]
//! prototype = { id = 1, name = "Chunk" }
//! config = { capacity = 16, allow_growth = true }
//! ```

use serde::{Serialize, Deserialize};
use std::collections::HashSet;

pub use crate::config::{Config, ConfigError};

use crate::foundation::math::Vec3;
use crate::pooling::Prototype;

/// Resting position used by [`DespawnStrategy::Relocate`] when none is given
pub const DEFAULT_RELOCATION_TARGET: [f32; 3] = [-100.0, -100.0, -100.0];

/// How a released instance rests until it is handed out again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DespawnStrategy {
    /// Deactivate the instance in place
    #[default]
    Deactivate,
    /// Keep the instance active but move it to the pool's relocation target,
    /// so animations and physics keep running out of view
    Relocate,
}

impl std::fmt::Display for DespawnStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deactivate => write!(f, "deactivate"),
            Self::Relocate => write!(f, "relocate"),
        }
    }
}

/// # Pool Configuration
///
/// Per-pool policy. `capacity` is the resting size the pool preallocates to;
/// it is a soft floor that grows with on-demand creation and never shrinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of instances to keep pre-built
    pub capacity: usize,
    /// Create instances on demand when none are available
    pub allow_growth: bool,
    /// Resting state of released instances
    pub despawn_strategy: DespawnStrategy,
    /// Where relocated instances rest
    pub relocation_target: Vec3,
    /// Emit per-pool diagnostics (preallocation, growth)
    pub debug_messages: bool,
}

impl PoolConfig {
    /// Create a configuration with the given capacity and defaults otherwise
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Configuration used for pools created implicitly by a spawn request
    pub fn on_demand() -> Self {
        Self::new(0).with_growth(true)
    }

    /// Set the resting capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Allow or forbid on-demand growth
    pub fn with_growth(mut self, allow_growth: bool) -> Self {
        self.allow_growth = allow_growth;
        self
    }

    /// Set the despawn strategy
    pub fn with_strategy(mut self, strategy: DespawnStrategy) -> Self {
        self.despawn_strategy = strategy;
        self
    }

    /// Relocate released instances to `target`
    pub fn with_relocation_target(mut self, target: Vec3) -> Self {
        self.despawn_strategy = DespawnStrategy::Relocate;
        self.relocation_target = target;
        self
    }

    /// Enable or disable per-pool diagnostics
    pub fn with_debug_messages(mut self, enabled: bool) -> Self {
        self.debug_messages = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relocation_target.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "Relocation target must be finite, got {:?}",
                self.relocation_target
            )));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 1,
            allow_growth: false,
            despawn_strategy: DespawnStrategy::Deactivate,
            relocation_target: Vec3::from(DEFAULT_RELOCATION_TARGET),
            debug_messages: true,
        }
    }
}

/// A prototype together with the policy of its pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDescriptor {
    /// What the pool produces
    pub prototype: Prototype,
    /// Pool policy
    #[serde(default)]
    pub config: PoolConfig,
}

impl PoolDescriptor {
    /// Create a descriptor
    pub fn new(prototype: Prototype, config: PoolConfig) -> Self {
        Self { prototype, config }
    }
}

/// # Registry Configuration
///
/// Registry-wide switches plus the pools to provision at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Log lookups that miss, exhaustion, preallocation and growth
    pub debug_messages: bool,
    /// Send spawn/despawn notifications to instances
    pub lifecycle_hooks: bool,
    /// Pools registered and preallocated when the registry is built
    pub pools: Vec<PoolDescriptor>,
}

impl RegistryConfig {
    /// Create an empty configuration with default switches
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pool to provision at startup
    pub fn with_pool(mut self, prototype: Prototype, config: PoolConfig) -> Self {
        self.pools.push(PoolDescriptor::new(prototype, config));
        self
    }

    /// Enable or disable diagnostics
    pub fn with_debug_messages(mut self, enabled: bool) -> Self {
        self.debug_messages = enabled;
        self
    }

    /// Enable or disable spawn/despawn notifications
    pub fn with_lifecycle_hooks(mut self, enabled: bool) -> Self {
        self.lifecycle_hooks = enabled;
        self
    }

    /// Validate the entire configuration
    ///
    /// Prototype ids and logical names must both be unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for descriptor in &self.pools {
            descriptor.config.validate()?;

            if !ids.insert(descriptor.prototype.id()) {
                return Err(ConfigError::Invalid(format!(
                    "Prototype id {} is configured twice",
                    descriptor.prototype.id()
                )));
            }
            if !names.insert(descriptor.prototype.name()) {
                return Err(ConfigError::Invalid(format!(
                    "Pool name '{}' is configured twice",
                    descriptor.prototype.name()
                )));
            }
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            debug_messages: true,
            lifecycle_hooks: true,
            pools: Vec::new(),
        }
    }
}

impl Config for RegistryConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, 1);
        assert!(!config.allow_growth);
        assert_eq!(config.despawn_strategy, DespawnStrategy::Deactivate);
        assert_relative_eq!(config.relocation_target, Vec3::new(-100.0, -100.0, -100.0));

        let on_demand = PoolConfig::on_demand();
        assert_eq!(on_demand.capacity, 0);
        assert!(on_demand.allow_growth);
    }

    #[test]
    fn test_relocation_target_switches_strategy() {
        let config = PoolConfig::new(4).with_relocation_target(Vec3::new(0.0, -500.0, 0.0));
        assert_eq!(config.despawn_strategy, DespawnStrategy::Relocate);
        assert_eq!(config.capacity, 4);
    }

    #[test]
    fn test_non_finite_relocation_rejected() {
        let config = PoolConfig::new(1).with_relocation_target(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_registry_config_from_toml() {
        let text = r#"
            debug_messages = false

            [[pools]]
            prototype = { id = 1, name = "Chunk" }
            config = { capacity = 16, allow_growth = true }

            [[pools]]
            prototype = { id = 2, name = "Bullet" }
            config = { capacity = 64, despawn_strategy = "Relocate", relocation_target = [0.0, -50.0, 0.0] }
        "#;

        let config = RegistryConfig::from_toml_str(text).unwrap();
        assert!(!config.debug_messages);
        assert!(config.lifecycle_hooks);
        assert_eq!(config.pools.len(), 2);

        let chunk = &config.pools[0];
        assert_eq!(chunk.prototype.name(), "Chunk");
        assert_eq!(chunk.config.capacity, 16);
        assert!(chunk.config.allow_growth);
        assert_eq!(chunk.config.despawn_strategy, DespawnStrategy::Deactivate);

        let bullet = &config.pools[1];
        assert_eq!(bullet.config.despawn_strategy, DespawnStrategy::Relocate);
        assert_relative_eq!(bullet.config.relocation_target, Vec3::new(0.0, -50.0, 0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_config_ron_round_trip() {
        let config = RegistryConfig::new()
            .with_lifecycle_hooks(false)
            .with_pool(Prototype::new(7, "Particle"), PoolConfig::new(32).with_strategy(DespawnStrategy::Relocate));

        let text = ron::ser::to_string(&config).unwrap();
        let parsed = RegistryConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_duplicate_pools_rejected() {
        let same_id = RegistryConfig::new()
            .with_pool(Prototype::new(1, "Chunk"), PoolConfig::default())
            .with_pool(Prototype::new(1, "Tree"), PoolConfig::default());
        assert!(matches!(same_id.validate(), Err(ConfigError::Invalid(_))));

        let same_name = RegistryConfig::new()
            .with_pool(Prototype::new(1, "Chunk"), PoolConfig::default())
            .with_pool(Prototype::new(2, "Chunk"), PoolConfig::default());
        assert!(matches!(same_name.validate(), Err(ConfigError::Invalid(_))));
    }
}
