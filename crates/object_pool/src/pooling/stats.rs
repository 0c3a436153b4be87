//! Read-only pool statistics
//!
//! Snapshots that inspectors, debug overlays and logs can poll without
//! touching pool internals.

use crate::core::config::DespawnStrategy;

/// Snapshot of one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Logical name of the pool's prototype
    pub name: String,
    /// Current resting capacity (grows with on-demand creation)
    pub capacity: usize,
    /// Instances ready to hand out
    pub available: usize,
    /// Instances currently handed out
    pub in_use: usize,
    /// Whether on-demand growth is enabled
    pub allow_growth: bool,
    /// Resting strategy
    pub despawn_strategy: DespawnStrategy,
}

impl PoolStats {
    /// Every instance the pool tracks
    pub fn total(&self) -> usize {
        self.available + self.in_use
    }

    /// Fraction of tracked instances handed out, 0.0 for an empty pool
    pub fn utilization(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.in_use as f32 / total as f32
        }
    }
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} in use, {} available, capacity {}",
            self.name,
            self.in_use,
            self.total(),
            self.available,
            self.capacity
        )
    }
}

/// Statistics for the whole registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered pools
    pub pool_count: usize,
    /// Instances handed out across all pools
    pub total_in_use: usize,
    /// Instances resting across all pools
    pub total_available: usize,
    /// Successful spawns since creation
    pub total_spawned: u64,
    /// Successful despawns since creation
    pub total_despawned: u64,
    /// Spawn requests that came back empty
    pub failed_spawns: u64,
    /// Highest `total_in_use` observed
    pub peak_in_use: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(available: usize, in_use: usize) -> PoolStats {
        PoolStats {
            name: "Chunk".to_string(),
            capacity: available + in_use,
            available,
            in_use,
            allow_growth: false,
            despawn_strategy: DespawnStrategy::Deactivate,
        }
    }

    #[test]
    fn test_utilization() {
        assert_relative_eq!(stats(0, 0).utilization(), 0.0);
        assert_relative_eq!(stats(3, 1).utilization(), 0.25);
        assert_eq!(stats(3, 1).total(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(stats(2, 1).to_string(), "Chunk: 1/3 in use, 2 available, capacity 3");
    }
}
