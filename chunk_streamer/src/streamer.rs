//! Terrain chunk streaming
//!
//! Keeps a square of chunks around the viewer alive. Each tick, chunks that
//! fell out of range are despawned first and the newly visible cells are
//! spawned afterwards, so the same pooled instances are reused within the
//! tick.

use object_pool::prelude::*;
use std::collections::{HashMap, HashSet};

/// Integer grid coordinate of a chunk
pub type Cell = (i32, i32);

/// Errors raised while streaming
#[derive(thiserror::Error, Debug)]
pub enum StreamerError {
    /// Pool refused or failed a request
    #[error("Pooling error: {0}")]
    Pool(#[from] PoolError),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Streams chunks through a pool registry
pub struct ChunkStreamer {
    prototype: Prototype,
    chunk_width: f32,
    view_range: f32,
    loaded: HashMap<Cell, InstanceHandle>,
}

impl ChunkStreamer {
    /// Create a streamer for `prototype`
    pub fn new(prototype: Prototype, chunk_width: f32, view_range: f32) -> Self {
        Self {
            prototype,
            chunk_width,
            view_range,
            loaded: HashMap::new(),
        }
    }

    /// Cells whose chunks cover the square of `view_range` around `viewer`
    pub fn visible_cells(&self, viewer: Vec3) -> HashSet<Cell> {
        let min_x = ((viewer.x - self.view_range) / self.chunk_width).floor() as i32;
        let max_x = ((viewer.x + self.view_range) / self.chunk_width).floor() as i32;
        let min_z = ((viewer.z - self.view_range) / self.chunk_width).floor() as i32;
        let max_z = ((viewer.z + self.view_range) / self.chunk_width).floor() as i32;

        (min_x..=max_x)
            .flat_map(|x| (min_z..=max_z).map(move |z| (x, z)))
            .collect()
    }

    /// World pose of a cell's chunk
    pub fn cell_pose(&self, cell: Cell) -> Pose {
        Pose::from_position(Vec3::new(
            cell.0 as f32 * self.chunk_width,
            0.0,
            cell.1 as f32 * self.chunk_width,
        ))
    }

    /// Bring the loaded set in line with what `viewer` can see
    ///
    /// Returns `(despawned, spawned)`.
    pub fn update<F: InstanceFactory>(
        &mut self,
        registry: &mut PoolRegistry<F>,
        viewer: Vec3,
    ) -> Result<(usize, usize), StreamerError> {
        let visible = self.visible_cells(viewer);

        let stale: Vec<Cell> = self
            .loaded
            .keys()
            .filter(|cell| !visible.contains(*cell))
            .copied()
            .collect();
        for cell in &stale {
            if let Some(handle) = self.loaded.remove(cell) {
                handle.despawn_into(registry)?;
            }
        }

        let mut spawned = 0;
        for cell in visible {
            if self.loaded.contains_key(&cell) {
                continue;
            }
            match registry.spawn_by_name(self.prototype.name(), self.cell_pose(cell))? {
                Some(handle) => {
                    self.loaded.insert(cell, handle);
                    spawned += 1;
                }
                None => log::warn!("Chunk pool exhausted, cell {:?} stays empty", cell),
            }
        }

        Ok((stale.len(), spawned))
    }

    /// Number of chunks currently loaded
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Return every loaded chunk to the pool
    pub fn unload_all<F: InstanceFactory>(&mut self, registry: &mut PoolRegistry<F>) -> Result<(), StreamerError> {
        for (_, handle) in self.loaded.drain() {
            registry.despawn(handle)?;
        }
        Ok(())
    }
}
