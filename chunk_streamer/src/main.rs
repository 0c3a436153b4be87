//! Chunk streaming demo
//!
//! Walks a viewer across an endless terrain grid on a headless host and keeps
//! the chunks around it loaded through an object pool. Pass a `.toml` or
//! `.ron` settings file as the first argument to override the defaults.

mod config;
mod streamer;

use config::StreamerConfig;
use object_pool::foundation::logging;
use object_pool::prelude::*;
use rand::prelude::*;
use streamer::{ChunkStreamer, StreamerError};

fn main() -> Result<(), StreamerError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => StreamerConfig::load_from_file(path)?,
        None => StreamerConfig::default(),
    };
    logging::init_with_filter(&settings.log_level);

    log::info!("Starting chunk streamer demo ({} ticks)", settings.ticks);

    let result = run(&settings);
    match &result {
        Ok(()) => log::info!("Chunk streamer demo completed successfully"),
        Err(e) => log::error!("Chunk streamer demo failed: {}", e),
    }
    result
}

fn run(settings: &StreamerConfig) -> Result<(), StreamerError> {
    let chunk = Prototype::new(1, "Chunk");
    let registry_config = RegistryConfig::new().with_pool(chunk.clone(), settings.chunk_pool.clone());

    let mut host = HeadlessHost::new();
    host.subscribe(&chunk);
    let mut registry = PoolRegistry::from_config(registry_config, host)?;

    let mut streamer = ChunkStreamer::new(chunk, settings.chunk_width, settings.view_range);
    let mut rng = thread_rng();
    let mut viewer = Vec3::zeros();

    for tick in 0..settings.ticks {
        viewer.x += settings.viewer_speed;
        if settings.viewer_jitter > 0.0 {
            viewer.z += rng.gen_range(-settings.viewer_jitter..=settings.viewer_jitter);
        }

        let (despawned, spawned) = streamer.update(&mut registry, viewer)?;
        if despawned > 0 || spawned > 0 {
            log::debug!(
                "Tick {}: viewer at ({:.1}, {:.1}), -{} +{} chunks",
                tick,
                viewer.x,
                viewer.z,
                despawned,
                spawned
            );
        }
    }

    for stats in registry.pool_stats() {
        log::info!("{}", stats);
    }
    let totals = registry.stats();
    log::info!(
        "Spawned {}, despawned {}, peak in use {}, host created {} instances",
        totals.total_spawned,
        totals.total_despawned,
        totals.peak_in_use,
        registry.factory().created_count()
    );

    streamer.unload_all(&mut registry)?;
    registry.shutdown()?;
    Ok(())
}
