//! Dedicated client process (spec.md §6): connects to a server, keeps a
//! local chunk cache in sync with `ChunkData`/`ChunkUnload`, and feeds
//! the mesh pipeline. Presentation is intentionally headless — pipeline
//! creation, swapchain, and windowing are out of scope (spec.md §1) and
//! live behind `GpuSink`, here stubbed with `NullSink`.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::IVec3;

use voxelcore::block::BlockType;
use voxelcore::client::{ChunkCache, ChunkPipeline, GpuSink, NullSink};
use voxelcore::config::{self, ClientConfig};
use voxelcore::net::Connection;
use voxelcore::protocol::{Message, PROTOCOL_VERSION};
use voxelcore::world::{rle, Chunk};

/// A placeholder atlas: every face maps to the same full-texture UV
/// rectangle. A real renderer supplies its own packed atlas through the
/// same `UvSource` seam (spec.md §9's "mesher's only polymorphism
/// requirement").
struct UnitAtlas;

impl voxelcore::mesh::UvSource for UnitAtlas {
    fn uv_for(&self, _block_type: BlockType, _normal: IVec3) -> (f32, f32, f32, f32) {
        (0.0, 0.0, 1.0, 1.0)
    }
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("failed to install logger");

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from).unwrap_or_else(|| {
        config::default_config_path("client.toml").unwrap_or_else(|| std::path::PathBuf::from("client.toml"))
    });
    let config: ClientConfig = match config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("failed to load {}: {err}", config_path.display());
            std::process::exit(1);
        }
    };

    let stream = match TcpStream::connect(&config.connect_addr) {
        Ok(stream) => stream,
        Err(err) => {
            log::error!("failed to connect to {}: {err}", config.connect_addr);
            std::process::exit(1);
        }
    };
    let mut connection = Connection::new(stream).expect("failed to configure connection");

    let player_name = std::env::var("VOXELCORE_PLAYER_NAME").unwrap_or_else(|_| "Player".to_owned());
    connection
        .send(&Message::ClientJoin {
            name: player_name,
            client_version: PROTOCOL_VERSION,
        })
        .expect("failed to send join handshake");
    connection.flush().expect("failed to flush join handshake");

    let mut cache = ChunkCache::new();
    let pipeline = ChunkPipeline::new(Arc::new(UnitAtlas), config.resolved_mesh_worker_count());
    let mut sink = NullSink::default();

    log::info!("connected to {}", config.connect_addr);

    loop {
        let tick_start = Instant::now();

        let messages = match connection.poll_messages() {
            Ok(messages) => messages,
            Err(err) => {
                log::error!("connection lost: {err}");
                break;
            }
        };

        for message in messages {
            match message {
                Message::ChunkData { coord, payload } => match rle::decode(&payload) {
                    Ok(blocks) => {
                        cache.insert(Chunk::from_blocks(coord, blocks));
                        pipeline.enqueue_chunk_and_neighbors(&cache, coord);
                    }
                    Err(err) => log::warn!("malformed chunk payload for {coord:?}: {err}"),
                },
                Message::ChunkUnload { coord } => {
                    cache.remove(coord);
                    sink.evict_chunk(coord);
                }
                Message::BlockUpdate { position, block_type } => {
                    log::debug!("block update at {position:?}: {block_type:?}");
                }
                Message::PlayerSpawn { player_id, .. } => log::debug!("player {player_id} spawned"),
                Message::PlayerPositionUpdate { .. } => {}
                Message::PlayerRemove { player_id } => log::debug!("player {player_id} left"),
                Message::Disconnect { reason } => {
                    log::info!("disconnected by server: {reason}");
                    return;
                }
                other => log::debug!("unexpected {:?} message from server", other.message_type()),
            }
        }

        for result in pipeline.drain_completed(config.render_drain_batch_size) {
            sink.upload_chunk(result.coord, &result.mesh.vertices, &result.mesh.indices);
        }

        let elapsed = tick_start.elapsed();
        let frame_budget = Duration::from_millis(16);
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    pipeline.shutdown();
}
