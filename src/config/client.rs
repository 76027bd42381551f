//! Client-side tuning knobs (spec.md §4.4/§6).
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub connect_addr: String,
    /// `N = min(4, hardware_concurrency)` per spec.md §4.4; `None` means
    /// resolve from `std::thread::available_parallelism` at startup.
    pub mesh_worker_count: Option<usize>,
    /// `K` in "drain up to K completed meshes per frame" (spec.md §4.4).
    pub render_drain_batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_addr: "127.0.0.1:25565".to_owned(),
            mesh_worker_count: None,
            render_drain_batch_size: 10,
        }
    }
}

impl ClientConfig {
    pub fn resolved_mesh_worker_count(&self) -> usize {
        self.mesh_worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().min(4))
                .unwrap_or(1)
        })
    }
}
