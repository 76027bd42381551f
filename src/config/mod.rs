//! Per-concern configuration, loaded from an optional `toml` file and
//! falling back to defaults (spec.md's ambient config surface; see
//! SPEC_FULL.md §1.3). Follows the teacher's per-concern submodule +
//! re-export pattern (`config::client`, `config::server`, ...).
pub mod client;
pub mod server;
pub mod worldgen;

pub use client::ClientConfig;
pub use server::ServerConfig;
pub use worldgen::WorldGenConfig;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Reads a TOML config file, falling back to `Default::default()` when
/// the file does not exist. A present-but-malformed file is an error
/// the caller should surface (fatal, process-scoped per spec.md §7).
pub fn load_or_default<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

/// The platform config directory for `file_name`, e.g.
/// `~/.config/voxelcore/server.toml` on Linux. Used as the fallback
/// config path when a binary isn't given one explicitly.
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    ProjectDirs::from("com", "MetroManDevTeam", "voxelcore").map(|dirs| dirs.config_dir().join(file_name))
}
