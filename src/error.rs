//! Crate-wide error type.
//!
//! Subsystems define their own focused error enums (`world::WorldError`,
//! `protocol::ProtocolError`); this one is for the handful of paths that
//! cross subsystem boundaries (binary entry points, the tick loop) and
//! mirrors the teacher's `CoreError` + `Result<T>` alias shape.

use thiserror::Error;

use crate::protocol::ProtocolError;
use crate::world::WorldError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("failed to bind listener on {addr}: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create world directory {path}: {source}")]
    WorldDirUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
