//! The authoritative server: owns the world, tracks connected players,
//! and drives the fixed-rate tick loop (spec.md §4.7-§4.9).

pub mod cli;
pub mod session;
pub mod streaming;
pub mod tick;
pub mod validation;

pub use cli::Command;
pub use session::{PlayerId, PlayerSession};
pub use streaming::{compute_diff, stream_to_session, StreamDiff};
pub use tick::GameServer;
pub use validation::{validate_edit, EditKind, EditRejection, MAX_EDIT_DISTANCE};
