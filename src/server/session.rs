//! The server's record of one connected player (spec.md §3
//! `PlayerSession`): identity, position, and the chunk set streaming
//! diffs against.

use std::collections::HashSet;

use glam::Vec3;

use crate::net::Connection;
use crate::world::ChunkCoord;

pub type PlayerId = u32;

pub struct PlayerSession {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Vec3,
    /// The server's own record of the position chunks were last streamed
    /// from — distinct from `position`, which tracks every `PlayerMove`
    /// (spec.md §3/§4.7).
    pub last_streamed_position: Vec3,
    /// Chunks this client has been told about and not yet told to unload
    /// (spec.md §3 — drives the streaming diff in `server::streaming`).
    pub loaded_chunks: HashSet<ChunkCoord>,
    pub connection: Connection,
}

impl PlayerSession {
    pub fn new(player_id: PlayerId, name: String, spawn: Vec3, connection: Connection) -> Self {
        Self {
            player_id,
            name,
            position: spawn,
            last_streamed_position: spawn,
            loaded_chunks: HashSet::new(),
            connection,
        }
    }

    /// spec.md §4.7: "if the position has moved ≥16 blocks from
    /// last_streamed_position, trigger a streaming recompute for this
    /// player."
    pub fn has_moved_past_streaming_threshold(&self, threshold: f32) -> bool {
        self.position.distance(self.last_streamed_position) >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};

    fn test_connection() -> Connection {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).unwrap();
        let (server, _) = listener.accept().unwrap();
        Connection::new(server).unwrap()
    }

    #[test]
    fn fresh_session_has_not_moved() {
        let session = PlayerSession::new(1, "Steve".to_owned(), Vec3::new(0.0, 5.0, 0.0), test_connection());
        assert!(!session.has_moved_past_streaming_threshold(16.0));
    }

    #[test]
    fn moving_past_threshold_is_detected() {
        let mut session = PlayerSession::new(1, "Steve".to_owned(), Vec3::ZERO, test_connection());
        session.position = Vec3::new(500.0, 5.0, 0.0);
        assert!(session.has_moved_past_streaming_threshold(16.0));
    }

    #[test]
    fn small_movement_stays_under_threshold() {
        let mut session = PlayerSession::new(1, "Steve".to_owned(), Vec3::ZERO, test_connection());
        session.position = Vec3::new(4.0, 0.0, 0.0);
        assert!(!session.has_moved_past_streaming_threshold(16.0));
    }
}
