//! On-disk chunk encoding (spec.md §3/§6): `chunk_<cx>_<cy>_<cz>.dat`
//! inside a configured world directory, 12-byte little-endian coordinate
//! header followed by the raw 32,768-entry block array (65,536 bytes) —
//! a fixed 65,548-byte file.
//!
//! Grounded on the teacher's `world::storage::{file, region}` save/load
//! shape, generalized from bincode-blob persistence to the exact raw
//! layout the spec's failure-mode table requires (mismatched coords or
//! size must be detected, not silently coerced by a serde format).

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::block::{Block, BlockType};
use crate::world::chunk::{Chunk, CHUNK_VOLUME};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::error::{WorldError, WorldResult};

const HEADER_BYTES: usize = 12;
const BODY_BYTES: usize = CHUNK_VOLUME * 2;
pub const FILE_BYTES: usize = HEADER_BYTES + BODY_BYTES;

pub fn file_name(coord: ChunkCoord) -> String {
    format!("chunk_{}_{}_{}.dat", coord.x, coord.y, coord.z)
}

pub fn file_path(dir: &Path, coord: ChunkCoord) -> PathBuf {
    dir.join(file_name(coord))
}

/// Parses `chunk_<cx>_<cy>_<cz>.dat` back into a `ChunkCoord`.
pub fn parse_file_name(name: &str) -> Option<ChunkCoord> {
    let stem = name.strip_prefix("chunk_")?.strip_suffix(".dat")?;
    let mut parts = stem.split('_');
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ChunkCoord::new(x, y, z))
}

/// Serializes a chunk to the fixed on-disk layout. Does not consult or
/// clear the dirty flag — that bookkeeping belongs to the caller
/// (`World::save_world`).
pub fn encode(chunk: &Chunk) -> Vec<u8> {
    let mut out = Vec::with_capacity(FILE_BYTES);
    out.extend_from_slice(&chunk.coord.x.to_le_bytes());
    out.extend_from_slice(&chunk.coord.y.to_le_bytes());
    out.extend_from_slice(&chunk.coord.z.to_le_bytes());
    for block in chunk.blocks() {
        out.extend_from_slice(&(block.block_type as u16).to_le_bytes());
    }
    out
}

/// Decodes a chunk file's bytes, validating that its embedded coordinate
/// header matches the coordinate implied by the filename (spec.md §3:
/// "Coordinates in the file must match the filename; mismatch is a hard
/// error") and that the payload is exactly `FILE_BYTES` long.
pub fn decode(path: &Path, expected_coord: ChunkCoord, bytes: &[u8]) -> WorldResult<Chunk> {
    if bytes.len() != FILE_BYTES {
        return Err(WorldError::SizeMismatch {
            path: path.display().to_string(),
            expected: FILE_BYTES,
            actual: bytes.len(),
        });
    }

    let hx = i32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let hy = i32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let hz = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
    let header_coord = ChunkCoord::new(hx, hy, hz);
    if header_coord != expected_coord {
        return Err(WorldError::CoordMismatch {
            path: path.display().to_string(),
            hx,
            hy,
            hz,
            fx: expected_coord.x,
            fy: expected_coord.y,
            fz: expected_coord.z,
        });
    }

    let mut blocks = Vec::with_capacity(CHUNK_VOLUME);
    for chunk_bytes in bytes[HEADER_BYTES..].chunks_exact(2) {
        let raw = u16::from_le_bytes([chunk_bytes[0], chunk_bytes[1]]);
        blocks.push(Block::new(BlockType::from_u16(raw)));
    }

    Ok(Chunk::from_blocks(header_coord, blocks))
}

/// Reads and decodes a chunk file from `dir`. Any I/O or validation
/// failure is returned to the caller, which treats it per spec.md §4.1's
/// "disk read failure -> fall through to generate" policy.
pub fn load(dir: &Path, coord: ChunkCoord) -> WorldResult<Chunk> {
    let path = file_path(dir, coord);
    let mut file = fs::File::open(&path).map_err(|source| WorldError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut bytes = Vec::with_capacity(FILE_BYTES);
    file.read_to_end(&mut bytes).map_err(|source| WorldError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode(&path, coord, &bytes)
}

/// Writes a chunk to `dir`, creating the directory if needed.
pub fn save(dir: &Path, chunk: &Chunk) -> WorldResult<()> {
    fs::create_dir_all(dir).map_err(|source| WorldError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let path = file_path(dir, chunk.coord);
    fs::write(&path, encode(chunk)).map_err(|source| WorldError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_matches_expected_pattern() {
        assert_eq!(file_name(ChunkCoord::new(-1, 2, 3)), "chunk_-1_2_3.dat");
    }

    #[test]
    fn parse_file_name_round_trips() {
        let coord = ChunkCoord::new(-4, 0, 7);
        assert_eq!(parse_file_name(&file_name(coord)), Some(coord));
    }

    #[test]
    fn parse_file_name_rejects_garbage() {
        assert_eq!(parse_file_name("not_a_chunk_file.dat"), None);
    }

    #[test]
    fn encode_produces_fixed_size_payload() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        assert_eq!(encode(&chunk).len(), FILE_BYTES);
        assert_eq!(FILE_BYTES, 65_548);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut chunk = Chunk::new(ChunkCoord::new(2, 0, -3));
        chunk.set_block(1, 1, 1, Block::new(BlockType::Stone));

        save(dir.path(), &chunk).unwrap();
        let loaded = load(dir.path(), chunk.coord).unwrap();

        assert_eq!(loaded.blocks(), chunk.blocks());
        assert_eq!(loaded.coord, chunk.coord);
    }

    #[test]
    fn rejects_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let coord = ChunkCoord::new(0, 0, 0);
        fs::write(file_path(dir.path(), coord), vec![0u8; 10]).unwrap();
        assert!(matches!(
            load(dir.path(), coord),
            Err(WorldError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_coord_mismatch_between_header_and_filename() {
        let dir = tempfile::tempdir().unwrap();
        let written_coord = ChunkCoord::new(0, 0, 0);
        let chunk = Chunk::new(ChunkCoord::new(9, 9, 9));
        fs::write(file_path(dir.path(), written_coord), encode(&chunk)).unwrap();

        assert!(matches!(
            load(dir.path(), written_coord),
            Err(WorldError::CoordMismatch { .. })
        ));
    }
}
