use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("chunk file {path} is {actual} bytes, expected {expected}")]
    SizeMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("chunk file {path} header says ({hx}, {hy}, {hz}) but filename says ({fx}, {fy}, {fz})")]
    CoordMismatch {
        path: String,
        hx: i32,
        hy: i32,
        hz: i32,
        fx: i32,
        fy: i32,
        fz: i32,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rle decode ran out of input mid-pair")]
    RleTruncated,

    #[error("rle decode produced {0} blocks, expected exactly {1}")]
    RleWrongVolume(usize, usize),
}

pub type WorldResult<T> = std::result::Result<T, WorldError>;
