//! Transport: framed, non-blocking TCP connections (spec.md §4.6).
pub mod transport;

pub use transport::Connection;
