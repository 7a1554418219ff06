//! Incremental Zstandard compression/decompression sessions.
//!
//! The crate provides:
//! - Streaming session types (`session`): arbitrarily-chunked input in,
//!   compressed/decompressed chunks out
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use zstd_session::session::{CompressionSession, DecompressionSession};
//!
//! let mut compressor = CompressionSession::new();
//! compressor.start(3).unwrap();
//! let mut frame = compressor.process(b"hello ", false).unwrap();
//! frame.extend(compressor.process(b"zstd", true).unwrap());
//!
//! let mut decompressor = DecompressionSession::new();
//! decompressor.start().unwrap();
//! assert_eq!(decompressor.process(&frame).unwrap(), b"hello zstd");
//! ```

pub mod io;
pub mod session;

#[cfg(feature = "cli")]
pub mod cli;
