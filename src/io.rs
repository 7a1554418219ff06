// File-level streaming helpers built on the session layer.
//
// Provides `compress_file()` and `decompress_file()` convenience functions
// that drive a session with buffered I/O in fixed 64 KiB chunks.
// Decompression accepts concatenated multi-frame inputs by restarting the
// session on each frame boundary. Optionally computes streaming SHA-256
// checksums (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
#[cfg(feature = "file-io")]
use sha2::Digest;
use thiserror::Error;
use zstd_safe::CompressionLevel;

use crate::session::{CompressionSession, DecompressionSession, SessionError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Raw input size in bytes.
    pub input_size: u64,
    /// Compressed output size in bytes.
    pub output_size: u64,
    /// Compression level used.
    pub level: CompressionLevel,
    /// SHA-256 of the raw input (if the `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decompress_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Compressed input size in bytes.
    pub input_size: u64,
    /// Decompressed output size in bytes.
    pub output_size: u64,
    /// Number of zstd frames decoded.
    pub frames: u64,
    /// SHA-256 of the reconstructed output (if the `file-io` feature is
    /// enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Session-level error (codec or protocol).
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    /// The compressed input ended in the middle of a frame.
    #[error("compressed input truncated mid-frame")]
    Truncated,
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// compress_file
// ---------------------------------------------------------------------------

/// Compress a file into a single zstd frame at `output_path`.
///
/// The input is streamed through a `BufReader` in 64 KiB chunks; the frame
/// is finalized with an empty terminal chunk so that even an empty input
/// yields a valid frame. When the `file-io` feature is enabled, a SHA-256
/// of the raw input is computed incrementally.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    level: CompressionLevel,
) -> Result<CompressStats, IoError> {
    let input_file = File::open(input_path)?;
    let input_size = input_file.metadata()?.len();
    let mut reader = BufReader::with_capacity(BUF_SIZE, input_file);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let mut session = CompressionSession::new();
    session.start(level)?;

    #[cfg(feature = "file-io")]
    let mut hasher = sha2::Sha256::new();

    let mut output_size = 0u64;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        #[cfg(feature = "file-io")]
        {
            hasher.update(&buf[..n]);
        }
        let compressed = session.process(&buf[..n], false)?;
        output_size += compressed.len() as u64;
        writer.write_all(&compressed)?;
    }

    // Terminal call: closes the frame even when the input was empty.
    let tail = session.process(&[], true)?;
    output_size += tail.len() as u64;
    writer.write_all(&tail)?;
    writer.flush()?;

    debug!("compressed {input_size} -> {output_size} bytes at level {level}");

    #[cfg(feature = "file-io")]
    let input_sha256 = Some(hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let input_sha256: Option<[u8; 32]> = None;

    Ok(CompressStats {
        input_size,
        output_size,
        level,
        input_sha256,
    })
}

// ---------------------------------------------------------------------------
// decompress_file
// ---------------------------------------------------------------------------

/// Decompress a zstd file at `input_path`, writing raw bytes to
/// `output_path`.
///
/// Concatenated multi-frame inputs are supported: whenever a frame
/// completes mid-chunk, the session is restarted and fed the unconsumed
/// tail. Input that ends inside a frame fails with [`IoError::Truncated`].
pub fn decompress_file(input_path: &Path, output_path: &Path) -> Result<DecompressStats, IoError> {
    let input_file = File::open(input_path)?;
    let input_size = input_file.metadata()?.len();
    let mut reader = BufReader::with_capacity(BUF_SIZE, input_file);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let mut session = DecompressionSession::new();

    #[cfg(feature = "file-io")]
    let mut hasher = sha2::Sha256::new();

    let mut output_size = 0u64;
    let mut frames = 0u64;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let mut chunk = &buf[..n];
        while !chunk.is_empty() {
            if !session.is_active() {
                session.start()?;
            }
            let decoded = session.process(chunk)?;
            #[cfg(feature = "file-io")]
            {
                hasher.update(&decoded);
            }
            output_size += decoded.len() as u64;
            writer.write_all(&decoded)?;

            if session.is_active() {
                // Chunk fully consumed, frame still open.
                break;
            }
            frames += 1;
            chunk = &chunk[chunk.len() - session.unconsumed()..];
        }
    }
    writer.flush()?;

    if session.is_active() {
        return Err(IoError::Truncated);
    }

    debug!("decompressed {input_size} -> {output_size} bytes, {frames} frame(s)");

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    Ok(DecompressStats {
        input_size,
        output_size,
        frames,
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
