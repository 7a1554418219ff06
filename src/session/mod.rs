// Streaming session layer over the Zstandard engine.
//
// Two mirror-image session types drive the engine incrementally:
//   - `CompressionSession` — raw chunks in, compressed chunks out, with an
//     explicit finalize flag on the terminal chunk
//   - `DecompressionSession` — compressed chunks in, raw chunks out,
//     self-terminating when the engine reports end-of-frame
//
// Each session exclusively owns one engine context and one fixed-capacity
// staging buffer through which all engine output passes. Sessions share
// nothing; callers needing concurrent streams use independent instances.

pub mod compress;
pub mod decompress;

pub use compress::CompressionSession;
pub use decompress::DecompressionSession;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Session error
// ---------------------------------------------------------------------------

/// Error type for session operations.
///
/// `Codec` carries the engine's numeric status code; the protocol variants
/// are synchronous precondition failures that mutate no engine or buffer
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The engine reported a failure on a compress/flush/end/decompress
    /// call. After this, the session must be discarded: engine-internal
    /// state may be corrupted and no retry is attempted.
    #[error("codec error {code}: {message}")]
    Codec {
        /// The engine's numeric error code.
        code: usize,
        /// The engine's description of the code.
        message: &'static str,
    },

    /// `start` was called while a stream is already in progress.
    #[error("session already active")]
    AlreadyActive,

    /// `process` was called on a session with no stream in progress.
    #[error("session not active")]
    NotActive,
}

impl SessionError {
    pub(crate) fn codec(code: usize) -> Self {
        Self::Codec {
            code,
            message: zstd_safe::get_error_name(code),
        }
    }

    /// The engine's numeric error code, if this is a codec error.
    pub fn code(&self) -> Option<usize> {
        match self {
            Self::Codec { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_resolves_engine_message() {
        // Force a real engine error code by decompressing garbage.
        let mut session = DecompressionSession::new();
        session.start().unwrap();
        let err = session.process(b"definitely not a zstd frame").unwrap_err();

        let code = err.code().expect("expected a codec error");
        assert_ne!(code, 0);
        assert!(err.to_string().contains("codec error"));
    }

    #[test]
    fn protocol_errors_carry_no_code() {
        assert_eq!(SessionError::AlreadyActive.code(), None);
        assert_eq!(SessionError::NotActive.code(), None);
    }
}
