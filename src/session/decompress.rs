// Decompression session: incremental zstd decompression, self-terminating.
//
// Simpler than the compression side: there is no flush/finalize
// distinction. The engine is fed until the chunk is consumed, draining the
// staging buffer into the result after every call, and a zero return from
// the engine marks the frame as fully decoded. Bytes past the frame end are
// never examined within a call; their count is reported via `unconsumed`.

use log::{debug, trace};
use zstd_safe::{DCtx, InBuffer, OutBuffer};

use super::SessionError;

// ---------------------------------------------------------------------------
// DecompressionSession
// ---------------------------------------------------------------------------

/// Streaming decompressor for one zstd frame per `start`.
///
/// Compressed input may be split into chunks of any size, including mid-
/// frame-header splits; the engine buffers partial frames internally. The
/// session returns to idle on its own when the frame is fully decoded.
///
/// # Example
/// ```
/// use zstd_session::session::{CompressionSession, DecompressionSession};
///
/// let mut compressor = CompressionSession::new();
/// compressor.start(3).unwrap();
/// let frame = compressor.process(b"payload", true).unwrap();
///
/// let mut session = DecompressionSession::new();
/// session.start().unwrap();
/// assert_eq!(session.process(&frame).unwrap(), b"payload");
/// assert!(!session.is_active());
/// ```
pub struct DecompressionSession {
    dctx: DCtx<'static>,
    staging: Vec<u8>,
    in_progress: bool,
    unconsumed: usize,
}

impl DecompressionSession {
    /// Create an idle session with an engine-recommended staging buffer.
    pub fn new() -> Self {
        Self {
            dctx: DCtx::create(),
            staging: vec![0u8; zstd_safe::DCtx::out_size()],
            in_progress: false,
            unconsumed: 0,
        }
    }

    /// Whether a frame is currently being decoded.
    pub fn is_active(&self) -> bool {
        self.in_progress
    }

    /// Number of input bytes the last `process` call left unconsumed after
    /// the frame completed mid-chunk. Zero while a frame is in progress.
    ///
    /// Callers decoding concatenated multi-frame streams re-`start` the
    /// session and re-feed this tail of their previous chunk.
    pub fn unconsumed(&self) -> usize {
        self.unconsumed
    }

    /// Begin decoding a new frame.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyActive`] — leaving the running stream
    /// intact — if a frame is already being decoded.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.in_progress {
            return Err(SessionError::AlreadyActive);
        }
        self.dctx.init().map_err(SessionError::codec)?;
        self.in_progress = true;
        self.unconsumed = 0;
        debug!("decompression session started");
        Ok(())
    }

    /// Feed one chunk of compressed input and return the decoded bytes.
    ///
    /// When the engine signals frame completion the session goes idle and
    /// stops consuming, even if input bytes remain in this chunk; see
    /// [`unconsumed`](Self::unconsumed). The result may be empty while the
    /// engine is still accumulating a partial frame header.
    ///
    /// # Errors
    /// [`SessionError::NotActive`] if no frame is being decoded.
    /// [`SessionError::Codec`] aborts the call, discarding any output
    /// accumulated within it; the session is then unusable and must be
    /// dropped (`in_progress` is deliberately left unchanged).
    pub fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, SessionError> {
        if !self.in_progress {
            return Err(SessionError::NotActive);
        }

        let mut result = Vec::new();
        let mut in_buffer = InBuffer::around(input);
        let mut out_buffer = OutBuffer::around(self.staging.as_mut_slice());
        self.unconsumed = 0;

        loop {
            let hint = self
                .dctx
                .decompress_stream(&mut out_buffer, &mut in_buffer)
                .map_err(SessionError::codec)?;

            result.extend_from_slice(out_buffer.as_slice());

            // Zero means the frame is fully decoded; anything after it in
            // this chunk stays untouched.
            if hint == 0 {
                self.in_progress = false;
                self.unconsumed = input.len() - in_buffer.pos;
                break;
            }
            unsafe { out_buffer.set_pos(0) };

            if in_buffer.pos >= input.len() {
                break;
            }
        }

        trace!(
            "decompressed chunk: {} bytes in, {} bytes out, active={}",
            input.len(),
            result.len(),
            self.in_progress
        );
        Ok(result)
    }
}

impl Default for DecompressionSession {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CompressionSession;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut session = CompressionSession::new();
        session.start(3).unwrap();
        session.process(data, true).unwrap()
    }

    #[test]
    fn start_while_active_is_rejected() {
        let mut session = DecompressionSession::new();
        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::AlreadyActive));
        assert!(session.is_active());
    }

    #[test]
    fn process_without_start_fails() {
        let mut session = DecompressionSession::new();
        assert_eq!(session.process(b"data"), Err(SessionError::NotActive));
    }

    #[test]
    fn completes_on_end_of_frame() {
        let frame = compress(b"some payload bytes");

        let mut session = DecompressionSession::new();
        session.start().unwrap();
        let decoded = session.process(&frame).unwrap();

        assert_eq!(decoded, b"some payload bytes");
        assert!(!session.is_active());
        assert_eq!(session.unconsumed(), 0);
    }

    #[test]
    fn trailing_bytes_are_reported_not_consumed() {
        let mut stream = compress(b"first");
        let second = compress(b"second");
        stream.extend_from_slice(&second);

        let mut session = DecompressionSession::new();
        session.start().unwrap();
        let decoded = session.process(&stream).unwrap();

        assert_eq!(decoded, b"first");
        assert!(!session.is_active());
        assert_eq!(session.unconsumed(), second.len());

        // Re-feed the tail for the next concatenated frame.
        session.start().unwrap();
        let tail_start = stream.len() - second.len();
        let decoded = session.process(&stream[tail_start..]).unwrap();
        assert_eq!(decoded, b"second");
        assert!(!session.is_active());
    }

    #[test]
    fn garbage_input_is_a_codec_error() {
        let mut session = DecompressionSession::new();
        session.start().unwrap();

        let err = session.process(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]).unwrap_err();
        assert!(err.code().is_some());

        // Error policy: the flag is left unchanged; the session is simply
        // not to be used again.
        assert!(session.is_active());
    }
}
