// Compression session: incremental zstd compression with explicit finalize.
//
// The engine may decline to consume a whole chunk in one call, and a burst
// of pending output may exceed the staging buffer. `process` therefore runs
// two nested loops keyed on the buffer-view positions: feed until the input
// is consumed, and after every feed drain flush/end output until the engine
// reports zero bytes remaining. Collapsing this into a single engine call
// silently truncates output whenever the staging buffer is undersized
// relative to the pending burst.

use log::{debug, trace};
use zstd_safe::{CCtx, CompressionLevel, InBuffer, OutBuffer};

use super::SessionError;

// ---------------------------------------------------------------------------
// CompressionSession
// ---------------------------------------------------------------------------

/// Streaming compressor producing one zstd frame per `start`/finalize pair.
///
/// Input may be split into chunks of any size; the frame is closed by
/// passing `finalize = true` with the terminal chunk (which may be empty).
/// After finalize the session is idle again and may be restarted for a new
/// frame, reusing the engine context and staging buffer.
///
/// # Example
/// ```
/// use zstd_session::session::CompressionSession;
///
/// let mut session = CompressionSession::new();
/// session.start(3).unwrap();
/// let mut frame = session.process(b"hello ", false).unwrap();
/// frame.extend(session.process(b"zstd", true).unwrap());
/// assert!(!session.is_active());
/// # assert!(!frame.is_empty());
/// ```
pub struct CompressionSession {
    cctx: CCtx<'static>,
    staging: Vec<u8>,
    in_progress: bool,
}

impl CompressionSession {
    /// Create an idle session.
    ///
    /// The staging buffer is sized once to the engine-recommended output
    /// chunk size and never reallocated; the engine context is released
    /// when the session is dropped.
    pub fn new() -> Self {
        Self {
            cctx: CCtx::create(),
            staging: vec![0u8; zstd_safe::CCtx::out_size()],
            in_progress: false,
        }
    }

    /// Whether a frame is currently in progress.
    pub fn is_active(&self) -> bool {
        self.in_progress
    }

    /// Begin a new frame at the given compression level.
    ///
    /// The level is handed to the engine unchecked; an out-of-range value
    /// surfaces as a codec error on the first `process` call.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyActive`] — leaving the running stream
    /// intact — if a frame is already in progress.
    pub fn start(&mut self, level: CompressionLevel) -> Result<(), SessionError> {
        if self.in_progress {
            return Err(SessionError::AlreadyActive);
        }
        self.cctx.init(level).map_err(SessionError::codec)?;
        self.in_progress = true;
        debug!("compression session started at level {level}");
        Ok(())
    }

    /// Feed one input chunk and return the compressed bytes it produced.
    ///
    /// With `finalize = true` the frame is closed once the chunk has been
    /// fully consumed and the session returns to idle. Without it the
    /// stream stays open and pending output is flushed, so the returned
    /// bytes for all calls concatenate into the frame. The result may be
    /// empty when the engine emits nothing for this chunk.
    ///
    /// # Errors
    /// [`SessionError::NotActive`] if no frame is in progress.
    /// [`SessionError::Codec`] aborts the call, discarding any output
    /// accumulated within it; the session is then unusable and must be
    /// dropped (`in_progress` is deliberately left unchanged).
    pub fn process(&mut self, input: &[u8], finalize: bool) -> Result<Vec<u8>, SessionError> {
        if !self.in_progress {
            return Err(SessionError::NotActive);
        }

        let mut result = Vec::new();
        let mut in_buffer = InBuffer::around(input);
        let mut out_buffer = OutBuffer::around(self.staging.as_mut_slice());

        loop {
            self.cctx
                .compress_stream(&mut out_buffer, &mut in_buffer)
                .map_err(SessionError::codec)?;

            // Closing the frame is only legal once the engine holds the
            // whole chunk; until then a flush keeps the stream open.
            let closing = finalize && in_buffer.pos >= input.len();

            loop {
                let remaining = if closing {
                    self.cctx.end_stream(&mut out_buffer)
                } else {
                    self.cctx.flush_stream(&mut out_buffer)
                }
                .map_err(SessionError::codec)?;

                result.extend_from_slice(out_buffer.as_slice());
                unsafe { out_buffer.set_pos(0) };

                if remaining == 0 {
                    break;
                }
            }

            if in_buffer.pos >= input.len() {
                break;
            }
        }

        if finalize {
            self.in_progress = false;
        }
        trace!(
            "compressed chunk: {} bytes in, {} bytes out, finalize={finalize}",
            input.len(),
            result.len()
        );
        Ok(result)
    }
}

impl Default for CompressionSession {
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

    #[test]
    fn start_while_active_is_rejected() {
        let mut session = CompressionSession::new();
        session.start(3).unwrap();
        assert_eq!(session.start(3), Err(SessionError::AlreadyActive));

        // The first stream is still usable.
        assert!(session.is_active());
        session.process(b"still fine", true).unwrap();
        assert!(!session.is_active());
    }

    #[test]
    fn process_without_start_fails() {
        let mut session = CompressionSession::new();
        assert_eq!(
            session.process(b"data", false),
            Err(SessionError::NotActive)
        );
    }

    #[test]
    fn empty_input_finalize_emits_terminal_frame() {
        let mut session = CompressionSession::new();
        session.start(1).unwrap();
        let frame = session.process(&[], true).unwrap();

        // Even an empty stream produces frame header + epilogue bytes.
        assert!(!frame.is_empty());
        assert!(!session.is_active());
    }

    #[test]
    fn session_is_reusable_after_finalize() {
        let mut session = CompressionSession::new();

        session.start(3).unwrap();
        let first = session.process(b"first frame", true).unwrap();

        session.start(3).unwrap();
        let second = session.process(b"second frame", true).unwrap();

        assert!(!first.is_empty());
        assert!(!second.is_empty());
        assert!(!session.is_active());
    }

}
