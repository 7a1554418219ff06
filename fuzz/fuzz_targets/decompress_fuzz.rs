#![no_main]
use libfuzzer_sys::fuzz_target;
use zstd_session::session::DecompressionSession;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decompression session with arbitrary bytes.
    // The session must never panic — only return errors.
    let mut session = DecompressionSession::new();
    session.start().unwrap();
    let _ = session.process(data);

    // Also fuzz chunked delivery of the same bytes.
    if data.len() >= 2 {
        let mut session = DecompressionSession::new();
        session.start().unwrap();
        let split = data.len() / 2;
        if session.process(&data[..split]).is_ok() && session.is_active() {
            let _ = session.process(&data[split..]);
        }
    }
});
