#![no_main]
use libfuzzer_sys::fuzz_target;
use zstd_session::session::{CompressionSession, DecompressionSession};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Use the first two bytes as control values.
    let level = i32::from(data[0] % 19) + 1;
    let chunk_size = usize::from(data[1]) + 1;
    let payload = &data[2..];

    let mut compressor = CompressionSession::new();
    compressor.start(level).unwrap();

    let mut stream = Vec::new();
    if payload.is_empty() {
        stream.extend(compressor.process(&[], true).unwrap());
    } else {
        let mut chunks = payload.chunks(chunk_size).peekable();
        while let Some(chunk) = chunks.next() {
            let finalize = chunks.peek().is_none();
            stream.extend(compressor.process(chunk, finalize).unwrap());
        }
    }

    // Decode and verify roundtrip.
    let mut decompressor = DecompressionSession::new();
    decompressor.start().unwrap();
    let decoded = decompressor.process(&stream).unwrap();
    assert!(!decompressor.is_active());
    assert_eq!(decoded, payload);
});
