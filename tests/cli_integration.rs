use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_zstd-session").to_string()
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let compressed = dir.path().join("input.zst");
    let output = dir.path().join("output.bin");

    let payload: Vec<u8> = b"cli roundtrip payload. "
        .iter()
        .copied()
        .cycle()
        .take(100_000)
        .collect();
    std::fs::write(&input, &payload).unwrap();

    let st = Command::new(bin())
        .args(["--force", "compress", "--level", "5"])
        .arg(&input)
        .arg(&compressed)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .args(["--force", "decompress"])
        .arg(&compressed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), payload);
}

#[test]
fn cli_small_chunk_size_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let compressed = dir.path().join("input.zst");
    let output = dir.path().join("output.bin");

    std::fs::write(&input, b"small chunks still make one frame").unwrap();

    let st = Command::new(bin())
        .args(["compress", "--chunk-size", "4"])
        .arg(&input)
        .arg(&compressed)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .args(["decompress", "--chunk-size", "3"])
        .arg(&compressed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        b"small chunks still make one frame"
    );
}

#[test]
fn cli_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let existing = dir.path().join("existing.zst");

    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&existing, b"precious").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&existing)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&existing).unwrap(), b"precious");
}

#[test]
fn cli_decompress_rejects_garbage() {
    let dir = tempdir().unwrap();
    let garbage = dir.path().join("garbage.zst");
    let output = dir.path().join("out.bin");

    std::fs::write(&garbage, b"this is not a zstd stream at all").unwrap();

    let st = Command::new(bin())
        .args(["--force", "decompress"])
        .arg(&garbage)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
}

#[test]
fn cli_config_prints_engine_details() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("zstd-session"));
    assert!(text.contains("compression levels"));
}
