// Idiomatic Rust CLI for zstd-session.
//
// Uses explicit subcommands and long-form options. Compression and
// decompression both stream fixed-size chunks through a session, so
// arbitrarily large inputs run in constant memory.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::session::{CompressionSession, DecompressionSession};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DEFAULT_LEVEL: i32 = 3;
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB
const MAX_CHUNK_SIZE: u64 = 1 << 27; // 128 MiB

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024u64),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1u64),
    };
    let num: u64 = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

fn parse_level(s: &str) -> Result<i32, String> {
    let level: i32 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid level '{s}': {e}"))?;
    let (min, max) = (zstd_safe::min_c_level(), zstd_safe::max_c_level());
    if level < min || level > max {
        return Err(format!("level {level} outside supported range {min}..={max}"));
    }
    Ok(level)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Streaming zstd compressor/decompressor.
#[derive(Parser, Debug)]
#[command(
    name = "zstd-session",
    version,
    about = "Streaming zstd compressor/decompressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress an input stream into a zstd frame.
    Compress(CompressArgs),
    /// Decompress a zstd stream (concatenated frames supported).
    Decompress(DecompressArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Compression level.
    #[arg(long, short = 'l', value_parser = parse_level, default_value_t = DEFAULT_LEVEL)]
    level: i32,

    /// Input chunk size (supports K/M/G suffix).
    #[arg(long = "chunk-size", value_parser = parse_byte_size, default_value_t = DEFAULT_CHUNK_SIZE as u64)]
    chunk_size: u64,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (defaults to stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    /// Input chunk size (supports K/M/G suffix).
    #[arg(long = "chunk-size", value_parser = parse_byte_size, default_value_t = DEFAULT_CHUNK_SIZE as u64)]
    chunk_size: u64,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (defaults to stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Common {
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn open_input(path: &Option<PathBuf>) -> Result<Box<dyn Read>, i32> {
    match path {
        Some(p) => match File::open(p) {
            Ok(f) => Ok(Box::new(BufReader::with_capacity(DEFAULT_CHUNK_SIZE, f))),
            Err(e) => {
                eprintln!("zstd-session: input file: {}: {e}", p.display());
                Err(1)
            }
        },
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(
    path: &Option<PathBuf>,
    use_stdout: bool,
    force: bool,
) -> Result<Box<dyn Write>, i32> {
    if use_stdout || path.is_none() {
        return Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_CHUNK_SIZE,
            io::stdout().lock(),
        )));
    }
    let path = path.as_ref().unwrap();
    if path.exists() && !force {
        eprintln!(
            "zstd-session: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return Err(1);
    }
    match File::create(path) {
        Ok(f) => Ok(Box::new(BufWriter::with_capacity(DEFAULT_CHUNK_SIZE, f))),
        Err(e) => {
            eprintln!("zstd-session: output file: {}: {e}", path.display());
            Err(1)
        }
    }
}

fn checked_chunk_size(requested: u64) -> Result<usize, i32> {
    if requested == 0 || requested > MAX_CHUNK_SIZE {
        eprintln!("zstd-session: chunk size {requested} outside 1..={MAX_CHUNK_SIZE}");
        return Err(1);
    }
    Ok(requested as usize)
}

// ---------------------------------------------------------------------------
// Compress command
// ---------------------------------------------------------------------------

fn cmd_compress(common: &Common, args: &CompressArgs) -> i32 {
    let chunk_size = match checked_chunk_size(args.chunk_size) {
        Ok(n) => n,
        Err(code) => return code,
    };
    let mut reader = match open_input(&args.input) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(&args.output, args.stdout, common.force) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let mut session = CompressionSession::new();
    if let Err(e) = session.start(args.level) {
        eprintln!("zstd-session: start: {e}");
        return 1;
    }

    let mut buf = vec![0u8; chunk_size];
    let mut total_in = 0u64;
    let mut total_out = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("zstd-session: read error: {e}");
                return 1;
            }
        };
        if n == 0 {
            break;
        }
        total_in += n as u64;
        match session.process(&buf[..n], false) {
            Ok(compressed) => {
                total_out += compressed.len() as u64;
                if let Err(e) = writer.write_all(&compressed) {
                    eprintln!("zstd-session: write error: {e}");
                    return 1;
                }
            }
            Err(e) => {
                eprintln!("zstd-session: compress error: {e}");
                return 1;
            }
        }
    }

    // Close the frame; an empty terminal chunk is valid for empty input too.
    match session.process(&[], true) {
        Ok(tail) => {
            total_out += tail.len() as u64;
            if let Err(e) = writer.write_all(&tail) {
                eprintln!("zstd-session: write error: {e}");
                return 1;
            }
        }
        Err(e) => {
            eprintln!("zstd-session: finalize error: {e}");
            return 1;
        }
    }
    if let Err(e) = writer.flush() {
        eprintln!("zstd-session: write flush error: {e}");
        return 1;
    }

    if common.verbose > 0 && !common.quiet {
        eprintln!(
            "zstd-session: compress: input size: {total_in}, output size: {total_out}, \
             level: {}",
            args.level
        );
    }

    if common.json_output {
        let json = serde_json::json!({
            "command": "compress",
            "input_size": total_in,
            "output_size": total_out,
            "level": args.level,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Decompress command
// ---------------------------------------------------------------------------

fn cmd_decompress(common: &Common, args: &DecompressArgs) -> i32 {
    let chunk_size = match checked_chunk_size(args.chunk_size) {
        Ok(n) => n,
        Err(code) => return code,
    };
    let mut reader = match open_input(&args.input) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(&args.output, args.stdout, common.force) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let mut session = DecompressionSession::new();

    let mut buf = vec![0u8; chunk_size];
    let mut total_in = 0u64;
    let mut total_out = 0u64;
    let mut frames = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("zstd-session: read error: {e}");
                return 1;
            }
        };
        if n == 0 {
            break;
        }
        total_in += n as u64;

        let mut chunk = &buf[..n];
        while !chunk.is_empty() {
            if !session.is_active() {
                if let Err(e) = session.start() {
                    eprintln!("zstd-session: start: {e}");
                    return 1;
                }
            }
            let decoded = match session.process(chunk) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("zstd-session: decompress error: {e}");
                    return 1;
                }
            };
            total_out += decoded.len() as u64;
            if let Err(e) = writer.write_all(&decoded) {
                eprintln!("zstd-session: write error: {e}");
                return 1;
            }

            if session.is_active() {
                break;
            }
            frames += 1;
            chunk = &chunk[chunk.len() - session.unconsumed()..];
        }
    }

    if session.is_active() {
        eprintln!("zstd-session: compressed input truncated mid-frame");
        return 1;
    }
    if let Err(e) = writer.flush() {
        eprintln!("zstd-session: write flush error: {e}");
        return 1;
    }

    if common.verbose > 0 && !common.quiet {
        eprintln!(
            "zstd-session: decompress: input size: {total_in}, output size: {total_out}, \
             frames: {frames}"
        );
    }

    if common.json_output {
        let json = serde_json::json!({
            "command": "decompress",
            "input_size": total_in,
            "output_size": total_out,
            "frames": frames,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    println!("zstd-session {}", env!("CARGO_PKG_VERSION"));
    println!("zstd library: {}", zstd_safe::version_string());
    println!(
        "compression levels: {}..={}",
        zstd_safe::min_c_level(),
        zstd_safe::max_c_level()
    );
    println!(
        "recommended input chunk: {} (compress), {} (decompress)",
        zstd_safe::CCtx::in_size(),
        zstd_safe::DCtx::in_size()
    );
    println!(
        "staging buffer size: {} (compress), {} (decompress)",
        zstd_safe::CCtx::out_size(),
        zstd_safe::DCtx::out_size()
    );
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let common = Common {
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    };

    let exit_code = match &cli.command {
        Cmd::Compress(args) => cmd_compress(&common, args),
        Cmd::Decompress(args) => cmd_decompress(&common, args),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
