fn main() {
    #[cfg(feature = "cli")]
    zstd_session::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("zstd-session: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
