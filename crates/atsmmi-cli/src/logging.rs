use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level for the number of `-v` flags.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the stderr subscriber. `RUST_LOG` directives are honoured on top
/// of the `-v` level.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level_for(verbose).into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
