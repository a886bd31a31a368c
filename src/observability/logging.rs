use log::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-v` repetitions to a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. `RUST_LOG` wins over `verbosity` when set.
///
/// With `trace`, a `tracing` subscriber is installed instead so pipeline and
/// check spans show up; `log` records are forwarded to it.
pub fn init_logging(verbosity: u8, trace: bool) {
    let level = level_for_verbosity(verbosity);
    if trace {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    } else {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp_millis()
            .try_init();
    }
}
