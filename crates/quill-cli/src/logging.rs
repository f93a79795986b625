// Logging setup for the CLI

use tracing::Level;

/// Pick the log level from CLI flags; an explicit `--log-level` wins
pub fn resolve_level(verbose: bool, quiet: bool, log_level: Option<&str>) -> Level {
    if let Some(level) = log_level {
        return match level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
    }

    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the tracing subscriber writing to stderr
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(verbose: bool, quiet: bool, log_level: Option<&str>) {
    let level = resolve_level(verbose, quiet, log_level);
    let debug = level >= Level::DEBUG;

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(debug)
        .with_file(debug)
        .with_line_number(debug)
        .with_writer(std::io::stderr)
        .try_init();
}
