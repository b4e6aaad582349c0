use env_logger::Env;

/// Log target of this crate.
const CRATE_TARGET: &str = "rangepick";

/// Maps CLI verbosity to a filter for this crate's target.
///
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
pub fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{CRATE_TARGET}={level}")
}

/// Initialize logging to stderr. `RUST_LOG` overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbosity)))
        .format_timestamp(None)
        .init();
}
