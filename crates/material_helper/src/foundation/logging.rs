//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, Level, LevelFilter};

/// Initialize logging with a fallback level, still honouring `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_ignored() {
        init_with_level(LevelFilter::Debug);
        init_with_level(LevelFilter::Warn);
        info!("logger initialised");
    }
}
