//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Honours `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. Returns `false`
/// if a logger was already installed.
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still takes precedence over `filter`. Calling this more than
/// once is harmless; later calls leave the first logger in place.
pub fn init_with_filter(filter: &str) -> bool {
    let env = env_logger::Env::default().default_filter_or(filter);
    env_logger::Builder::from_env(env).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        let _ = init();
        assert!(!init_with_filter("debug"));
    }
}
