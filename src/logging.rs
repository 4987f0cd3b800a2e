use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

const DEFAULT_LEVEL: &str = "info";

/// Map a configured level name onto one the filter understands.
///
/// Returns the level to use and whether the configured one was recognized.
pub fn normalize_level(level: &str) -> (&'static str, bool) {
    let wanted = level.trim().to_ascii_lowercase();
    match LOG_LEVELS.iter().find(|l| **l == wanted) {
        Some(level) => (level, true),
        None => (DEFAULT_LEVEL, false),
    }
}

/// Default filter directive for a level, scoped to this crate.
pub fn default_directive(level: &str) -> String {
    let (level, _) = normalize_level(level);
    format!("curate={}", level)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Filtering is decided here once; library code only emits events.
pub fn init_tracing(level: &str) {
    let (_, recognized) = normalize_level(level);

    let installed = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();

    if installed && !recognized {
        tracing::warn!(level = %level, "Unknown log level, using info");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("debug"), ("debug", true));
        assert_eq!(normalize_level(" WARN "), ("warn", true));
        assert_eq!(normalize_level("verbose"), ("info", false));
        assert_eq!(normalize_level(""), ("info", false));
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("error"), "curate=error");
        assert_eq!(default_directive("loud"), "curate=info");
    }
}
