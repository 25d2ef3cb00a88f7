use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "vocab-store.log";

/// Applied unless `RUST_LOG` names the target itself. Per-statement sqlx
/// events would otherwise drown the store's own events at debug.
const QUIET_TARGETS: [&str; 1] = ["sqlx=warn"];

/// Keeps the background log writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// `RUST_LOG`-style filter for the store. A bare level such as `debug`
/// applies to `vocab_store` and everything else, minus the quiet targets.
pub fn build_filter(log_level: &str) -> EnvFilter {
    let mut filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    for quiet in QUIET_TARGETS {
        let Some((target, _)) = quiet.split_once('=') else {
            continue;
        };
        if log_level.contains(target) {
            continue;
        }
        if let Ok(directive) = quiet.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}

pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let stdout_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(stdout_layer);

    if !file_logging_enabled() {
        registry.init();
        tracing::debug!(filter = log_level, "tracing initialised");
        return None;
    }

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        registry.init();
        tracing::warn!(error = %err, log_dir = %log_dir, "file logging disabled, log directory unavailable");
        return None;
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX));
    registry
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::debug!(filter = log_level, log_dir = %log_dir, file = LOG_FILE_PREFIX, "tracing initialised");
    Some(FileLogGuard { _guard: guard })
}
