use {
    std::sync::Once,
    tracing::level_filters::LevelFilter,
    tracing_subscriber::{
        EnvFilter,
        fmt::writer::MakeWriterExt as _,
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the tracing setup that is shared between the services.
/// `env_filter` has the same syntax as env_logger's filter directives.
/// Records at or above `stderr_threshold` go to stderr, the rest to
/// stdout.
pub fn initialize(env_filter: &str, stderr_threshold: LevelFilter) {
    set_tracing_subscriber(env_filter, stderr_threshold);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row.
/// Later calls are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The subscriber is a global object so initializing it a second
    // time in the same process would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(env_filter, LevelFilter::ERROR);
        std::panic::set_hook(Box::new(tracing_panic_hook));
    });
}

fn set_tracing_subscriber(env_filter: &str, stderr_threshold: LevelFilter) {
    let writer = std::io::stderr
        .with_max_level(stderr_threshold.into_level().unwrap_or(tracing::Level::ERROR))
        .or_else(std::io::stdout);
    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();
}

/// Panic hook that routes the message through `tracing` so panics show
/// up in the same stream, and with the same metadata, as other logs.
fn tracing_panic_hook(panic: &std::panic::PanicHookInfo) {
    tracing::error!("thread panicked: {panic}");
}
