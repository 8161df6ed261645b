use anyhow::Context;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Initializer for logger. Logs go to stderr so piped output stays clean.
pub fn init(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up the global logger")
}
