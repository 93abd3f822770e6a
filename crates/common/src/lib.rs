pub mod report;
pub mod settings;

use std::io::IsTerminal;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{FmtSubscriber, fmt};

use settings::Settings;

/// Install the global tracing subscriber: stdout plus a non-blocking file
/// appender in the configured log directory. The returned guard must be kept
/// alive for the lifetime of the process.
pub fn init_logging(settings: &Settings) -> WorkerGuard {
    let directory = &settings.logger.directory;

    let file_appender = tracing_appender::rolling::never(directory, "faultline.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let max_level = settings.logger.level.parse().unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_ansi(std::io::stdout().is_terminal())
        .finish()
        .with(fmt::Layer::new().with_ansi(false).with_writer(non_blocking));

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    guard
}
