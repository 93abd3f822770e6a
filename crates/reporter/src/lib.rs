//! Client-side crash reporting.
//!
//! A host application opts in by calling [`install`] once at startup. From
//! then on, an unrecoverable panic is serialized, the end user is asked for
//! consent through a native dialog, and the report is POSTed to the
//! collector before the process exits with a non-zero status. Without a
//! configured collector URL the library does nothing at all.

pub mod config;
pub mod dialog;
pub mod error;
pub mod serialize;
pub mod transport;

use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use common::report::ReportEnvelope;

pub use config::ReporterConfig;
use dialog::{Choice, ConfirmDialog, DialogPrompt, platform_dialog};
use error::ReporterError;
use transport::{HttpTransport, Transport};

const EXIT_CODE: i32 = 1;

/// Result of handling one trigger. Only the top-level hook acts on it; the
/// handler chain itself never exits the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No reporter installed; nothing was captured or sent.
    Disabled,
    /// The payload was empty or trivial, so no prompt was shown.
    SkippedEmpty,
    /// The user declined, or the dialog could not be presented.
    Declined,
    Sent,
    SendFailed,
}

#[derive(Debug, Clone, Copy)]
pub enum TriggerKind {
    Panic,
    TaskFailure,
    Manual,
}

impl TriggerKind {
    fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Panic => "panic",
            TriggerKind::TaskFailure => "task_failure",
            TriggerKind::Manual => "manual",
        }
    }
}

pub struct Reporter {
    dialog: Box<dyn ConfirmDialog>,
    transport: Box<dyn Transport>,
}

static REPORTER: OnceLock<Reporter> = OnceLock::new();
static HANDLING: AtomicBool = AtomicBool::new(false);

impl Reporter {
    pub fn new(dialog: Box<dyn ConfirmDialog>, transport: Box<dyn Transport>) -> Self {
        Self { dialog, transport }
    }

    /// Run the full pipeline for one trigger: log, confirm, send. Never
    /// panics and never exits; both guarantees belong to the caller.
    pub fn handle_trigger(&self, kind: TriggerKind, payload: Value) -> Outcome {
        error!(kind = kind.as_str(), report = %payload, "unrecoverable application error");

        if serialize::is_trivial(&payload) {
            info!("empty crash payload, skipping report");
            return Outcome::SkippedEmpty;
        }

        let confirmed = match self.confirm() {
            Ok(choice) => choice == Choice::Affirm,
            Err(err) => {
                warn!(error = %err, "could not present crash report dialog, treating as decline");
                self.report_internal_failure(&err, &payload);
                false
            }
        };

        if !confirmed {
            info!("crash report declined");
            return Outcome::Declined;
        }

        match self.send(payload.clone()) {
            Ok(()) => {
                info!("crash report sent");
                Outcome::Sent
            }
            Err(err) => {
                error!(error = %err, "failed to send crash report");
                self.report_internal_failure(&err, &payload);
                Outcome::SendFailed
            }
        }
    }

    fn confirm(&self) -> Result<Choice, ReporterError> {
        let prompt = DialogPrompt::crash_report();
        // A misbehaving dialog implementation must not unwind through the
        // exit path.
        match panic::catch_unwind(AssertUnwindSafe(|| self.dialog.ask(&prompt))) {
            Ok(result) => Ok(result?),
            Err(_) => Err(ReporterError::DialogPanicked),
        }
    }

    fn send(&self, payload: Value) -> Result<(), ReporterError> {
        let mut envelope = ReportEnvelope::now(payload);
        if let Some(reporter_info) = envelope.reporter_info.as_mut() {
            reporter_info.runtime =
                Some(format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
        }
        self.transport.deliver(&envelope)
    }

    /// Submit an envelope describing a failure inside the reporter itself,
    /// carrying the original payload. Best effort, no second prompt.
    fn report_internal_failure(&self, failure: &ReporterError, original: &Value) {
        let payload = json!({
            "type": "reporter_internal_error",
            "error": { "name": "ReporterError", "message": failure.to_string() },
            "original": original,
        });
        if let Err(err) = self.send(payload) {
            warn!(error = %err, "failed to submit internal failure report");
        }
    }
}

/// Install the crash reporter. With no collector URL configured this logs one
/// line and registers nothing, so unconfigured hosts never pay for reporting.
pub fn install(config: ReporterConfig) {
    let Some(endpoint) = config.endpoint() else {
        info!("crash reporting disabled: no collector base URL configured");
        return;
    };

    install_with(Reporter::new(
        platform_dialog(),
        Box::new(HttpTransport::new(endpoint)),
    ));
}

fn install_with(reporter: Reporter) {
    if REPORTER.set(reporter).is_err() {
        warn!("crash reporter already installed");
        return;
    }

    // Replaces the default hook outright: the reporter logs equivalent
    // detail, so the runtime's own panic output is suppressed.
    panic::set_hook(Box::new(|info| {
        // Re-entrant panic (a panic raised while a report is in flight):
        // exit immediately rather than recurse.
        if HANDLING.swap(true, Ordering::SeqCst) {
            process::exit(EXIT_CODE);
        }

        if let Some(reporter) = REPORTER.get() {
            let payload = serialize::from_panic(info);
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                reporter.handle_trigger(TriggerKind::Panic, payload)
            }));
        }

        // The one and only exit call: reached whether the report was sent,
        // declined, or failed.
        process::exit(EXIT_CODE);
    }));

    info!("crash reporter installed");
}

/// Report a failed task or rejected job the host considers fatal, then exit.
/// The counterpart to the panic hook for errors surfaced through `Result`
/// channels rather than unwinding.
pub fn report_task_failure<E: std::error::Error + ?Sized>(err: &E) -> ! {
    if HANDLING.swap(true, Ordering::SeqCst) {
        process::exit(EXIT_CODE);
    }

    match REPORTER.get() {
        Some(reporter) => {
            let payload = serialize::from_error(err);
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                reporter.handle_trigger(TriggerKind::TaskFailure, payload)
            }));
        }
        None => error!(error = %err, "unhandled task failure (crash reporting inactive)"),
    }

    process::exit(EXIT_CODE);
}

/// Manually submit a report for an error the host caught itself. Runs the
/// same confirm-and-send pipeline but leaves the process running; the caller
/// decides whether to continue.
pub fn crash_report(content: Value) -> Outcome {
    match REPORTER.get() {
        Some(reporter) => reporter.handle_trigger(TriggerKind::Manual, content),
        None => Outcome::Disabled,
    }
}

/// [`crash_report`] for values that are not already JSON: strings, numbers,
/// any `Serialize` type. Unrepresentable values degrade to their debug
/// formatting rather than being dropped.
pub fn crash_report_value<T: Serialize + std::fmt::Debug>(value: &T) -> Outcome {
    crash_report(serialize::from_value(value))
}

/// [`crash_report`] for a caught error, preserving its `source()` chain and
/// any custom serialized fields (error codes and the like).
pub fn crash_report_error<E: std::error::Error + Serialize>(err: &E) -> Outcome {
    crash_report(serialize::from_error_with_details(err))
}
