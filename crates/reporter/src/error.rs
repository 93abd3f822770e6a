use thiserror::Error;

use crate::dialog::DialogError;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("dialog failed: {0}")]
    Dialog(#[from] DialogError),

    #[error("dialog implementation panicked")]
    DialogPanicked,

    #[error("failed to encode report payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to send report: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collector rejected report: HTTP {0}")]
    Rejected(u16),
}
