use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::ReporterError;
use common::report::ReportEnvelope;

/// Delivery seam between the pipeline and the network, so tests can record
/// envelopes instead of opening sockets.
pub trait Transport: Send + Sync {
    fn deliver(&self, envelope: &ReportEnvelope) -> Result<(), ReporterError>;
}

/// Blocking POST to the collector endpoint. Blocking because the panic hook
/// runs on the panicking thread, with no executor to hand off to.
pub struct HttpTransport {
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

impl Transport for HttpTransport {
    fn deliver(&self, envelope: &ReportEnvelope) -> Result<(), ReporterError> {
        // No request timeout: a report blocked on a slow collector is
        // preferable to a lost one, and the process is exiting anyway.
        let client = Client::builder().timeout(None::<Duration>).build()?;

        let response = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(envelope)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReporterError::Rejected(status.as_u16()));
        }

        debug!(endpoint = %self.endpoint, "report accepted by collector");
        Ok(())
    }
}
