use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::REPORTS_NAMESPACE;

pub struct ReportApi;

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub message: String,
    pub id: String,
}

impl ReportApi {
    const REQUIRED_FIELDS: &'static [&'static str] = &["timestamp", "report"];

    fn validate_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
        let is_json = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            error!("Report submitted without JSON content type");
            return Err(ApiError::UnsupportedMediaType);
        }
        Ok(())
    }

    fn parse_envelope(body: &Bytes) -> Result<Value, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "Failed to parse report body");
            ApiError::MalformedJson(e.to_string())
        })?;

        let Some(envelope) = value.as_object() else {
            error!("Report body is not a JSON object");
            return Err(ApiError::MissingFields(Self::REQUIRED_FIELDS.to_vec()));
        };

        let missing: Vec<_> = Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !envelope.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            error!(?missing, "Report envelope is incomplete");
            return Err(ApiError::MissingFields(missing));
        }

        Ok(value)
    }

    /// Accept one report submission: validate, persist under a fresh id,
    /// answer 201. The payload is stored exactly as received.
    #[instrument(skip(state, headers, body), fields(report_id))]
    pub async fn submit(
        State(state): State<AppState>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
        Self::validate_content_type(&headers)?;
        let envelope = Self::parse_envelope(&body)?;

        let report_id = Uuid::new_v4();
        tracing::Span::current().record("report_id", format!("{report_id}"));

        let _ack = state
            .store
            .put(REPORTS_NAMESPACE, &report_id.to_string(), &envelope)
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to persist report");
                ApiError::StorageFailure
            })?;

        info!("Report stored");
        Ok((
            StatusCode::CREATED,
            Json(ReportResponse {
                message: "Report received successfully".to_string(),
                id: report_id.to_string(),
            }),
        ))
    }
}
