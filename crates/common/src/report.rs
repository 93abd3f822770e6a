use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host environment descriptors attached to every envelope, read at send time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterInfo {
    pub os: String,
    pub arch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

impl ReporterInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            runtime: None,
        }
    }
}

/// Wire format for a single crash report submission.
///
/// The `report` value is opaque to the collector; it is stored exactly as
/// received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    pub timestamp: String,
    pub report: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_info: Option<ReporterInfo>,
}

impl ReportEnvelope {
    /// Build an envelope for `report`, stamped with the current UTC time and
    /// the host's os/arch.
    pub fn now(report: Value) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            report,
            reporter_info: Some(ReporterInfo::current()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_camel_case_wire_names() {
        let envelope = ReportEnvelope::now(json!({"message": "boom"}));
        let wire = serde_json::to_value(&envelope).unwrap();

        assert!(wire.get("timestamp").is_some());
        assert_eq!(wire["report"]["message"], "boom");
        assert_eq!(wire["reporterInfo"]["os"], std::env::consts::OS);
        assert_eq!(wire["reporterInfo"]["arch"], std::env::consts::ARCH);
        assert!(wire["reporterInfo"].get("runtime").is_none());
    }

    #[test]
    fn envelope_round_trips() {
        let envelope = ReportEnvelope::now(json!({"type": "error", "code": 7}));
        let wire = serde_json::to_string(&envelope).unwrap();
        let back: ReportEnvelope = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, envelope);
    }
}
