use serde::Serialize;
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::state::PersistStatus;

/// Health response returned by the `/api/health` route.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether a snapshot write is waiting.
    pub save_pending: bool,
    /// Time of the last successful snapshot write.
    pub last_saved_at: Option<String>,
    /// Error of the last failed snapshot write.
    pub last_error: Option<String>,
}

impl HealthResponse {
    /// Build the response from the persistence status; a failed last write means degraded.
    pub fn from_status(status: PersistStatus) -> Self {
        let label = if status.last_error.is_some() {
            "degraded"
        } else {
            "ok"
        };
        Self {
            status: label.to_string(),
            save_pending: status.pending,
            last_saved_at: status.last_saved_at,
            last_error: status.last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_reports_degraded() {
        let response = HealthResponse::from_status(PersistStatus {
            pending: true,
            last_saved_at: None,
            last_error: Some("disk full".into()),
        });
        assert_eq!(response.status, "degraded");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("lastSavedAt").is_none());
        assert_eq!(value["lastError"], "disk full");
    }

    #[test]
    fn clean_status_is_ok() {
        assert_eq!(HealthResponse::from_status(PersistStatus::default()).status, "ok");
    }
}
