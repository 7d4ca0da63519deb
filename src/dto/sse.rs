use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// SSE event name carrying the full game object.
pub const GAME_UPDATE_EVENT: &str = "game:update";
/// SSE event name carrying a proctor flag.
pub const FLAG_EVENT: &str = "flag";

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Event name; `None` sends an unnamed message.
    pub event: Option<String>,
    /// Serialized payload.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Unnamed plain-text event.
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when a proctor raises a flag for the Game Master. Not stored in the game.
pub struct FlagEvent {
    /// Unique id of this flag.
    pub id: Uuid,
    /// Flagging proctor.
    pub proctor_id: String,
    /// Proctor display name.
    pub proctor_name: String,
    /// Flagged team.
    pub team_id: String,
    /// Team display name.
    pub team_name: String,
    /// RFC 3339 time the flag was raised.
    pub raised_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_carries_name_and_payload() {
        let event = ServerEvent::json(FLAG_EVENT.to_string(), &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(event.event.as_deref(), Some("flag"));
        assert_eq!(event.data, r#"{"a":1}"#);
    }
}
