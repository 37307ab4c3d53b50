//! Inbound JSON envelope and its mapping onto [`SkillRequest`].

use serde::Deserialize;
use waymark_adventure::domain::request::{LifecycleEvent, SkillRequest};
use waymark_core::error::DomainError;
use waymark_core::session::SessionKey;

/// Envelope `version` value that marks a keep-alive probe.
pub const PING_VERSION: &str = "ping";

/// Request body for POST /skill.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestEnvelope {
    /// Envelope version, or `"ping"` for a probe.
    #[serde(default)]
    pub version: Option<String>,
    /// Conversation session.
    #[serde(default)]
    pub session: Option<Session>,
    /// Device context.
    #[serde(default)]
    pub context: Option<Context>,
    /// The request itself.
    #[serde(default)]
    pub request: Option<RequestSection>,
}

/// Session section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Platform session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The user who owns the session.
    #[serde(default)]
    pub user: Option<User>,
}

/// Device context section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Context {
    /// System block.
    #[serde(rename = "System", default)]
    pub system: Option<SystemContext>,
}

/// `context.System`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemContext {
    /// The user the device is linked to.
    #[serde(default)]
    pub user: Option<User>,
}

/// A platform user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user identifier.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Request section. `type` stays a string so unknown kinds still parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestSection {
    /// Request kind, for example `IntentRequest`.
    #[serde(rename = "type", default)]
    pub request_type: String,
    /// Present on intent requests.
    #[serde(default)]
    pub intent: Option<Intent>,
}

/// Classified intent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Intent {
    /// Intent name.
    #[serde(default)]
    pub name: String,
}

impl RequestEnvelope {
    /// Maps the envelope onto a [`SkillRequest`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a launch or intent request has
    /// no session key, or when the request section is missing.
    pub fn into_skill_request(self) -> Result<SkillRequest, DomainError> {
        if self.version.as_deref() == Some(PING_VERSION) {
            return Ok(SkillRequest::Ping);
        }

        let session_key = self.session_key();
        let request = self
            .request
            .ok_or_else(|| DomainError::Validation("request section is missing".to_owned()))?;

        let require_key = || {
            session_key
                .clone()
                .ok_or_else(|| DomainError::Validation("no user or session id found".to_owned()))
        };

        match request.request_type.as_str() {
            "LaunchRequest" => Ok(SkillRequest::Launch {
                session_key: require_key()?,
            }),
            "IntentRequest" => Ok(SkillRequest::Intent {
                session_key: require_key()?,
                intent_name: request.intent.map(|i| i.name).unwrap_or_default(),
            }),
            "AlexaSkillEvent.SkillEnabled" => {
                Ok(SkillRequest::Lifecycle(LifecycleEvent::SkillEnabled))
            }
            "AlexaSkillEvent.SkillDisabled" => {
                Ok(SkillRequest::Lifecycle(LifecycleEvent::SkillDisabled))
            }
            "SessionEndedRequest" => Ok(SkillRequest::Lifecycle(LifecycleEvent::SessionEnded)),
            _ => Ok(SkillRequest::Lifecycle(LifecycleEvent::Unsupported)),
        }
    }

    fn session_key(&self) -> Option<SessionKey> {
        let session_user = self
            .session
            .as_ref()
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.user_id.as_deref());
        let context_user = self
            .context
            .as_ref()
            .and_then(|c| c.system.as_ref())
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.user_id.as_deref());
        let session_id = self.session.as_ref().and_then(|s| s.session_id.as_deref());

        [session_user, context_user, session_id]
            .into_iter()
            .flatten()
            .find(|id| !id.trim().is_empty())
            .map(SessionKey::from)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<SkillRequest, DomainError> {
        serde_json::from_value::<RequestEnvelope>(value)
            .unwrap()
            .into_skill_request()
    }

    #[test]
    fn test_ping_short_circuits_before_request_section() {
        let request = parse(json!({ "version": "ping" })).unwrap();

        assert_eq!(request, SkillRequest::Ping);
    }

    #[test]
    fn test_intent_request_uses_session_user_id() {
        // Arrange
        let body = json!({
            "version": "1.0",
            "session": { "sessionId": "sess-1", "user": { "userId": "user-1" } },
            "request": { "type": "IntentRequest", "intent": { "name": "WalkNorthIntent" } }
        });

        // Act
        let request = parse(body).unwrap();

        // Assert
        assert_eq!(
            request,
            SkillRequest::Intent {
                session_key: SessionKey::from("user-1"),
                intent_name: "WalkNorthIntent".to_owned(),
            }
        );
    }

    #[test]
    fn test_launch_falls_back_to_context_user_then_session_id() {
        let from_context = parse(json!({
            "session": { "sessionId": "sess-1" },
            "context": { "System": { "user": { "userId": "device-user" } } },
            "request": { "type": "LaunchRequest" }
        }))
        .unwrap();
        let from_session = parse(json!({
            "session": { "sessionId": "sess-1", "user": { "userId": "  " } },
            "request": { "type": "LaunchRequest" }
        }))
        .unwrap();

        assert_eq!(
            from_context,
            SkillRequest::Launch {
                session_key: SessionKey::from("device-user")
            }
        );
        assert_eq!(
            from_session,
            SkillRequest::Launch {
                session_key: SessionKey::from("sess-1")
            }
        );
    }

    #[test]
    fn test_lifecycle_and_unknown_types_map_to_events() {
        let cases = [
            ("AlexaSkillEvent.SkillEnabled", LifecycleEvent::SkillEnabled),
            ("AlexaSkillEvent.SkillDisabled", LifecycleEvent::SkillDisabled),
            ("SessionEndedRequest", LifecycleEvent::SessionEnded),
            ("Display.ElementSelected", LifecycleEvent::Unsupported),
        ];

        for (request_type, expected) in cases {
            let request = parse(json!({ "request": { "type": request_type } })).unwrap();
            assert_eq!(request, SkillRequest::Lifecycle(expected), "{request_type}");
        }
    }

    #[test]
    fn test_intent_without_any_identifier_is_validation_error() {
        let result = parse(json!({
            "request": { "type": "IntentRequest", "intent": { "name": "ResumeIntent" } }
        }));

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_missing_request_section_is_validation_error() {
        let result = parse(json!({ "version": "1.0" }));

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_intent_without_name_keeps_blank_name() {
        let request = parse(json!({
            "session": { "user": { "userId": "user-1" } },
            "request": { "type": "IntentRequest" }
        }))
        .unwrap();

        assert!(matches!(request, SkillRequest::Intent { intent_name, .. } if intent_name.is_empty()));
    }
}
