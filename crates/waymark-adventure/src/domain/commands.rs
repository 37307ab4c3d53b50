//! Commands for the adventure context.

use uuid::Uuid;
use waymark_core::command::Command;
use waymark_core::session::SessionKey;

use super::request::SkillRequest;

/// Command to answer a launch request with a welcome or resume prompt.
#[derive(Debug, Clone)]
pub struct LaunchAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session opening the skill.
    pub session_key: SessionKey,
}

impl Command for LaunchAdventure {
    fn command_type(&self) -> &'static str {
        "adventure.launch"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to apply a classified intent to the session's current node.
#[derive(Debug, Clone)]
pub struct ApplyIntent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session issuing the intent.
    pub session_key: SessionKey,
    /// The classified intent name.
    pub intent_name: String,
}

impl Command for ApplyIntent {
    fn command_type(&self) -> &'static str {
        "adventure.apply_intent"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command wrapping any inbound request; dispatched by category.
#[derive(Debug, Clone)]
pub struct ProcessSkillRequest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The classified request.
    pub request: SkillRequest,
}

impl Command for ProcessSkillRequest {
    fn command_type(&self) -> &'static str {
        "adventure.process_skill_request"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
