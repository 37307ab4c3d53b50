//! Inbound request categories and intent classification.

use waymark_core::session::SessionKey;

/// Intent that begins the adventure from the start node.
pub const BEGIN_INTENT: &str = "BeginIntent";
/// Intent that repeats the current node.
pub const RESUME_INTENT: &str = "ResumeIntent";
/// Built-in intent that restarts the adventure.
pub const START_OVER_INTENT: &str = "AMAZON.StartOverIntent";
/// Built-in stop intent.
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
/// Built-in cancel intent.
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
/// Built-in help intent.
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
/// Built-in fallback intent.
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// A classified inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillRequest {
    /// Health probe. Answered before any graph logic runs.
    Ping,
    /// The user opened the skill.
    Launch {
        /// Whose position to consult.
        session_key: SessionKey,
    },
    /// The user said something that was classified as an intent.
    Intent {
        /// Whose position to consult and update.
        session_key: SessionKey,
        /// Classified intent name.
        intent_name: String,
    },
    /// Skill enabled/disabled, session ended and similar notifications.
    Lifecycle(LifecycleEvent),
}

/// Notifications that need only an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The user enabled the skill.
    SkillEnabled,
    /// The user disabled the skill.
    SkillDisabled,
    /// The platform closed the session.
    SessionEnded,
    /// A request type this engine does not handle.
    Unsupported,
}

/// Second-level routing of an intent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentKind {
    /// Begin or start over: go to the start node.
    Begin,
    /// Stop or cancel: play the stop node.
    Stop,
    /// Repeat the current node.
    Resume,
    /// Play the help node, then re-prompt the current node.
    Help,
    /// Explicit "didn't understand".
    Fallback,
    /// Anything else; looked up among the current node's routes.
    Route(String),
}

impl IntentKind {
    /// Classifies an intent name. Matching is case-insensitive.
    #[must_use]
    pub fn classify(intent_name: &str) -> Self {
        let is = |name: &str| intent_name.eq_ignore_ascii_case(name);

        if is(BEGIN_INTENT) || is(START_OVER_INTENT) {
            Self::Begin
        } else if is(STOP_INTENT) || is(CANCEL_INTENT) {
            Self::Stop
        } else if is(RESUME_INTENT) {
            Self::Resume
        } else if is(HELP_INTENT) {
            Self::Help
        } else if is(FALLBACK_INTENT) {
            Self::Fallback
        } else {
            Self::Route(intent_name.to_owned())
        }
    }
}
