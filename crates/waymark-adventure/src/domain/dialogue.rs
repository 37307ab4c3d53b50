//! The dialogue state machine.
//!
//! A session is either on a named node or "not started". Given the current
//! node and a classified intent, [`DialogueEngine::apply`] decides where the
//! session goes next and what to say. It performs no I/O; loading the graph
//! and persisting the position is the application layer's job.

use tracing::warn;
use waymark_core::error::DomainError;

use super::adventure::{Adventure, AdventureNode, NodeRole};
use super::request::IntentKind;
use super::response::{SkillResponse, merge_node_responses, node_response};
use super::speech::RenderContext;

/// Spoken on launch when there is nothing to resume.
pub const WELCOME_TEXT: &str =
    "Welcome to the adventure. When you are ready to start the adventure, say begin.";
/// Reprompt for [`WELCOME_TEXT`].
pub const WELCOME_REPROMPT: &str = "Say begin when you're ready to begin.";
/// Card title for [`WELCOME_TEXT`].
pub const WELCOME_TITLE: &str = "Welcome to the Adventure";
/// Spoken on launch when the stored node still offers choices.
pub const RESUME_TEXT: &str =
    "Welcome back! You have an adventure in progress. Would you like to resume or restart?";
/// Reprompt for [`RESUME_TEXT`].
pub const RESUME_REPROMPT: &str = "You can resume or restart.";
/// Card title for [`RESUME_TEXT`].
pub const RESUME_TITLE: &str = "Welcome Back to the Adventure";

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// What to say.
    pub response: SkillResponse,
    /// Canonical name of the node to move to; `None` means stay put.
    pub next_node: Option<String>,
}

impl Transition {
    fn stay(response: SkillResponse) -> Self {
        Self {
            response,
            next_node: None,
        }
    }

    fn advance(response: SkillResponse, node: &AdventureNode) -> Self {
        Self {
            response,
            next_node: Some(node.name.clone()),
        }
    }
}

/// Computes transitions over one loaded adventure.
#[derive(Debug, Clone, Copy)]
pub struct DialogueEngine<'a> {
    adventure: &'a Adventure,
    ctx: RenderContext<'a>,
}

impl<'a> DialogueEngine<'a> {
    /// Creates an engine that renders audio against `media_base_path`.
    #[must_use]
    pub fn new(adventure: &'a Adventure, media_base_path: &'a str) -> Self {
        Self {
            adventure,
            ctx: RenderContext::new(media_base_path, adventure.voice_id()),
        }
    }

    /// Resolves a stored node name against the graph.
    ///
    /// A name that no longer resolves (the adventure was edited) degrades to
    /// "no current node".
    #[must_use]
    pub fn current_node(&self, stored_name: Option<&str>) -> Option<&'a AdventureNode> {
        let name = stored_name.map(str::trim).filter(|n| !n.is_empty())?;
        let node = self.adventure.node(name);
        if node.is_none() {
            warn!(
                adventure_id = self.adventure.id(),
                node_name = name,
                "stored position no longer exists in adventure, treating session as not started"
            );
        }
        node
    }

    /// Builds the launch prompt. Never moves the session.
    #[must_use]
    pub fn launch(&self, current: Option<&AdventureNode>) -> SkillResponse {
        if current.is_some_and(AdventureNode::has_routes) {
            SkillResponse::prompting(RESUME_TEXT, RESUME_REPROMPT).titled(RESUME_TITLE)
        } else {
            SkillResponse::prompting(WELCOME_TEXT, WELCOME_REPROMPT).titled(WELCOME_TITLE)
        }
    }

    /// Applies `intent` to the session sitting on `current`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the role node the intent
    /// needs (start, stop, help or unknown) is missing or does not resolve.
    pub fn apply(
        &self,
        intent: &IntentKind,
        current: Option<&AdventureNode>,
    ) -> Result<Transition, DomainError> {
        match intent {
            IntentKind::Begin => {
                let start = self.adventure.required_role_node(NodeRole::Start)?;
                Ok(Transition::advance(node_response(start, self.ctx), start))
            }
            IntentKind::Stop => {
                let stop = self.adventure.required_role_node(NodeRole::Stop)?;
                Ok(Transition::stay(
                    node_response(stop, self.ctx).ending_session(),
                ))
            }
            IntentKind::Resume => match current {
                Some(node) => Ok(Transition::stay(node_response(node, self.ctx))),
                None => self.fallback(None),
            },
            IntentKind::Help => {
                let help = self.adventure.required_role_node(NodeRole::Help)?;
                Ok(Transition::stay(merge_node_responses(
                    help, current, self.ctx,
                )))
            }
            IntentKind::Fallback => self.fallback(current),
            IntentKind::Route(intent_name) => self.follow_route(intent_name, current),
        }
    }

    fn follow_route(
        &self,
        intent_name: &str,
        current: Option<&AdventureNode>,
    ) -> Result<Transition, DomainError> {
        let Some(node) = current else {
            warn!(intent = intent_name, "no current node, cannot route intent");
            return self.fallback(None);
        };

        let Some(route) = node.route_for(intent_name) else {
            warn!(
                intent = intent_name,
                node_name = %node.name,
                "no route for intent on current node"
            );
            return self.fallback(current);
        };

        let next_name = route.next_node.trim();
        if next_name.is_empty() {
            warn!(
                intent = intent_name,
                node_name = %node.name,
                "route has no destination node"
            );
            return self.fallback(current);
        }

        match self.adventure.node(next_name) {
            Some(next) => Ok(Transition::advance(node_response(next, self.ctx), next)),
            None => {
                warn!(
                    intent = intent_name,
                    node_name = %node.name,
                    next_node = next_name,
                    "route destination not found"
                );
                self.fallback(current)
            }
        }
    }

    fn fallback(&self, current: Option<&AdventureNode>) -> Result<Transition, DomainError> {
        let unknown = self.adventure.required_role_node(NodeRole::Unknown)?;
        Ok(Transition::stay(merge_node_responses(
            unknown, current, self.ctx,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::adventure::AdventureDefinition;
    use crate::domain::fixtures;

    const MEDIA: &str = "https://cdn.test/lighthouse";

    fn route(name: &str) -> IntentKind {
        IntentKind::Route(name.to_owned())
    }

    #[test]
    fn test_begin_moves_to_start_node() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        // Act
        let transition = engine.apply(&IntentKind::Begin, None).unwrap();

        // Assert
        assert_eq!(transition.next_node.as_deref(), Some("shore"));
        assert!(transition.response.speech().unwrap().contains("cold shore"));
        assert!(!transition.response.ends_session());
    }

    #[test]
    fn test_route_intent_moves_to_destination_and_speaks_it() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);
        let shore = adventure.node("shore");

        // Act
        let transition = engine.apply(&route("walknorthintent"), shore).unwrap();

        // Assert
        assert_eq!(transition.next_node.as_deref(), Some("lighthouse"));
        let expected = node_response(
            adventure.node("lighthouse").unwrap(),
            RenderContext::new(MEDIA, adventure.voice_id()),
        );
        assert_eq!(transition.response, expected);
    }

    #[test]
    fn test_unmatched_route_merges_unknown_with_current_reprompt() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);
        let shore = adventure.node("shore");

        // Act
        let transition = engine.apply(&route("DanceIntent"), shore).unwrap();

        // Assert
        assert_eq!(transition.next_node, None);
        let speech = transition.response.speech().unwrap();
        assert!(speech.contains("I didn't catch that."));
        assert!(speech.contains("Do you walk north or climb the cliff?"));
        assert!(
            transition
                .response
                .reprompt_speech()
                .unwrap()
                .contains("Do you walk north or climb the cliff?")
        );
        assert!(!transition.response.ends_session());
    }

    #[test]
    fn test_help_merges_help_with_current_reprompt_and_stays() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);
        let shore = adventure.node("shore");

        // Act
        let transition = engine.apply(&IntentKind::Help, shore).unwrap();

        // Assert
        assert_eq!(transition.next_node, None);
        let speech = transition.response.speech().unwrap();
        assert!(speech.starts_with("<speak><voice name=\"Joanna\">Say a direction"));
        assert!(speech.contains("Do you walk north or climb the cliff?"));
        assert!(!transition.response.ends_session());
    }

    #[test]
    fn test_help_without_current_node_ends_session() {
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        let transition = engine.apply(&IntentKind::Help, None).unwrap();

        assert!(transition.response.ends_session());
        assert!(transition.response.reprompt_speech().is_none());
    }

    #[test]
    fn test_stop_plays_stop_node_and_always_ends_session() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        for current in [None, adventure.node("shore"), adventure.node("lighthouse")] {
            // Act
            let transition = engine.apply(&IntentKind::Stop, current).unwrap();

            // Assert
            assert_eq!(transition.next_node, None);
            assert!(transition.response.speech().unwrap().contains("Farewell"));
            assert!(transition.response.ends_session());
            assert!(transition.response.reprompt_speech().is_none());
        }
    }

    #[test]
    fn test_resume_is_idempotent() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);
        let cliff = adventure.node("cliff");

        // Act
        let first = engine.apply(&IntentKind::Resume, cliff).unwrap();
        let second = engine.apply(&IntentKind::Resume, cliff).unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(first.next_node, None);
    }

    #[test]
    fn test_intent_without_current_node_merges_unknown_alone() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        // Act
        let resumed = engine.apply(&IntentKind::Resume, None).unwrap();
        let routed = engine.apply(&route("WalkNorthIntent"), None).unwrap();

        // Assert
        for transition in [resumed, routed] {
            assert_eq!(transition.next_node, None);
            assert_eq!(
                transition.response.speech(),
                Some("<speak><voice name=\"Joanna\">I didn't catch that.</voice></speak>")
            );
            assert!(transition.response.ends_session());
        }
    }

    #[test]
    fn test_route_to_missing_destination_falls_back_and_stays() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);
        let lighthouse = adventure.node("lighthouse");

        // Act
        let transition = engine.apply(&route("OpenTrapdoorIntent"), lighthouse).unwrap();

        // Assert
        assert_eq!(transition.next_node, None);
        assert!(transition.response.speech().unwrap().contains("I didn't catch that."));
    }

    #[test]
    fn test_missing_role_node_is_configuration_error() {
        // Arrange
        let definition = AdventureDefinition {
            id: "broken".to_owned(),
            voice_id: None,
            start_node: Some("nowhere".to_owned()),
            stop_node: None,
            help_node: None,
            unknown_node: None,
            nodes: Vec::new(),
        };
        let adventure = Adventure::try_from(definition).unwrap();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        // Act / Assert
        for intent in [
            IntentKind::Begin,
            IntentKind::Stop,
            IntentKind::Help,
            IntentKind::Fallback,
        ] {
            let result = engine.apply(&intent, None);
            assert!(
                matches!(result, Err(DomainError::GraphConfiguration(_))),
                "{intent:?} should fail"
            );
        }
    }

    #[test]
    fn test_current_node_degrades_stale_name_to_none() {
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        assert!(engine.current_node(Some("demolished-pier")).is_none());
        assert!(engine.current_node(Some("  ")).is_none());
        assert!(engine.current_node(None).is_none());
        assert_eq!(engine.current_node(Some("Shore")).unwrap().name, "shore");
    }

    #[test]
    fn test_launch_prompts_resume_only_when_current_node_has_routes() {
        // Arrange
        let adventure = fixtures::lighthouse();
        let engine = DialogueEngine::new(&adventure, MEDIA);

        // Act
        let fresh = engine.launch(None);
        let mid_story = engine.launch(adventure.node("shore"));
        let at_ending = engine.launch(adventure.node("goodbye"));

        // Assert
        assert_eq!(fresh.speech(), Some(WELCOME_TEXT));
        assert_eq!(mid_story.speech(), Some(RESUME_TEXT));
        assert_eq!(mid_story.reprompt_speech(), Some(RESUME_REPROMPT));
        assert_eq!(at_ending.speech(), Some(WELCOME_TEXT));
        assert!(!fresh.ends_session());
    }
}
