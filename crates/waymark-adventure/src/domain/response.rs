//! Outbound response envelope and the builders that assemble it.

use serde::{Deserialize, Serialize};

use super::adventure::AdventureNode;
use super::speech::{RenderContext, render_speech};

/// Envelope version stamped on every response.
pub const RESPONSE_VERSION: &str = "1.0";

/// Spoken output, either plain text or SSML markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    /// Plain text.
    PlainText {
        /// The text to speak.
        text: String,
    },
    /// SSML markup.
    #[serde(rename = "SSML")]
    Ssml {
        /// The markup to speak.
        ssml: String,
    },
}

impl OutputSpeech {
    /// Returns the text or markup regardless of kind.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
            Self::Ssml { ssml } => ssml,
        }
    }
}

/// A simple card shown in the companion app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Always `"Simple"`.
    #[serde(rename = "type")]
    pub card_type: String,
    /// Card heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Card body.
    pub content: String,
}

impl Card {
    /// Builds a simple card.
    #[must_use]
    pub fn simple(title: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            card_type: "Simple".to_owned(),
            title: title.map(str::to_owned),
            content: content.into(),
        }
    }
}

/// Speech played when the user does not answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    /// The reprompt speech.
    pub output_speech: OutputSpeech,
}

/// Body of a response. Every section is optional so an empty body doubles as
/// an acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    /// Spoken output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    /// Companion card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Reprompt section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    /// Whether this turn ends the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

/// The outbound response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResponse {
    /// Envelope version tag.
    pub version: String,
    /// Response body.
    pub response: ResponseBody,
}

impl SkillResponse {
    fn with_body(response: ResponseBody) -> Self {
        Self {
            version: RESPONSE_VERSION.to_owned(),
            response,
        }
    }

    /// An empty acknowledgement, used for pings and lifecycle events.
    #[must_use]
    pub fn acknowledgement() -> Self {
        Self::with_body(ResponseBody::default())
    }

    /// Speaks `text`, shows it on a card and ends the session.
    #[must_use]
    pub fn simple(text: &str) -> Self {
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::PlainText {
                text: text.to_owned(),
            }),
            card: Some(Card::simple(None, text)),
            reprompt: None,
            should_end_session: Some(true),
        })
    }

    /// Speaks `text`, shows it on a card and keeps the session open with
    /// `reprompt_text`.
    #[must_use]
    pub fn prompting(text: &str, reprompt_text: &str) -> Self {
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::PlainText {
                text: text.to_owned(),
            }),
            card: Some(Card::simple(None, text)),
            reprompt: Some(Reprompt {
                output_speech: OutputSpeech::PlainText {
                    text: reprompt_text.to_owned(),
                },
            }),
            should_end_session: Some(false),
        })
    }

    /// Sets the card title.
    #[must_use]
    pub fn titled(mut self, title: &str) -> Self {
        if let Some(card) = self.response.card.as_mut() {
            card.title = Some(title.to_owned());
        }
        self
    }

    /// Forces the session to end regardless of any reprompt.
    #[must_use]
    pub fn ending_session(mut self) -> Self {
        self.response.reprompt = None;
        self.response.should_end_session = Some(true);
        self
    }

    /// Returns the spoken output text or markup, if any.
    #[must_use]
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(OutputSpeech::content)
    }

    /// Returns the reprompt text or markup, if any.
    #[must_use]
    pub fn reprompt_speech(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|r| r.output_speech.content())
    }

    /// Returns `true` unless the response explicitly keeps the session open.
    #[must_use]
    pub fn ends_session(&self) -> bool {
        self.response.should_end_session.unwrap_or(true)
    }
}

fn ssml(markup: String) -> OutputSpeech {
    OutputSpeech::Ssml { ssml: markup }
}

/// Renders a node's own content: its output speech, plus its reprompt when it
/// has one. The session stays open only while there is something to reprompt.
#[must_use]
pub fn node_response(node: &AdventureNode, ctx: RenderContext<'_>) -> SkillResponse {
    let reprompt = (!node.reprompt.is_empty()).then(|| Reprompt {
        output_speech: ssml(render_speech(&node.reprompt, ctx)),
    });
    let should_end_session = reprompt.is_none();

    SkillResponse::with_body(ResponseBody {
        output_speech: Some(ssml(render_speech(&node.output_speech, ctx))),
        card: None,
        reprompt,
        should_end_session: Some(should_end_session),
    })
}

/// Lets `primary` interrupt without losing the caller's place.
///
/// Spoken output is `primary`'s output speech followed by `secondary`'s
/// reprompt. When `secondary` has a reprompt it also becomes the response's
/// reprompt and the session continues; otherwise the session ends.
#[must_use]
pub fn merge_node_responses(
    primary: &AdventureNode,
    secondary: Option<&AdventureNode>,
    ctx: RenderContext<'_>,
) -> SkillResponse {
    let secondary_reprompt = secondary.map(|n| n.reprompt.as_slice()).unwrap_or_default();
    let spoken = render_speech(
        primary.output_speech.iter().chain(secondary_reprompt),
        ctx,
    );

    let reprompt = (!secondary_reprompt.is_empty()).then(|| Reprompt {
        output_speech: ssml(render_speech(secondary_reprompt, ctx)),
    });
    let should_end_session = reprompt.is_none();

    SkillResponse::with_body(ResponseBody {
        output_speech: Some(ssml(spoken)),
        card: None,
        reprompt,
        should_end_session: Some(should_end_session),
    })
}
