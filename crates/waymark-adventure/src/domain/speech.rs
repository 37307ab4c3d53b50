//! Speech fragments and SSML rendering.

use serde::{Deserialize, Serialize};

/// An atomic piece of renderable content embedded in a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechFragment {
    /// Plain text, spoken in the adventure's voice.
    Text {
        /// The words to speak.
        text: String,
    },
    /// An audio clip stored under the media base path.
    Audio {
        /// File name relative to the `audio/` folder of the media base path.
        file: String,
    },
}

impl SpeechFragment {
    /// Convenience constructor for a text fragment.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Convenience constructor for an audio fragment.
    #[must_use]
    pub fn audio(file: impl Into<String>) -> Self {
        Self::Audio { file: file.into() }
    }
}

/// Everything needed to turn fragments into markup besides the fragments.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Base URL media references are resolved against.
    pub media_base_path: &'a str,
    /// Voice wrapped around text fragments, if any.
    pub voice_id: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// Creates a render context.
    #[must_use]
    pub fn new(media_base_path: &'a str, voice_id: Option<&'a str>) -> Self {
        Self {
            media_base_path,
            voice_id,
        }
    }
}

/// Resolves an audio file name into an absolute URL.
#[must_use]
pub fn media_url(media_base_path: &str, file: &str) -> String {
    format!(
        "{}/audio/{}",
        media_base_path.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

fn escape_xml(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Concatenates `fragments` in order and wraps them in `<speak>`.
///
/// Deterministic: identical inputs always produce identical markup.
#[must_use]
pub fn render_speech<'f, I>(fragments: I, ctx: RenderContext<'_>) -> String
where
    I: IntoIterator<Item = &'f SpeechFragment>,
{
    let mut out = String::from("<speak>");
    for fragment in fragments {
        match fragment {
            SpeechFragment::Text { text } => match ctx.voice_id {
                Some(voice) => {
                    out.push_str("<voice name=\"");
                    escape_xml(voice, &mut out);
                    out.push_str("\">");
                    escape_xml(text, &mut out);
                    out.push_str("</voice>");
                }
                None => escape_xml(text, &mut out),
            },
            SpeechFragment::Audio { file } => {
                let url = media_url(ctx.media_base_path, file);
                out.push_str("<audio src=\"");
                escape_xml(&url, &mut out);
                out.push_str("\"/>");
            }
        }
    }
    out.push_str("</speak>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://media.example.com/lighthouse/";

    #[test]
    fn test_render_concatenates_in_order() {
        // Arrange
        let fragments = vec![
            SpeechFragment::audio("waves.mp3"),
            SpeechFragment::text("You wake."),
            SpeechFragment::text(" It is cold."),
        ];

        // Act
        let ssml = render_speech(&fragments, RenderContext::new(BASE, None));

        // Assert
        assert_eq!(
            ssml,
            "<speak><audio src=\"https://media.example.com/lighthouse/audio/waves.mp3\"/>\
             You wake. It is cold.</speak>"
        );
    }

    #[test]
    fn test_render_wraps_text_in_voice() {
        let fragments = vec![SpeechFragment::text("Ahoy")];

        let ssml = render_speech(&fragments, RenderContext::new(BASE, Some("Joanna")));

        assert_eq!(ssml, "<speak><voice name=\"Joanna\">Ahoy</voice></speak>");
    }

    #[test]
    fn test_render_escapes_markup_characters() {
        let fragments = vec![SpeechFragment::text("Fish & <chips>")];

        let ssml = render_speech(&fragments, RenderContext::new(BASE, None));

        assert_eq!(ssml, "<speak>Fish &amp; &lt;chips&gt;</speak>");
    }

    #[test]
    fn test_render_of_no_fragments_is_empty_speak() {
        let ssml = render_speech(&Vec::new(), RenderContext::new(BASE, None));

        assert_eq!(ssml, "<speak></speak>");
    }

    #[test]
    fn test_media_url_normalises_slashes() {
        assert_eq!(
            media_url("https://cdn.test/adv", "/bell.mp3"),
            "https://cdn.test/adv/audio/bell.mp3"
        );
    }

    #[test]
    fn test_fragment_deserializes_from_tagged_form() {
        let json = serde_json::json!([
            { "type": "text", "text": "hello" },
            { "type": "audio", "file": "a.mp3" }
        ]);

        let fragments: Vec<SpeechFragment> = serde_json::from_value(json).unwrap();

        assert_eq!(
            fragments,
            vec![SpeechFragment::text("hello"), SpeechFragment::audio("a.mp3")]
        );
    }
}
