//! Label result value object and tag-token decoder

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Value used for classification fields the backend did not report
pub const UNKNOWN_LABEL: &str = "unknown";

/// Matches `<|token|>` and captures the token body
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|(.*?)\|>").expect("tag pattern is a valid regex"));

/// Classification slot a known tag token is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelField {
    Language,
    Emotion,
    Kind,
    Speaker,
}

impl LabelField {
    /// Fixed token table. Anything else is treated as transcript text.
    fn for_token(token: &str) -> Option<Self> {
        match token {
            "en" => Some(Self::Language),
            "EMO_UNKNOWN" => Some(Self::Emotion),
            "Speech" => Some(Self::Kind),
            "woitn" => Some(Self::Speaker),
            _ => None,
        }
    }
}

/// Structured form of the backend's tagged `label_result` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResult {
    #[serde(rename = "lan")]
    pub language: String,
    #[serde(rename = "emo")]
    pub emotion: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub speaker: String,
    pub text: String,
}

impl Default for LabelResult {
    fn default() -> Self {
        Self {
            language: UNKNOWN_LABEL.to_string(),
            emotion: UNKNOWN_LABEL.to_string(),
            kind: UNKNOWN_LABEL.to_string(),
            speaker: UNKNOWN_LABEL.to_string(),
            text: String::new(),
        }
    }
}

impl LabelResult {
    /// Decode a tagged backend string.
    ///
    /// Known tokens are lowercased into their field, last occurrence wins.
    /// Any other non-blank token, and any non-blank text that follows a
    /// token, becomes the transcript; again the last candidate wins and
    /// earlier ones are dropped. Text before the first token is ignored,
    /// so a string without tokens decodes to the defaults.
    pub fn decode(raw: &str) -> Self {
        let mut result = Self::default();
        let mut cursor: Option<usize> = None;

        for caps in TAG_PATTERN.captures_iter(raw) {
            let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if let Some(start) = cursor {
                result.apply_free_text(&raw[start..whole.start()]);
            }
            result.apply_token(token.as_str());
            cursor = Some(whole.end());
        }

        if let Some(start) = cursor {
            result.apply_free_text(&raw[start..]);
        }

        result
    }

    fn apply_token(&mut self, token: &str) {
        match LabelField::for_token(token) {
            Some(field) => {
                let value = token.to_lowercase();
                match field {
                    LabelField::Language => self.language = value,
                    LabelField::Emotion => self.emotion = value,
                    LabelField::Kind => self.kind = value,
                    LabelField::Speaker => self.speaker = value,
                }
            }
            None if !token.trim().is_empty() => self.text = token.to_string(),
            None => {}
        }
    }

    fn apply_free_text(&mut self, segment: &str) {
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            self.text = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_label_header() {
        let result = LabelResult::decode("<|en|><|EMO_UNKNOWN|><|Speech|><|woitn|>hello world");

        assert_eq!(result.language, "en");
        assert_eq!(result.emotion, "emo_unknown");
        assert_eq!(result.kind, "speech");
        assert_eq!(result.speaker, "woitn");
        assert_eq!(result.text, "hello world");
    }

    #[test]
    fn serializes_with_short_field_names() {
        let result = LabelResult::decode("<|en|><|EMO_UNKNOWN|><|Speech|><|woitn|>hello world");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "lan": "en",
                "emo": "emo_unknown",
                "type": "speech",
                "speaker": "woitn",
                "text": "hello world"
            })
        );
    }

    #[test]
    fn no_tokens_yields_defaults() {
        let once = LabelResult::decode("just some words");
        assert_eq!(once, LabelResult::default());
        assert_eq!(once.language, "unknown");
        assert_eq!(once.text, "");

        let twice = LabelResult::decode("just some words");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(LabelResult::decode(""), LabelResult::default());
    }

    #[test]
    fn unmapped_token_becomes_text() {
        let result = LabelResult::decode("<|en|><|good morning|>");
        assert_eq!(result.language, "en");
        assert_eq!(result.text, "good morning");
    }

    #[test]
    fn last_text_candidate_wins() {
        let result = LabelResult::decode("<|first|><|second|>");
        assert_eq!(result.text, "second");

        let result = LabelResult::decode("<|en|>one<|Speech|>two");
        assert_eq!(result.text, "two");
        assert_eq!(result.kind, "speech");
    }

    #[test]
    fn repeated_known_token_overwrites() {
        let result = LabelResult::decode("<|en|><|Speech|><|en|>");
        assert_eq!(result.language, "en");
        assert_eq!(result.kind, "speech");
    }

    #[test]
    fn blank_tokens_are_ignored() {
        let result = LabelResult::decode("<|en|><||><| |>");
        assert_eq!(result.language, "en");
        assert_eq!(result.text, "");
    }

    #[test]
    fn token_match_is_case_sensitive() {
        let result = LabelResult::decode("<|EN|>");
        assert_eq!(result.language, "unknown");
        assert_eq!(result.text, "EN");
    }

    #[test]
    fn text_before_first_token_is_ignored() {
        let result = LabelResult::decode("preamble <|en|>");
        assert_eq!(result.language, "en");
        assert_eq!(result.text, "");
    }
}
