//! Intent resolution: explicit mode labels and keyword inference.
//!
//! DESIGN
//! ======
//! Clients may send an explicit mode label. When they send none (or
//! `"Default"`), an [`IntentClassifier`] picks one from the message text.
//! The classifier is a trait object in `AppState` so the vocabulary can be
//! tuned or replaced without touching the dispatcher.
//!
//! TRADE-OFFS
//! ==========
//! Keyword rules are substring matches checked in order, so overlapping
//! vocabulary resolves to the earliest rule ("create a search page" is an
//! image request). Cheap and predictable, not accurate.

use regex::Regex;
use tracing::debug;

use crate::providers::types::{Capability, SearchMode};

/// What a message is routed to. `AnalyzeFile` composes over chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Image,
    Search(SearchMode),
    AnalyzeFile,
}

impl Mode {
    /// The label clients use for this mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "Default",
            Self::Image => "Generate Image",
            Self::Search(SearchMode::Web) => "Web Search",
            Self::Search(SearchMode::Research) => "Research",
            Self::AnalyzeFile => "Analyze Files",
        }
    }

    /// The dispatcher capability behind this mode.
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::Chat | Self::AnalyzeFile => Capability::Chat,
            Self::Image => Capability::Image,
            Self::Search(_) => Capability::Search,
        }
    }

    /// Parse an explicit client label. `None` means "infer from content":
    /// absent, blank, or `"Default"`. Unrecognised labels route to chat.
    #[must_use]
    pub fn parse_explicit(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        match raw.to_ascii_lowercase().as_str() {
            "default" => None,
            "chat" => Some(Self::Chat),
            "generate image" | "image" => Some(Self::Image),
            "web search" | "search" | "web" => Some(Self::Search(SearchMode::Web)),
            "research" => Some(Self::Search(SearchMode::Research)),
            "analyze files" | "analyze" => Some(Self::AnalyzeFile),
            other => {
                debug!(mode = other, "intent: unknown mode label, routing to chat");
                Some(Self::Chat)
            }
        }
    }
}

/// Replaceable strategy that picks a mode from free text.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Mode;
}

/// Resolve the mode for a message: explicit label first, then `classifier`.
#[must_use]
pub fn resolve_mode(explicit: Option<&str>, text: &str, classifier: &dyn IntentClassifier) -> Mode {
    Mode::parse_explicit(explicit).unwrap_or_else(|| classifier.classify(text))
}

// =============================================================================
// KEYWORD CLASSIFIER
// =============================================================================

const IMAGE_WORDS: &[&str] = &["generate", "draw", "create", "image", "picture", "illustration"];
const ANALYZE_WORDS: &[&str] = &["analyze", "summarize", "check tone", "extract"];
const SEARCH_WORDS: &[&str] = &["search", "find", "look up", "what is", "who is", "how to"];

/// Ordered keyword rules; the first matching rule wins, chat otherwise.
pub struct KeywordClassifier {
    rules: Vec<(Regex, Mode)>,
}

impl KeywordClassifier {
    /// Build from `(words, mode)` pairs. Words match case-insensitively
    /// anywhere in the text.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule compiles to an oversized regex.
    pub fn from_vocabulary(vocabulary: &[(&[&str], Mode)]) -> Result<Self, regex::Error> {
        let rules = vocabulary
            .iter()
            .filter(|(words, _)| !words.is_empty())
            .map(|(words, mode)| {
                let alternation = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!("(?i){alternation}")).map(|re| (re, *mode))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Image, then file analysis, then web search.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in vocabulary fails to compile.
    pub fn standard() -> Result<Self, regex::Error> {
        Self::from_vocabulary(&[
            (IMAGE_WORDS, Mode::Image),
            (ANALYZE_WORDS, Mode::AnalyzeFile),
            (SEARCH_WORDS, Mode::Search(SearchMode::Web)),
        ])
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Mode {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map_or(Mode::Chat, |(_, mode)| *mode)
    }
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
