//! Recognition languages offered to callers.

/// One selectable recognition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// BCP 47 tag handed to the recognizer.
    pub code: &'static str,
    /// Language name handed to the summarizer as a hint.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        code: "en-US",
        name: "English",
        label: "English (US)",
    },
    Language {
        code: "en-GB",
        name: "English",
        label: "English (UK)",
    },
    Language {
        code: "en-IN",
        name: "English",
        label: "English (India)",
    },
    Language {
        code: "hi-IN",
        name: "Hindi",
        label: "Hindi",
    },
    Language {
        code: "kn-IN",
        name: "Kannada",
        label: "Kannada",
    },
];

/// Looks up a language by its BCP 47 tag.
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|language| language.code == code)
}
