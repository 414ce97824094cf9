use std::fmt;

/// Reply language selected by the request's `language` code.
///
/// Only Malayalam has its own flow; every other code is served in English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Malayalam,
}

impl Language {
    /// Parse a request language code. Accepts region suffixes ("ml-IN").
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ml" => Self::Malayalam,
            _ => Self::English,
        }
    }

    /// ISO 639-1 code used for the translation and speech providers
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Malayalam => "ml",
        }
    }

    /// Whether user text is translated into this language before the chat call
    pub fn requires_translation(&self) -> bool {
        matches!(self, Self::Malayalam)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
