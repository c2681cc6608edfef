use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TypewriterError {
    /// The script list has no entries.
    EmptyScript,
    /// A script entry is the empty string.
    EmptyScriptEntry { index: usize },
    /// A timing value is zero, negative, or not finite.
    InvalidTiming { field: &'static str },
    /// The configuration could not be parsed.
    Config(String),
    /// The audio backend refused to create a context.
    AudioUnavailable(String),
    /// A DOM lookup or mutation failed.
    Dom(String),
    Io(String),
}

impl fmt::Display for TypewriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypewriterError::EmptyScript => write!(f, "Script list must contain at least one entry"),
            TypewriterError::EmptyScriptEntry { index } => {
                write!(f, "Script entry {index} is empty")
            }
            TypewriterError::InvalidTiming { field } => {
                write!(f, "Timing value '{field}' must be a positive finite number")
            }
            TypewriterError::Config(e) => write!(f, "Config error: {e}"),
            TypewriterError::AudioUnavailable(e) => write!(f, "Audio unavailable: {e}"),
            TypewriterError::Dom(e) => write!(f, "DOM error: {e}"),
            TypewriterError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TypewriterError {}

impl From<serde_json::Error> for TypewriterError {
    fn from(e: serde_json::Error) -> Self {
        TypewriterError::Config(e.to_string())
    }
}

impl From<std::io::Error> for TypewriterError {
    fn from(e: std::io::Error) -> Self {
        TypewriterError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_entry() {
        let e = TypewriterError::EmptyScriptEntry { index: 3 };
        assert_eq!(e.to_string(), "Script entry 3 is empty");
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: TypewriterError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, TypewriterError::Config(_)));
    }
}
