use thiserror::Error;

#[derive(Error, Debug)]
pub enum BigramError {
    /// A file could not be turned into a score model. The batch driver
    /// treats this as per-file: skip, warn, continue.
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A selected voice has no events, so neither the last offset nor the
    /// initial running state can be established.
    #[error("Voice '{voice}' has no events")]
    EmptyVoice { voice: &'static str },

    /// Invalid run configuration (bad YAML, non-positive resolution, ...).
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
