use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Event title must not be empty")]
    EmptyTitle,

    #[error("RSVP is enabled but only {provided} option(s) given; at least {minimum} required")]
    RsvpOptionsBelowMinimum { provided: usize, minimum: usize },

    #[error("RSVP option {index} is a protected default and cannot be removed")]
    ProtectedRsvpOption { index: usize },

    #[error("RSVP option {index} must not be empty")]
    EmptyRsvpOption { index: usize },

    #[error("RSVP option index {index} is out of bounds (len {len})")]
    RsvpOptionOutOfBounds { index: usize, len: usize },

    #[error("Invalid color value '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Value out of range for '{field}': {value}. Expected range: {range}")]
    ValueOutOfRange {
        field: String,
        value: String,
        range: String,
    },

    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Empty value for field '{field}'")]
    EmptyField { field: String },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Formatting error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::fmt::Error> for RenderError {
    fn from(e: std::fmt::Error) -> Self {
        RenderError::Format(e.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(e: serde_yaml::Error) -> Self {
        RenderError::YamlError(e.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::JsonError(e.to_string())
    }
}
