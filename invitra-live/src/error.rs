use invitra_render::RenderError;
use thiserror::Error;
use uuid::Uuid;

pub type LiveResult<T> = Result<T, LiveError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiveError {
    #[error("No authentication token; refusing to open a generation channel")]
    MissingCredential,

    #[error("Generation {generation_id} already has a live channel")]
    ChannelBusy { generation_id: Uuid },

    #[error("Channel for generation {generation_id} is closed")]
    ChannelClosed { generation_id: Uuid },

    #[error("Site generation failed: {reason}")]
    SubmissionFailed { reason: String },

    #[error("Generation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<serde_yaml::Error> for LiveError {
    fn from(err: serde_yaml::Error) -> Self {
        LiveError::Config(err.to_string())
    }
}
