pub type TelescrollResult<T> = Result<T, TelescrollError>;

#[derive(thiserror::Error, Debug)]
pub enum TelescrollError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("playback error: {0}")]
    Playback(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("capture error: {0}")]
    Capture(String),

    #[error("export cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TelescrollError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
