use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandingError {
    #[error("element not found: {0}")]
    MissingElement(&'static str),
    #[error("failed to parse landing config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid landing config: {0}")]
    InvalidConfig(String),
    #[error("dom error: {0}")]
    Dom(String),
}
