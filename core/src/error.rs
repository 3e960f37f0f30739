#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message {index} has unknown msg_type '{kind}'")]
    UnknownKind { index: usize, kind: String },
    #[error("message {index} is a text message without msg_content.text")]
    MissingText { index: usize },
    #[error("message {index} has a non-finite position")]
    InvalidPosition { index: usize },
}
