use crate::message::MessageType;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("No async runtime available: {0}")]
    Runtime(String),

    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Transport closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Expected {expected:?} message, got {actual:?}")]
    UnexpectedType {
        expected: MessageType,
        actual: MessageType,
    },

    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Envelope zone {envelope} does not match payload zone {payload}")]
    ZoneMismatch { envelope: String, payload: String },
}
