pub mod classify;
pub mod error;
pub mod message;
pub mod models;
pub mod transport;

pub use classify::classify;
pub use error::{MessageError, TransportError};
pub use message::{ConnectionStatus, Message, MessageType};
pub use models::*;
pub use transport::{MessageHandler, StatusHandler, Transport};
