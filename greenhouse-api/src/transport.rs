use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::message::{ConnectionStatus, Message, MessageType};

pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

pub type StatusHandler = Arc<dyn Fn(ConnectionStatus) + Send + Sync>;

/// Publish/subscribe link between the dashboard and the greenhouse.
///
/// Handlers are invoked from the transport's own tasks and must not call
/// `connect` or `disconnect` themselves.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start connecting. Resolves once the connection sequence is scheduled;
    /// status changes are reported through the status handler.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Register the handler for one message type, replacing any previous one
    fn on_message(&self, kind: MessageType, handler: MessageHandler);

    /// Register the single connection status observer
    fn on_connection_status_change(&self, handler: StatusHandler);

    /// Fire-and-forget send
    fn send_message(&self, message: Message) -> Result<(), TransportError>;

    /// Cancel all pending work and report `disconnected`. Safe to call repeatedly.
    fn disconnect(&self);

    /// Last reported connection status
    fn status(&self) -> ConnectionStatus;
}
