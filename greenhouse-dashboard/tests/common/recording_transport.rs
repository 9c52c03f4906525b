use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use greenhouse_api::{
    ConnectionStatus, Message, MessageHandler, MessageType, StatusHandler, Transport,
    TransportError,
};

/// Transport that keeps every sent message and lets a test play the remote side.
pub struct RecordingTransport {
    handlers: Mutex<HashMap<MessageType, MessageHandler>>,
    observer: Mutex<Option<StatusHandler>>,
    status: Mutex<ConnectionStatus>,
    sent: Mutex<Vec<Message>>,
    fail_connect: bool,
    fail_send: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            observer: Mutex::new(None),
            status: Mutex::new(ConnectionStatus::Disconnected),
            sent: Mutex::new(Vec::new()),
            fail_connect: false,
            fail_send: false,
        }
    }

    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::new()
        }
    }

    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::new()
        }
    }

    /// Hand `message` to the handler registered for its type.
    pub fn deliver(&self, message: Message) {
        let handler = self.handlers.lock().unwrap().get(&message.kind).cloned();
        if let Some(handler) = handler {
            handler(message);
        }
    }

    pub fn report(&self, status: ConnectionStatus) {
        *self.status.lock().unwrap() = status;
        let observer = self.observer.lock().unwrap().clone();
        if let Some(observer) = observer {
            observer(status);
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_of(&self, kind: MessageType) -> Vec<Message> {
        self.sent()
            .into_iter()
            .filter(|message| message.kind == kind)
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        if self.fail_connect {
            return Err(TransportError::Runtime("link unavailable".to_string()));
        }

        self.report(ConnectionStatus::Connected);
        Ok(())
    }

    fn on_message(&self, kind: MessageType, handler: MessageHandler) {
        self.handlers.lock().unwrap().insert(kind, handler);
    }

    fn on_connection_status_change(&self, handler: StatusHandler) {
        *self.observer.lock().unwrap() = Some(handler);
    }

    fn send_message(&self, message: Message) -> Result<(), TransportError> {
        if self.fail_send {
            return Err(TransportError::Closed);
        }

        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn disconnect(&self) {
        let previous = std::mem::replace(
            &mut *self.status.lock().unwrap(),
            ConnectionStatus::Disconnected,
        );
        if previous != ConnectionStatus::Disconnected {
            self.report(ConnectionStatus::Disconnected);
        }
    }

    fn status(&self) -> ConnectionStatus {
        *self.status.lock().unwrap()
    }
}
