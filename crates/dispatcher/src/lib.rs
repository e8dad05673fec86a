pub mod handlers;

use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde_json::Value;
use shared::{
    domain::{NotificationKind, NotificationRequest},
    protocol::{ActionEnvelope, HostAction, HostActionKind},
};
use store::Store;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

pub use handlers::{ActionHandlers, HandlerError};

pub const DEFAULT_INBOUND_CAPACITY: usize = 256;

pub type InboundSender = mpsc::Sender<Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled(HostActionKind),
    /// Empty message or no action name.
    Ignored,
    Unknown(String),
    Failed(HostActionKind),
}

pub struct Dispatcher {
    handlers: ActionHandlers,
}

impl Dispatcher {
    pub fn new(handlers: ActionHandlers) -> Self {
        Self { handlers }
    }

    pub fn store(&self) -> &Arc<Store> {
        self.handlers.store()
    }

    /// Routes one message. Failures are contained here: logged, surfaced as
    /// a generic error notification and reported in the outcome.
    pub fn route(&self, raw: Value) -> DispatchOutcome {
        if is_falsy(&raw) {
            return DispatchOutcome::Ignored;
        }
        if !raw.is_object() {
            debug!("dropping message that is not a JSON object");
            return DispatchOutcome::Ignored;
        }
        let envelope: ActionEnvelope = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!(error = %err, "dropping message without an action envelope");
                return DispatchOutcome::Ignored;
            }
        };
        let Some(name) = envelope.action.filter(|name| !name.is_empty()) else {
            return DispatchOutcome::Ignored;
        };
        let kind = match name.parse::<HostActionKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(action = %name, "unknown NUI action");
                return DispatchOutcome::Unknown(name);
            }
        };

        let result = HostAction::decode(kind, envelope.data)
            .map_err(|source| HandlerError::InvalidPayload {
                action: kind,
                source,
            })
            .and_then(|action| self.handlers.handle(action));

        match result {
            Ok(()) => {
                debug!(action = %kind, "handled NUI action");
                DispatchOutcome::Handled(kind)
            }
            Err(err) => {
                error!(action = %kind, error = %err, "error handling NUI action");
                self.store().show_notification(NotificationRequest::new(
                    NotificationKind::Error,
                    "System Error",
                    "An unexpected error occurred",
                ));
                DispatchOutcome::Failed(kind)
            }
        }
    }

    pub async fn run<S>(self, inbound: S)
    where
        S: Stream<Item = Value>,
    {
        futures::pin_mut!(inbound);
        let mut routed = 0usize;
        while let Some(raw) = inbound.next().await {
            self.route(raw);
            routed += 1;
        }
        info!(routed, "inbound stream closed");
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Starts the dispatch loop on the current runtime. The returned sender is
/// the only way in, so nothing can be delivered before the loop exists.
pub fn spawn_dispatcher(
    dispatcher: Dispatcher,
    capacity: usize,
) -> (InboundSender, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(dispatcher.run(ReceiverStream::new(rx)));
    (tx, task)
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
