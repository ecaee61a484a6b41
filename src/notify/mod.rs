//! Notification dispatch seam
//!
//! The ledger emits [`LedgerEvent`]s through the [`NotificationDispatcher`]
//! trait and never waits on delivery: dispatch must not block, and a
//! dispatch failure is logged by the ledger and swallowed, never surfaced
//! as an operation error.
//!
//! Three implementations ship with the crate:
//!
//! - [`LogDispatcher`] — writes events to the `log` facade; the default.
//! - [`ChannelDispatcher`] — hands events to a tokio mpsc channel whose
//!   receiver is owned by whatever consumer performs delivery (email, SMS,
//!   push). Sending on an unbounded channel never blocks.
//! - [`MemoryDispatcher`] — records events in memory; the test double the
//!   ledger's own tests use.

use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::LedgerEvent;

/// Failure to hand an event to the delivery side
///
/// Never propagated out of a ledger operation; the ledger logs it at `warn`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The consumer side of the channel is gone
    #[error("notification channel closed")]
    ChannelClosed,
}

/// Fire-and-forget event sink the ledger emits into
pub trait NotificationDispatcher: Send + Sync {
    /// Hand an event to the delivery side without blocking
    fn dispatch(&self, event: LedgerEvent) -> Result<(), DispatchError>;
}

/// Dispatcher that writes events to the `log` facade
///
/// Useful as a default when no delivery consumer is wired up.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&self, event: LedgerEvent) -> Result<(), DispatchError> {
        log::info!(
            "ledger event {:?} for store {}: {}",
            event.kind,
            event.store_id,
            event.payload
        );
        Ok(())
    }
}

/// Dispatcher backed by an unbounded tokio channel
///
/// The ledger side only sends; the receiver belongs to the delivery
/// consumer. An unbounded send never blocks, which keeps ledger operations
/// independent of the consumer's pace.
pub struct ChannelDispatcher {
    sender: mpsc::UnboundedSender<LedgerEvent>,
}

impl ChannelDispatcher {
    /// Create a dispatcher and the receiver its consumer should drain
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LedgerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationDispatcher for ChannelDispatcher {
    fn dispatch(&self, event: LedgerEvent) -> Result<(), DispatchError> {
        self.sender
            .send(event)
            .map_err(|_| DispatchError::ChannelClosed)
    }
}

/// In-memory dispatcher that records every event
///
/// Intended as a test double: assertions read back the recorded events.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    events: Mutex<Vec<LedgerEvent>>,
}

impl MemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event dispatched so far, in order
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, event: LedgerEvent) -> Result<(), DispatchError> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerEventKind;
    use serde_json::json;

    fn sample_event() -> LedgerEvent {
        LedgerEvent::new(
            "store-1",
            LedgerEventKind::WalletCreated,
            json!({ "currency": "USD" }),
        )
    }

    #[test]
    fn test_log_dispatcher_accepts_events() {
        let dispatcher = LogDispatcher;
        assert!(dispatcher.dispatch(sample_event()).is_ok());
    }

    #[test]
    fn test_memory_dispatcher_records_in_order() {
        let dispatcher = MemoryDispatcher::new();

        dispatcher.dispatch(sample_event()).unwrap();
        dispatcher
            .dispatch(LedgerEvent::new(
                "store-1",
                LedgerEventKind::LowBalance,
                json!({}),
            ))
            .unwrap();

        let events = dispatcher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, LedgerEventKind::WalletCreated);
        assert_eq!(events[1].kind, LedgerEventKind::LowBalance);
    }

    #[tokio::test]
    async fn test_channel_dispatcher_delivers_to_receiver() {
        let (dispatcher, mut receiver) = ChannelDispatcher::new();

        dispatcher.dispatch(sample_event()).unwrap();

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.store_id, "store-1");
        assert_eq!(received.kind, LedgerEventKind::WalletCreated);
    }

    #[test]
    fn test_channel_dispatcher_closed_receiver() {
        let (dispatcher, receiver) = ChannelDispatcher::new();
        drop(receiver);

        let result = dispatcher.dispatch(sample_event());

        assert_eq!(result.unwrap_err(), DispatchError::ChannelClosed);
    }
}
