//! Broadcast channel for chat open signals.
//!
//! Anything on the site side that should pull the chat up (a "talk to a
//! specialist" button, startup auto-open) publishes a [`ChatSignal::Open`]
//! here instead of reaching into the session directly. The idle nudge only
//! listens: it waits out its window with [`ChatBus::opened_within`].

use std::time::Duration;

use tokio::sync::broadcast;

/// Signals other components can send to the chat surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSignal {
    /// Bring the chat up and start the conversation if it has not started.
    Open,
}

/// Broadcast hub for [`ChatSignal`]s.
#[derive(Clone)]
pub struct ChatBus {
    tx: broadcast::Sender<ChatSignal>,
}

impl ChatBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    /// Ask the chat to open. Lost signals (no subscriber yet) are fine;
    /// whoever subscribes later will be opened by the next publisher.
    pub fn open(&self) {
        let _ = self.tx.send(ChatSignal::Open);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatSignal> {
        self.tx.subscribe()
    }

    /// Wait up to `window` for an open signal. False means the window
    /// elapsed with the chat still closed; nothing is published either way.
    pub async fn opened_within(&self, window: Duration) -> bool {
        let mut signals = self.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(window) => false,
            _ = signals.recv() => true,
        }
    }
}

impl Default for ChatBus {
    fn default() -> Self {
        Self::new()
    }
}
