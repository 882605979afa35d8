//! Chat session driver.
//!
//! Owns one [`Conversation`] and pumps it against a [`ChatSurface`] (the
//! rendering side) and a [`LeadSink`] (the delivery side). The engine stays
//! pure; everything that waits, sleeps, or talks to the network lives here.

use std::time::Duration;

use async_trait::async_trait;

use crate::flow::engine::{Conversation, TimedMessage, TurnAction};
use crate::flow::transcript::ChatMessage;
use crate::submit::{LeadPayload, LeadSink};

/// Rendering side of a chat session.
///
/// Implementations decide how bot messages are displayed and where user
/// input comes from. `read_line` returning `None` means the input source
/// is gone and the session should wind down.
#[async_trait]
pub trait ChatSurface: Send {
    /// Simulate the bot typing for `delay` before the next message lands.
    async fn typing(&mut self, delay: Duration);

    /// Render one bot or user message.
    async fn show(&mut self, message: &ChatMessage);

    /// Next line of user input, or `None` on end of input.
    async fn read_line(&mut self) -> Option<String>;
}

/// Session-level knobs that do not belong to the conversation script.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Origin tag stamped on delivered leads.
    pub origin: String,
    /// Honor the script's typing delays. Off makes the bot answer instantly.
    pub typing_delays: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: "Assistente Virtual - Site".into(),
            typing_delays: true,
        }
    }
}

/// One user's chat, from greeting to close.
pub struct ChatSession<S, K> {
    conversation: Conversation,
    surface: S,
    sink: K,
    config: SessionConfig,
}

impl<S: ChatSurface, K: LeadSink> ChatSession<S, K> {
    pub fn new(conversation: Conversation, surface: S, sink: K) -> Self {
        Self::with_config(conversation, surface, sink, SessionConfig::default())
    }

    pub fn with_config(
        conversation: Conversation,
        surface: S,
        sink: K,
        config: SessionConfig,
    ) -> Self {
        Self {
            conversation,
            surface,
            sink,
            config,
        }
    }

    /// Drive the conversation until it closes, the user leaves, or input
    /// runs out. Returns the conversation for post-mortem inspection.
    pub async fn run(mut self) -> Conversation {
        let opening = self.conversation.open();
        self.play(&opening).await;

        loop {
            if self.conversation.step().is_terminal() {
                break;
            }
            let Some(line) = self.surface.read_line().await else {
                tracing::debug!(step = %self.conversation.step(), "Input closed mid-conversation");
                break;
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("/sair") {
                tracing::debug!(step = %self.conversation.step(), "User left the chat");
                break;
            }
            if line.eq_ignore_ascii_case("/reiniciar") {
                let replay = self.conversation.restart();
                self.play(&replay).await;
                continue;
            }

            let turn = self.conversation.handle_input(line);
            self.play(&turn.messages).await;

            if let TurnAction::Submit(answers) = turn.action {
                let payload = LeadPayload::from_answers(&answers, &self.config.origin);
                let delivered = match self.sink.deliver(&payload).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(error = %e, "Lead delivery failed");
                        false
                    }
                };
                let closing = self.conversation.finish_submission(delivered);
                self.play(&closing).await;
            }
        }

        self.conversation
    }

    async fn play(&mut self, messages: &[TimedMessage]) {
        for timed in messages {
            if self.config.typing_delays && !timed.delay.is_zero() {
                self.surface.typing(timed.delay).await;
            }
            self.surface.show(&timed.message).await;
        }
    }
}
