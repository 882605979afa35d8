//! Terminal chat surface for local runs.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::flow::transcript::{ChatMessage, Sender};
use crate::session::ChatSurface;

/// Renders the chat on stdout and reads replies from stdin.
pub struct CliSurface {
    lines: Lines<BufReader<Stdin>>,
}

impl CliSurface {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for CliSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSurface for CliSurface {
    async fn typing(&mut self, delay: Duration) {
        eprint!("digitando...");
        tokio::time::sleep(delay).await;
        // Erase the indicator before the message lands.
        eprint!("\r            \r");
    }

    async fn show(&mut self, message: &ChatMessage) {
        match message.sender {
            Sender::Bot => {
                println!("🤖 {}", message.content);
                if let Some(options) = &message.options {
                    for (i, option) in options.iter().enumerate() {
                        println!("   {}. {}", i + 1, option.label);
                    }
                }
            }
            // The terminal already echoed what the user typed.
            Sender::User => {}
        }
    }

    async fn read_line(&mut self) -> Option<String> {
        eprint!("> ");
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }
}
