//! CLI channel: stdin/stdout REPL for local testing.
//!
//! Keyboard buttons are printed numbered; typing the number presses the
//! button. `/contact <phone>` and `/location <lat>,<lon>` simulate sharing
//! a contact card or a position.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crate::channels::{Channel, InboundPayload, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;
use crate::i18n::{ButtonRequest, Keyboard};

const CLI_USER_ID: &str = "local-user";

/// A simple CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel {
    first_name: String,
    /// Labels of the keyboard currently on screen.
    buttons: Arc<Mutex<Vec<String>>>,
}

impl CliChannel {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            buttons: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let buttons = Arc::clone(&self.buttons);
        let first_name = self.first_name.clone();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        let msg = parse_line(line, &buttons.lock().await)
                            .with_first_name(first_name.as_str());
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!(error = %e, "Error reading stdin");
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        println!("\n{}\n", response.text);

        let mut buttons = self.buttons.lock().await;
        match &response.keyboard {
            Keyboard::Unchanged => {}
            Keyboard::Remove => buttons.clear(),
            Keyboard::Rows(_) => {
                buttons.clear();
                buttons.extend(response.keyboard.labels().into_iter().map(String::from));
                println!("{}", format_keyboard(&response.keyboard));
            }
        }

        eprint!("> ");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// Interpret one typed line.
fn parse_line(line: &str, buttons: &[String]) -> IncomingMessage {
    if let Some(phone) = line.strip_prefix("/contact") {
        let phone = phone.trim();
        let phone = (!phone.is_empty()).then(|| phone.to_string());
        return IncomingMessage::new("cli", CLI_USER_ID, phone.clone().unwrap_or_default())
            .with_payload(InboundPayload::Contact { phone });
    }

    if let Some(coords) = line.strip_prefix("/location")
        && let Some((lat, lon)) = coords.trim().split_once(',')
        && let (Ok(latitude), Ok(longitude)) = (lat.trim().parse(), lon.trim().parse())
    {
        return IncomingMessage::new("cli", CLI_USER_ID, "").with_payload(
            InboundPayload::Location {
                latitude,
                longitude,
            },
        );
    }

    let content = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| buttons.get(i))
        .map(String::as_str)
        .unwrap_or(line);
    IncomingMessage::new("cli", CLI_USER_ID, content)
}

/// Numbered buttons, one keyboard row per line.
fn format_keyboard(keyboard: &Keyboard) -> String {
    let Keyboard::Rows(rows) = keyboard else {
        return String::new();
    };
    let mut n = 0;
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    n += 1;
                    let hint = match button.request {
                        Some(ButtonRequest::Contact) => " (/contact <phone>)",
                        Some(ButtonRequest::Location) => " (/location <lat>,<lon>)",
                        None => "",
                    };
                    format!("[{n}] {}{hint}", button.label)
                })
                .collect::<Vec<_>>()
                .join("   ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
