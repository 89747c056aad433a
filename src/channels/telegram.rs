//! Telegram channel. Long-polls the Bot API for updates.
//!
//! Text, shared contacts and shared locations are forwarded; every other
//! update kind is skipped. Replies carry a reply keyboard built from the
//! rendered [`Keyboard`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::channels::{Channel, InboundPayload, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;
use crate::i18n::{ButtonRequest, Keyboard};

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Long-poll timeout passed to getUpdates, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Back-off after a failed poll.
const POLL_RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// Connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: SecretString,
    allowed_users: Vec<String>,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: SecretString, allowed_users: Vec<String>) -> Self {
        Self {
            bot_token,
            allowed_users,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        api_url(&self.bot_token, method)
    }

    /// Check if a username or numeric id is in the allowed list.
    pub fn is_user_allowed(&self, identity: &str) -> bool {
        check_user_allowed(&self.allowed_users, [identity])
    }

    /// Send a reply, split into chunks under the length limit. The keyboard
    /// goes with the last chunk.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let markup = if i == last { reply_markup(keyboard) } else { None };
            self.send_message_chunk(chat_id, chunk, markup.as_ref()).await?;
        }
        Ok(())
    }

    /// Send a single chunk, Markdown first with a plain-text fallback.
    async fn send_message_chunk(
        &self,
        chat_id: &str,
        text: &str,
        markup: Option<&Value>,
    ) -> Result<(), ChannelError> {
        let mut markdown_body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown"
        });
        if let Some(markup) = markup {
            markdown_body["reply_markup"] = markup.clone();
        }

        let markdown_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&markdown_body)
            .send()
            .await
            .map_err(|e| send_failed(e.to_string()))?;

        if markdown_resp.status().is_success() {
            return Ok(());
        }

        let markdown_status = markdown_resp.status();
        tracing::warn!(
            status = ?markdown_status,
            "Telegram sendMessage with Markdown failed; retrying without parse_mode"
        );

        let mut plain_body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = markup {
            plain_body["reply_markup"] = markup.clone();
        }

        let plain_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&plain_body)
            .send()
            .await
            .map_err(|e| send_failed(e.to_string()))?;

        if !plain_resp.status().is_success() {
            let plain_err = plain_resp.text().await.unwrap_or_default();
            return Err(send_failed(format!(
                "sendMessage failed (markdown: {markdown_status}, plain: {plain_err})"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let url = self.api_url("getUpdates");
        let allowed_users = self.allowed_users.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for messages...");

            loop {
                let body = json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message"]
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(error = %e, "Telegram poll error");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                let data: Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!(error = %e, "Telegram parse error");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                let results = match update_batch(&data) {
                    Ok(results) => results,
                    Err(description) => {
                        tracing::warn!(%description, "Telegram getUpdates rejected");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(incoming) = parse_update(update, &allowed_users) else {
                        continue;
                    };

                    if tx.send(incoming).is_err() {
                        tracing::info!("Telegram listener channel closed");
                        return;
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let chat_id = msg
            .metadata
            .get("chat_id")
            .and_then(Value::as_str)
            .ok_or_else(|| send_failed("No chat_id in message metadata".into()))?;

        self.send_message(chat_id, &response.text, &response.keyboard)
            .await
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::info!("Telegram channel shutting down");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn api_url(token: &SecretString, method: &str) -> String {
    format!(
        "https://api.telegram.org/bot{}/{method}",
        token.expose_secret()
    )
}

fn send_failed(reason: String) -> ChannelError {
    ChannelError::SendFailed {
        name: "telegram".into(),
        reason,
    }
}

/// Check if any identity in the iterator matches the allowed users list.
fn check_user_allowed<'a>(
    allowed_users: &[String],
    identities: impl IntoIterator<Item = &'a str>,
) -> bool {
    let ids: Vec<&str> = identities.into_iter().collect();
    allowed_users
        .iter()
        .any(|u| u == "*" || ids.contains(&u.as_str()))
}

/// The updates of a getUpdates response, or the API's error description.
fn update_batch(data: &Value) -> Result<&Vec<Value>, String> {
    if data.get("ok").and_then(Value::as_bool) == Some(false) {
        let description = data
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("no description");
        return Err(description.to_string());
    }
    data.get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| "response has no result array".to_string())
}

/// Turn one getUpdates entry into an [`IncomingMessage`].
///
/// Returns `None` for non-message updates, unsupported message kinds, and
/// senders outside the allow-list.
fn parse_update(update: &Value, allowed_users: &[String]) -> Option<IncomingMessage> {
    let message = update.get("message")?;
    let from = message.get("from")?;

    let user_id = from.get("id").and_then(Value::as_i64)?.to_string();
    let username = from.get("username").and_then(Value::as_str);

    let mut identities = vec![user_id.as_str()];
    identities.extend(username);
    if !check_user_allowed(allowed_users, identities) {
        tracing::warn!(
            user_id = %user_id,
            username = username.unwrap_or("unknown"),
            "Telegram: ignoring message from unauthorized user"
        );
        return None;
    }

    let (content, payload) = if let Some(text) = message.get("text").and_then(Value::as_str) {
        (text.to_string(), None)
    } else if let Some(contact) = message.get("contact") {
        let phone = contact
            .get("phone_number")
            .and_then(Value::as_str)
            .map(String::from);
        (
            phone.clone().unwrap_or_default(),
            Some(InboundPayload::Contact { phone }),
        )
    } else if let Some(location) = message.get("location") {
        let latitude = location.get("latitude").and_then(Value::as_f64)?;
        let longitude = location.get("longitude").and_then(Value::as_f64)?;
        (
            String::new(),
            Some(InboundPayload::Location {
                latitude,
                longitude,
            }),
        )
    } else {
        tracing::debug!(user_id = %user_id, "Telegram: skipping unsupported message kind");
        return None;
    };

    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .map(|id| id.to_string())
        .unwrap_or_else(|| user_id.clone());

    let mut incoming = IncomingMessage::new("telegram", user_id, content)
        .with_metadata(json!({ "chat_id": chat_id }));
    if let Some(payload) = payload {
        incoming = incoming.with_payload(payload);
    }
    if let Some(first) = from.get("first_name").and_then(Value::as_str) {
        incoming = incoming.with_first_name(first);
    }
    if let Some(last) = from.get("last_name").and_then(Value::as_str) {
        incoming = incoming.with_last_name(last);
    }
    if let Some(username) = username {
        incoming = incoming.with_username(username);
    }
    Some(incoming)
}

/// The `reply_markup` object for a keyboard, if any.
fn reply_markup(keyboard: &Keyboard) -> Option<Value> {
    match keyboard {
        Keyboard::Unchanged => None,
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
        Keyboard::Rows(rows) => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| {
                            let mut b = json!({ "text": button.label });
                            match button.request {
                                Some(ButtonRequest::Contact) => b["request_contact"] = json!(true),
                                Some(ButtonRequest::Location) => {
                                    b["request_location"] = json!(true)
                                }
                                None => {}
                            }
                            b
                        })
                        .collect()
                })
                .collect();
            Some(json!({
                "keyboard": rows,
                "resize_keyboard": true,
            }))
        }
    }
}

/// Split a message into chunks of at most `max_chars` characters.
/// Tries to split on newlines, then spaces, then hard-cuts.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = text;

    loop {
        // Byte offset of the first character past the limit, if any.
        let Some((limit, _)) = remaining.char_indices().nth(max_chars) else {
            chunks.push(remaining.to_string());
            break;
        };

        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
        if remaining.is_empty() {
            break;
        }
    }

    chunks
}

// ── Tests ───────────────────────────────────────────────────────────
