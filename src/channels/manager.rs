//! Owns the active channels, merges their inbound streams, and routes
//! replies back to the channel a message came from.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;

#[derive(Default)]
pub struct ChannelManager {
    channels: HashMap<String, Arc<dyn Channel>>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel. A channel with the same name is replaced.
    pub fn add(&mut self, channel: Box<dyn Channel>) {
        let name = channel.name().to_string();
        if self.channels.insert(name.clone(), Arc::from(channel)).is_some() {
            tracing::warn!(channel = %name, "Replaced an already registered channel");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Start every channel and merge their streams into one.
    ///
    /// A channel that fails to start is logged and skipped; it is an error
    /// only when none start.
    pub async fn start_all(&self) -> Result<MessageStream, ChannelError> {
        let mut streams = Vec::with_capacity(self.channels.len());
        for (name, channel) in &self.channels {
            match channel.start().await {
                Ok(s) => {
                    tracing::info!(channel = %name, "Channel started");
                    streams.push(s);
                }
                Err(e) => tracing::error!(channel = %name, error = %e, "Channel failed to start"),
            }
        }

        if streams.is_empty() {
            return Err(ChannelError::StartupFailed {
                name: "all".into(),
                reason: "no channel could be started".into(),
            });
        }
        Ok(Box::pin(stream::select_all(streams)))
    }

    /// Send a response through the channel the message arrived on.
    pub async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let channel = self
            .channels
            .get(&msg.channel)
            .ok_or_else(|| ChannelError::UnknownChannel {
                name: msg.channel.clone(),
            })?;
        channel.respond(msg, response).await
    }

    pub async fn health_check_all(&self) -> HashMap<String, Result<(), ChannelError>> {
        let mut results = HashMap::new();
        for (name, channel) in &self.channels {
            results.insert(name.clone(), channel.health_check().await);
        }
        results
    }

    pub async fn shutdown_all(&self) -> Result<(), ChannelError> {
        for (name, channel) in &self.channels {
            if let Err(e) = channel.shutdown().await {
                tracing::warn!(channel = %name, error = %e, "Channel shutdown failed");
            }
        }
        Ok(())
    }
}
