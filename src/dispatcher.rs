//! Dispatcher: the main message loop.
//!
//! Pulls messages from every channel and hands each to its conversation's
//! worker, which turns it into an [`InboundEvent`], runs it through the
//! [`BookingEngine`] under the conversation's lock, and sends the rendered
//! reply back on the originating channel.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use tokio::task::JoinSet;

use crate::booking::event::{Command, InboundEvent};
use crate::booking::session::{self, spawn_sweep_task};
use crate::booking::{BookingEngine, ConversationId, IdentityContext, Session, SessionStore};
use crate::channels::{ChannelManager, InboundPayload, IncomingMessage, OutgoingResponse};
use crate::error::ChannelError;
use crate::i18n::{Language, Localizer};
use crate::store::Database;

/// Everything the dispatcher needs.
pub struct DispatcherDeps {
    pub engine: Arc<BookingEngine>,
    pub localizer: Arc<dyn Localizer>,
    pub sessions: Arc<SessionStore>,
    pub db: Arc<dyn Database>,
    pub default_language: Language,
    pub sweep_interval: std::time::Duration,
}

/// A conversation worker exits after this long without a message.
const WORKER_IDLE: std::time::Duration = std::time::Duration::from_secs(60);

type Queues = Mutex<HashMap<ConversationId, mpsc::UnboundedSender<IncomingMessage>>>;

pub struct Dispatcher {
    deps: DispatcherDeps,
    channels: Arc<ChannelManager>,
    /// Inbound queue of each conversation that has a running worker.
    queues: Queues,
}

impl Dispatcher {
    pub fn new(deps: DispatcherDeps, channels: ChannelManager) -> Self {
        Self {
            deps,
            channels: Arc::new(channels),
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Run until Ctrl+C or until every channel stream ends.
    ///
    /// Each conversation is served by its own worker task that handles a
    /// message and delivers its reply before taking the next one, so replies
    /// arrive in the order the messages came in. A slow conversation never
    /// holds up the others.
    pub async fn run(self) -> Result<(), ChannelError> {
        let this = Arc::new(self);
        let mut message_stream = this.channels.start_all().await?;
        let mut workers = JoinSet::new();

        let sweep_handle = spawn_sweep_task(
            Arc::clone(&this.deps.sessions),
            this.deps.sweep_interval,
        );

        tracing::info!(channels = ?this.channels.names(), "Dispatcher ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("All channel streams ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            while workers.try_join_next().is_some() {}
            Arc::clone(&this).enqueue(message, &mut workers).await;
        }

        tracing::info!("Dispatcher shutting down...");
        // Closing every queue lets the workers finish what is already queued.
        this.queues.lock().await.clear();
        while workers.join_next().await.is_some() {}
        sweep_handle.abort();
        this.channels.shutdown_all().await?;

        Ok(())
    }

    /// Queue a message on its conversation's worker, starting one if needed.
    async fn enqueue(self: Arc<Self>, message: IncomingMessage, workers: &mut JoinSet<()>) {
        let id = ConversationId::new(&message.channel, &message.user_id);
        let mut queues = self.queues.lock().await;

        let message = match queues.get(&id) {
            Some(tx) => match tx.send(message) {
                Ok(()) => return,
                Err(mpsc::error::SendError(message)) => message,
            },
            None => message,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // Cannot fail: `rx` is still held here.
        let _ = tx.send(message);
        queues.insert(id.clone(), tx);
        drop(queues);

        workers.spawn(self.serve(id, rx));
    }

    /// Worker loop for one conversation.
    async fn serve(self: Arc<Self>, id: ConversationId, mut rx: mpsc::UnboundedReceiver<IncomingMessage>) {
        loop {
            let message = match tokio::time::timeout(WORKER_IDLE, rx.recv()).await {
                Ok(Some(message)) => message,
                Ok(None) => return,
                Err(_) => {
                    // Senders only write under the queues lock, so an empty
                    // queue seen here stays empty once the entry is gone.
                    let mut queues = self.queues.lock().await;
                    match rx.try_recv() {
                        Ok(message) => message,
                        Err(_) => {
                            queues.remove(&id);
                            tracing::debug!(conversation = %id, "Conversation worker stopped");
                            return;
                        }
                    }
                }
            };
            self.handle_and_reply(&message).await;
        }
    }

    async fn handle_and_reply(&self, message: &IncomingMessage) {
        let response = self.process(message).await;
        if let Err(e) = self.channels.respond(message, response).await {
            tracing::error!(
                channel = %message.channel,
                user_id = %message.user_id,
                error = %e,
                "Failed to deliver reply"
            );
        }
    }

    /// Handle one message and return the rendered reply without sending it.
    pub async fn process(&self, message: &IncomingMessage) -> OutgoingResponse {
        let session = self.lock_session(message).await;
        self.process_locked(session, message).await
    }

    async fn process_locked(
        &self,
        mut session: OwnedMutexGuard<Session>,
        message: &IncomingMessage,
    ) -> OutgoingResponse {
        session.identity = identity_of(message);
        let language = session.language;
        let event = classify(self.deps.localizer.as_ref(), language, message);

        tracing::debug!(
            conversation = %session.id,
            state = %session.state,
            event = event.kind(),
            "Received message"
        );

        let reply = self.deps.engine.handle(&mut session, event).await;
        // The language may have just changed.
        let rendered = self.deps.localizer.render(session.language, &reply);
        OutgoingResponse::from(rendered)
    }

    /// Find or create the conversation's session and take its lock.
    ///
    /// A locked session cannot be evicted, but one fetched just before a
    /// sweep can be. In that case the lookup starts over.
    async fn lock_session(&self, message: &IncomingMessage) -> OwnedMutexGuard<Session> {
        let id = ConversationId::new(&message.channel, &message.user_id);
        loop {
            let handle = match self.deps.sessions.get(&id).await {
                Some(handle) => handle,
                None => {
                    let language = session::load_language(
                        self.deps.db.as_ref(),
                        &message.user_id,
                        self.deps.default_language,
                    )
                    .await;
                    let identity = identity_of(message);
                    let session_id = id.clone();
                    self.deps
                        .sessions
                        .get_or_insert_with(&id, move || Session::new(session_id, identity, language))
                        .await
                }
            };
            let guard = Arc::clone(&handle).lock_owned().await;
            if self.deps.sessions.holds(&id, &handle).await {
                return guard;
            }
            tracing::debug!(conversation = %id, "Session evicted before lock; reloading");
        }
    }
}

/// Map a transport message to an engine event.
///
/// Structured payloads win, then commands, then keyboard labels; anything
/// else is free text.
pub fn classify(
    localizer: &dyn Localizer,
    language: Language,
    message: &IncomingMessage,
) -> InboundEvent {
    match &message.payload {
        Some(InboundPayload::Contact { phone }) => {
            return InboundEvent::Contact {
                phone: phone.clone(),
            };
        }
        Some(InboundPayload::Location {
            latitude,
            longitude,
        }) => {
            return InboundEvent::Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            };
        }
        None => {}
    }

    if let Some(command) = Command::parse(&message.content) {
        return InboundEvent::Command(command);
    }

    match localizer.match_label(language, &message.content) {
        Some(action) => InboundEvent::Choice {
            action,
            raw: message.content.clone(),
        },
        None => InboundEvent::Text(message.content.clone()),
    }
}

/// Identity as reported by the transport.
fn identity_of(message: &IncomingMessage) -> IdentityContext {
    let first_name = message
        .first_name
        .clone()
        .or_else(|| message.username.clone())
        .unwrap_or_default();
    let mut identity = IdentityContext::new(message.user_id.as_str(), first_name);
    if let Some(username) = &message.username {
        identity = identity.with_username(username.as_str());
    }
    if let Some(last) = &message.last_name {
        identity = identity.with_last_name(last.as_str());
    }
    identity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::event::MenuAction;
    use crate::booking::{BookingState, EngineConfig, ProfileStore};
    use crate::i18n::{Catalog, Keyboard};
    use crate::store::LibSqlBackend;

    async fn dispatcher() -> Dispatcher {
        dispatcher_with(ChannelManager::new()).await
    }

    async fn dispatcher_with(channels: ChannelManager) -> Dispatcher {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let profiles = Arc::new(ProfileStore::new(Arc::clone(&db)));
        let engine = Arc::new(BookingEngine::new(
            EngineConfig::default(),
            Arc::clone(&db),
            profiles,
        ));
        Dispatcher::new(
            DispatcherDeps {
                engine,
                localizer: Arc::new(Catalog::new()),
                sessions: Arc::new(SessionStore::new(chrono::Duration::hours(24))),
                db,
                default_language: Language::English,
                sweep_interval: std::time::Duration::from_secs(600),
            },
            channels,
        )
    }

    /// Emits a fixed list of `(user, text)` messages. Replies to `/start`
    /// are delivered slowly; every delivery is recorded in order.
    struct SlowStartChannel {
        inbound: Vec<(&'static str, &'static str)>,
        delivered: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    }

    #[async_trait::async_trait]
    impl crate::channels::Channel for SlowStartChannel {
        fn name(&self) -> &str {
            "fake"
        }

        async fn start(&self) -> Result<crate::channels::MessageStream, ChannelError> {
            let messages: Vec<IncomingMessage> = self
                .inbound
                .iter()
                .map(|(user, content)| {
                    IncomingMessage::new("fake", *user, *content).with_first_name("Abebe")
                })
                .collect();
            Ok(Box::pin(futures::stream::iter(messages)))
        }

        async fn respond(
            &self,
            msg: &IncomingMessage,
            _response: OutgoingResponse,
        ) -> Result<(), ChannelError> {
            if msg.content == "/start" && msg.user_id == "1001" {
                tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            }
            self.delivered
                .lock()
                .unwrap()
                .push((msg.user_id.clone(), msg.content.clone()));
            Ok(())
        }

        async fn health_check(&self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), ChannelError> {
            Ok(())
        }
    }

    async fn run_scripted(
        inbound: Vec<(&'static str, &'static str)>,
    ) -> Vec<(String, String)> {
        let delivered = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut channels = ChannelManager::new();
        channels.add(Box::new(SlowStartChannel {
            inbound,
            delivered: Arc::clone(&delivered),
        }));
        dispatcher_with(channels).await.run().await.unwrap();
        let delivered = delivered.lock().unwrap().clone();
        delivered
    }

    fn text(content: &str) -> IncomingMessage {
        IncomingMessage::new("telegram", "1001", content).with_first_name("Abebe")
    }

    #[test]
    fn classify_prefers_payload_then_command_then_label() {
        let catalog = Catalog::new();

        let contact = text("").with_payload(InboundPayload::Contact {
            phone: Some("0911223344".into()),
        });
        assert!(matches!(
            classify(&catalog, Language::English, &contact),
            InboundEvent::Contact { phone: Some(_) }
        ));

        assert_eq!(
            classify(&catalog, Language::English, &text("/cancel")),
            InboundEvent::Command(Command::Cancel)
        );

        let label = catalog.render(
            Language::English,
            &crate::booking::Reply::new(crate::booking::MenuRef::Main),
        );
        let start = label.keyboard.labels()[0].to_string();
        assert_eq!(
            classify(&catalog, Language::English, &text(&start)),
            InboundEvent::Choice {
                action: MenuAction::StartBooking,
                raw: start.clone(),
            }
        );

        assert_eq!(
            classify(&catalog, Language::English, &text("Abebe Kebede")),
            InboundEvent::Text("Abebe Kebede".into())
        );
    }

    #[tokio::test]
    async fn start_renders_welcome_with_main_menu() {
        let d = dispatcher().await;
        let response = d.process(&text("/start")).await;
        assert!(response.text.contains("Abebe"));
        assert!(matches!(response.keyboard, Keyboard::Rows(_)));
    }

    #[tokio::test]
    async fn new_session_uses_saved_language() {
        let d = dispatcher().await;
        session::save_language(d.deps.db.as_ref(), "1001", Language::Amharic).await;

        d.process(&text("/start")).await;
        let id = ConversationId::new("telegram", "1001");
        let handle = d.deps.sessions.get(&id).await.unwrap();
        let s = handle.lock().await;
        assert_eq!(s.language, Language::Amharic);
        assert_eq!(s.state, BookingState::MainMenu);
    }

    #[tokio::test]
    async fn conversations_are_isolated_per_user() {
        let d = dispatcher().await;
        let start = d.process(&text("/start")).await;
        let first_button = start.keyboard.labels()[0].to_string();
        d.process(&text(&first_button)).await;

        let other = IncomingMessage::new("telegram", "2002", "/help").with_first_name("Sara");
        d.process(&other).await;

        let a = d
            .deps
            .sessions
            .get(&ConversationId::new("telegram", "1001"))
            .await
            .unwrap();
        let b = d
            .deps
            .sessions
            .get(&ConversationId::new("telegram", "2002"))
            .await
            .unwrap();
        assert_eq!(a.lock().await.state, BookingState::ServiceType);
        assert_eq!(b.lock().await.state, BookingState::MainMenu);
    }

    #[tokio::test]
    async fn replies_keep_message_order_within_a_conversation() {
        let delivered = run_scripted(vec![("1001", "/start"), ("1001", "/help")]).await;
        assert_eq!(
            delivered,
            vec![
                ("1001".to_string(), "/start".to_string()),
                ("1001".to_string(), "/help".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn slow_conversation_does_not_hold_up_others() {
        let delivered = run_scripted(vec![
            ("1001", "/start"),
            ("1001", "/help"),
            ("2002", "/start"),
        ])
        .await;
        assert_eq!(delivered.len(), 3);
        assert_eq!(delivered[0], ("2002".to_string(), "/start".to_string()));
        let first_user: Vec<&str> = delivered
            .iter()
            .filter(|(user, _)| user == "1001")
            .map(|(_, content)| content.as_str())
            .collect();
        assert_eq!(first_user, vec!["/start", "/help"]);
    }

    #[tokio::test]
    async fn evicted_session_is_rebuilt_on_next_message() {
        let d = dispatcher().await;
        d.process(&text("/start")).await;
        let id = ConversationId::new("telegram", "1001");
        let old = d.deps.sessions.get(&id).await.unwrap();
        old.lock().await.last_activity = chrono::Utc::now() - chrono::Duration::hours(48);
        assert_eq!(d.deps.sessions.evict_idle(chrono::Utc::now()).await, 1);

        d.process(&text("/help")).await;
        let live = d.deps.sessions.get(&id).await.unwrap();
        assert!(!Arc::ptr_eq(&old, &live));
        assert!(d.deps.sessions.holds(&id, &live).await);
    }
}
