//! Agent loops and system wiring.
//!
//! Each agent is a single consumer draining its own mailbox. The orchestrator
//! loop also ticks the pending-request sweep. Everything stops on the shared
//! `CancellationToken`.

use crate::config::EduFinderConfig;
use crate::orchestrator::Orchestrator;
use crate::transport::{Delivery, Mailbox, Router, Transport};
use crate::workers::{CurriculumWorker, InsightsWorker, MaterialsWorker, Worker};
use chrono::Utc;
use edufinder_core::{Address, ChatMessage, Envelope, Result, WorkerReply, WorkerRequest};
use edufinder_kg::ConceptStore;
use edufinder_llm::{
    GeminiGenerator, NoVideoSearch, TextGenerator, UnavailableGenerator, VideoSearch,
    YouTubeSearch,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Orchestrator loop
// ---------------------------------------------------------------------------

pub struct OrchestratorLoop {
    orchestrator: Orchestrator,
    mailbox: Mailbox,
    sweep_interval: Duration,
    cancel: CancellationToken,
}

impl OrchestratorLoop {
    pub fn new(
        orchestrator: Orchestrator,
        mailbox: Mailbox,
        sweep_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            orchestrator,
            mailbox,
            sweep_interval: sweep_interval.max(Duration::from_millis(1)),
            cancel,
        }
    }

    /// Drain the mailbox until it closes or the token is cancelled.
    pub async fn run(mut self) -> Orchestrator {
        info!(address = %self.orchestrator.address(), "orchestrator started");
        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                delivery = self.mailbox.recv() => match delivery {
                    Some(delivery) => self.orchestrator.handle_delivery(delivery),
                    None => {
                        info!("orchestrator mailbox closed, shutting down");
                        break;
                    }
                },
                _ = sweep.tick() => {
                    let expired = self.orchestrator.sweep_expired(Utc::now());
                    if expired > 0 {
                        debug!(expired, remaining = self.orchestrator.pending().len(), "sweep");
                    }
                }
                _ = self.cancel.cancelled() => {
                    info!(pending = self.orchestrator.pending().len(), "orchestrator cancelled");
                    break;
                }
            }
        }
        self.orchestrator
    }
}

// ---------------------------------------------------------------------------
// Worker loop
// ---------------------------------------------------------------------------

pub struct WorkerLoop {
    address: Address,
    worker: Arc<dyn Worker>,
    mailbox: Mailbox,
    transport: Arc<dyn Transport>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl WorkerLoop {
    pub fn new(
        address: Address,
        worker: Arc<dyn Worker>,
        mailbox: Mailbox,
        transport: Arc<dyn Transport>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            address,
            worker,
            mailbox,
            transport,
            cancel,
            timeout: None,
        }
    }

    /// Bound each request; an overrun is answered with a failure reply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn handle(&self, request: WorkerRequest) -> WorkerReply {
        let Some(limit) = self.timeout else {
            return self.worker.handle(request).await;
        };
        let fallback = WorkerReply::failure(
            &request,
            format!(
                "{} worker timed out after {}s",
                self.worker.name(),
                limit.as_secs_f32()
            ),
        );
        match tokio::time::timeout(limit, self.worker.handle(request)).await {
            Ok(reply) => reply,
            Err(_) => {
                warn!(worker = self.worker.name(), request_id = %fallback.request_id(), "request timed out");
                fallback
            }
        }
    }

    pub async fn run(mut self) {
        info!(worker = self.worker.name(), address = %self.address, "worker started");
        loop {
            let delivery = tokio::select! {
                delivery = self.mailbox.recv() => delivery,
                _ = self.cancel.cancelled() => break,
            };
            let Some(Delivery { from, envelope }) = delivery else {
                info!(worker = self.worker.name(), "worker mailbox closed, shutting down");
                break;
            };

            let request = match envelope {
                Envelope::Request(request) => request,
                other => {
                    debug!(worker = self.worker.name(), %from, "ignoring non-request envelope: {:?}", other);
                    continue;
                }
            };

            let request_id = request.request_id().clone();
            debug!(worker = self.worker.name(), %request_id, "handling request");
            let reply = tokio::select! {
                reply = self.handle(request) => reply,
                _ = self.cancel.cancelled() => {
                    warn!(worker = self.worker.name(), %request_id, "cancelled mid-request");
                    break;
                }
            };

            if let Err(e) = self.transport.deliver(&self.address, &from, Envelope::Reply(reply)) {
                error!(worker = self.worker.name(), %request_id, "reply delivery failed: {}", e);
            }
        }
        info!(worker = self.worker.name(), "worker stopped");
    }
}

// ---------------------------------------------------------------------------
// System wiring
// ---------------------------------------------------------------------------

/// Builds and spawns the orchestrator and the three workers on one router.
pub struct LearningSystem;

impl LearningSystem {
    /// Spawn with providers chosen from the config and environment.
    pub fn spawn_from_config(config: &EduFinderConfig) -> SystemHandle {
        let (generator, videos) = providers(config);
        Self::spawn(config, generator, videos, Arc::new(ConceptStore::seeded()))
    }

    pub fn spawn(
        config: &EduFinderConfig,
        generator: Arc<dyn TextGenerator>,
        videos: Arc<dyn VideoSearch>,
        store: Arc<ConceptStore>,
    ) -> SystemHandle {
        let router = Arc::new(Router::new());
        let transport: Arc<dyn Transport> = router.clone();
        let cancel = CancellationToken::new();
        let routes = config.routes();
        let mut tasks = Vec::new();

        let curriculum: Arc<dyn Worker> =
            Arc::new(CurriculumWorker::new(generator.clone(), store.clone()));
        let materials: Arc<dyn Worker> = Arc::new(
            MaterialsWorker::new(generator.clone(), videos).with_video_limit(config.videos.limit),
        );
        let insights: Arc<dyn Worker> = Arc::new(InsightsWorker::new(generator, store.clone()));

        let workers = vec![
            (routes.curriculum.clone(), curriculum),
            (routes.materials.clone(), materials),
            (routes.insights.clone(), insights),
        ];
        for (address, worker) in workers {
            let mailbox = router.register(address.clone());
            let worker_loop =
                WorkerLoop::new(address, worker, mailbox, transport.clone(), cancel.clone())
                    .with_timeout(config.worker_timeout());
            tasks.push(tokio::spawn(worker_loop.run()));
        }

        let orchestrator_address = config.orchestrator_address();
        let mailbox = router.register(orchestrator_address.clone());
        let orchestrator = Orchestrator::new(
            orchestrator_address.clone(),
            routes,
            transport,
            store.clone(),
        )
        .with_ttl(config.pending_ttl());
        let orchestrator_loop =
            OrchestratorLoop::new(orchestrator, mailbox, config.sweep_interval(), cancel.clone());
        tasks.push(tokio::spawn(async move {
            orchestrator_loop.run().await;
        }));

        info!(agents = tasks.len(), "learning system started");
        SystemHandle {
            router,
            orchestrator: orchestrator_address,
            store,
            cancel,
            tasks,
        }
    }
}

fn providers(config: &EduFinderConfig) -> (Arc<dyn TextGenerator>, Arc<dyn VideoSearch>) {
    let generator: Arc<dyn TextGenerator> = match config.generation_api_key() {
        Some(key) => Arc::new(
            GeminiGenerator::new(key)
                .with_model(config.generation.model.clone())
                .with_base_url(config.generation.base_url.clone())
                .with_timeout(config.generation_timeout()),
        ),
        None => {
            warn!(
                "{} not set, generation requests will fail",
                config.generation.api_key_env
            );
            Arc::new(UnavailableGenerator::new(format!(
                "{} is not set",
                config.generation.api_key_env
            )))
        }
    };

    let videos: Arc<dyn VideoSearch> = match config.video_api_key() {
        Some(key) => {
            Arc::new(
                YouTubeSearch::new(Some(key))
                    .with_base_url(config.videos.base_url.clone())
                    .with_timeout(config.video_timeout()),
            )
        }
        None => {
            info!("video search disabled");
            Arc::new(NoVideoSearch)
        }
    };

    (generator, videos)
}

/// Handle to a running system.
pub struct SystemHandle {
    router: Arc<Router>,
    orchestrator: Address,
    store: Arc<ConceptStore>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SystemHandle {
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn store(&self) -> &Arc<ConceptStore> {
        &self.store
    }

    pub fn orchestrator_address(&self) -> &Address {
        &self.orchestrator
    }

    /// Register a user endpoint and return its session.
    pub fn connect_user(&self, address: impl Into<Address>) -> UserSession {
        let address = address.into();
        let mailbox = self.router.register(address.clone());
        UserSession {
            address,
            orchestrator: self.orchestrator.clone(),
            router: self.router.clone(),
            mailbox,
        }
    }

    /// Send a chat message to the orchestrator on behalf of `from`.
    pub fn send(&self, from: &Address, msg: ChatMessage) -> Result<Uuid> {
        let id = msg.msg_id;
        self.router
            .deliver(from, &self.orchestrator, Envelope::Chat(msg))?;
        Ok(id)
    }

    pub fn send_text(&self, from: &Address, text: impl Into<String>) -> Result<Uuid> {
        self.send(from, ChatMessage::text(text))
    }

    /// Cancel every loop and wait for them to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                error!("agent task failed: {}", e);
            }
        }
        info!("learning system stopped");
    }
}

/// A connected user: sends chat to the orchestrator, reads its replies.
pub struct UserSession {
    address: Address,
    orchestrator: Address,
    router: Arc<Router>,
    mailbox: Mailbox,
}

impl UserSession {
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn send(&self, msg: ChatMessage) -> Result<Uuid> {
        let id = msg.msg_id;
        self.router
            .deliver(&self.address, &self.orchestrator, Envelope::Chat(msg))?;
        Ok(id)
    }

    pub fn send_text(&self, text: impl Into<String>) -> Result<Uuid> {
        self.send(ChatMessage::text(text))
    }

    pub fn start_session(&self) -> Result<Uuid> {
        self.send(ChatMessage::start_session())
    }

    pub fn end_session(&self) -> Result<Uuid> {
        self.send(ChatMessage::end_session())
    }

    /// Next delivery of any kind, acknowledgements included.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.mailbox.recv().await
    }

    /// Next chat text, skipping acknowledgements.
    pub async fn next_text(&mut self) -> Option<String> {
        while let Some(delivery) = self.mailbox.recv().await {
            if let Some(text) = delivery.envelope.chat_text() {
                return Some(text);
            }
        }
        None
    }

    /// [`next_text`](Self::next_text) bounded by `limit`.
    pub async fn next_text_within(&mut self, limit: Duration) -> Option<String> {
        tokio::time::timeout(limit, self.next_text()).await.ok().flatten()
    }
}

impl Drop for UserSession {
    fn drop(&mut self) {
        self.router.unregister(&self.address);
    }
}
