//! EduFinder Agent - Request orchestration, correlation, and worker agents

pub mod classifier;
pub mod config;
pub mod orchestrator;
pub mod pending;
pub mod replies;
pub mod runtime;
pub mod transport;
pub mod workers;

pub use classifier::{classify, ClassifiedIntent, IntentKind};
pub use config::EduFinderConfig;
pub use orchestrator::{Orchestrator, WorkerRoutes};
pub use pending::{PendingRequest, PendingTable, RequestIdGenerator};
pub use runtime::{LearningSystem, OrchestratorLoop, SystemHandle, UserSession, WorkerLoop};
pub use transport::{Delivery, Mailbox, Router, Transport};
pub use workers::{CurriculumWorker, InsightsWorker, MaterialsWorker, Worker};
