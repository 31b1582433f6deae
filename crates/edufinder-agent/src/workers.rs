//! Worker agents: curriculum, materials, and insights.
//!
//! A worker turns one typed request into exactly one reply carrying the same
//! request id. Generation failures become failure replies; workers never drop
//! a request silently.

use async_trait::async_trait;
use edufinder_core::{
    CurriculumReply, CurriculumRequest, InsightsReply, InsightsRequest, MaterialsReply,
    MaterialsRequest, VideoInfo, WorkerReply, WorkerRequest,
};
use edufinder_kg::{suggest_order, title_case, ConceptKey, ConceptNode, ConceptStore, LearningOrder};
use edufinder_llm::{TextGenerator, VideoSearch};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_VIDEO_LIMIT: usize = 5;

#[async_trait]
pub trait Worker: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, request: WorkerRequest) -> WorkerReply;
}

fn mismatch(worker: &str, request: &WorkerRequest) -> WorkerReply {
    warn!(
        worker = worker,
        request_id = %request.request_id(),
        kind = request.kind(),
        "request kind not handled by this worker"
    );
    WorkerReply::failure(
        request,
        format!("{} worker cannot handle {} requests", worker, request.kind()),
    )
}

// ---------------------------------------------------------------------------
// Curriculum
// ---------------------------------------------------------------------------

pub struct CurriculumWorker {
    generator: Arc<dyn TextGenerator>,
    store: Arc<ConceptStore>,
}

impl CurriculumWorker {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<ConceptStore>) -> Self {
        Self { generator, store }
    }

    /// Curated concepts of `domain`, in study order.
    fn known_sequence(&self, domain: &str) -> Vec<ConceptKey> {
        let curated: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|k| self.store.lookup(k.as_str()))
            .filter(|n| n.domain == domain && !n.is_synthesized())
            .map(|n| n.key.as_str().to_string())
            .collect();
        if curated.is_empty() {
            return Vec::new();
        }
        suggest_order(&self.store, domain, &curated).into_keys()
    }

    async fn create_curriculum(&self, request: CurriculumRequest) -> WorkerReply {
        let sequence = self.known_sequence(&request.domain);
        let prompt = curriculum_prompt(&request, &sequence);
        debug!(request_id = %request.request_id, generator = self.generator.name(), "generating curriculum");

        WorkerReply::Curriculum(match self.generator.generate(&prompt).await {
            Ok(text) => CurriculumReply {
                curriculum_text: text,
                success: true,
                error_text: String::new(),
                request_id: request.request_id,
            },
            Err(e) => CurriculumReply {
                curriculum_text: String::new(),
                success: false,
                error_text: e.to_string(),
                request_id: request.request_id,
            },
        })
    }
}

#[async_trait]
impl Worker for CurriculumWorker {
    fn name(&self) -> &str {
        "curriculum"
    }

    async fn handle(&self, request: WorkerRequest) -> WorkerReply {
        match request {
            WorkerRequest::Curriculum(req) => self.create_curriculum(req).await,
            other => mismatch(self.name(), &other),
        }
    }
}

pub fn curriculum_prompt(request: &CurriculumRequest, sequence: &[ConceptKey]) -> String {
    let mut prompt = format!(
        "You are an expert educator. Create a comprehensive, structured learning \
curriculum for the domain \"{}\".\n\nThe learner asked: \"{}\"\n\n\
Organize it into modules from beginner to advanced. For each module give the \
learning objectives, key topics, a hands-on project, and an estimated duration. \
Finish with suggested next steps.\n",
        title_case(&request.domain),
        request.user_query
    );
    if !sequence.is_empty() {
        let names: Vec<String> = sequence.iter().map(|k| k.display_name()).collect();
        prompt.push_str(&format!(
            "\nKnown concepts in this domain, in recommended study order: {}\n",
            names.join(" → ")
        ));
    }
    prompt
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

pub struct MaterialsWorker {
    generator: Arc<dyn TextGenerator>,
    videos: Arc<dyn VideoSearch>,
    video_limit: usize,
}

impl MaterialsWorker {
    pub fn new(generator: Arc<dyn TextGenerator>, videos: Arc<dyn VideoSearch>) -> Self {
        Self {
            generator,
            videos,
            video_limit: DEFAULT_VIDEO_LIMIT,
        }
    }

    pub fn with_video_limit(mut self, limit: usize) -> Self {
        self.video_limit = limit;
        self
    }

    async fn find_materials(&self, request: MaterialsRequest) -> WorkerReply {
        let prompt = materials_prompt(&request);
        let generated = self.generator.generate(&prompt).await;

        let reply = match generated {
            Ok(materials_text) => {
                let videos_text = if request.include_videos && self.video_limit > 0 {
                    let query = format!("{} tutorial", title_case(&request.topic));
                    let found = self.videos.search(&query, self.video_limit).await;
                    debug!(request_id = %request.request_id, count = found.len(), "video search done");
                    format_videos(&found)
                } else {
                    String::new()
                };
                MaterialsReply {
                    materials_text,
                    videos_text,
                    success: true,
                    error_text: String::new(),
                    request_id: request.request_id,
                }
            }
            Err(e) => MaterialsReply {
                materials_text: String::new(),
                videos_text: String::new(),
                success: false,
                error_text: e.to_string(),
                request_id: request.request_id,
            },
        };
        WorkerReply::Materials(reply)
    }
}

#[async_trait]
impl Worker for MaterialsWorker {
    fn name(&self) -> &str {
        "materials"
    }

    async fn handle(&self, request: WorkerRequest) -> WorkerReply {
        match request {
            WorkerRequest::Materials(req) => self.find_materials(req).await,
            other => mismatch(self.name(), &other),
        }
    }
}

pub fn materials_prompt(request: &MaterialsRequest) -> String {
    format!(
        "You are a learning resources curator. Recommend high-quality learning \
materials for \"{}\" in the domain \"{}\".\n\nThe learner asked: \"{}\"\n\n\
Include online courses, books, documentation, and hands-on projects. Give a one-line \
description for each and group them from beginner to advanced.\n",
        title_case(&request.topic),
        title_case(&request.domain),
        request.user_query
    )
}

/// Render a video list as markdown. Empty input renders as an empty string.
pub fn format_videos(videos: &[VideoInfo]) -> String {
    if videos.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\n**Videos:**\n");
    for video in videos {
        out.push_str(&format!("- [{}]({})\n", video.title, video.url));
        let details: Vec<&str> = [
            video.channel.as_str(),
            video.duration_text.as_str(),
            video.views_text.as_str(),
            video.published_date.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        if !details.is_empty() {
            out.push_str(&format!("  {}\n", details.join(" | ")));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

pub struct InsightsWorker {
    generator: Arc<dyn TextGenerator>,
    store: Arc<ConceptStore>,
}

impl InsightsWorker {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<ConceptStore>) -> Self {
        Self { generator, store }
    }

    async fn explain(&self, request: InsightsRequest) -> WorkerReply {
        let node = self.store.get(&request.domain, &request.concept);
        let prerequisites: Vec<&str> = node.prerequisites.iter().map(|k| k.as_str()).collect();
        let order = suggest_order(&self.store, &request.domain, &prerequisites);

        let prompt = insights_prompt(&request, &knowledge_section(&node, &order));
        debug!(
            request_id = %request.request_id,
            concept = %node.key,
            source = %node.source,
            "generating insights"
        );

        WorkerReply::Insights(match self.generator.generate(&prompt).await {
            Ok(text) => InsightsReply {
                insights_text: text,
                success: true,
                error_text: String::new(),
                request_id: request.request_id,
            },
            Err(e) => InsightsReply {
                insights_text: String::new(),
                success: false,
                error_text: e.to_string(),
                request_id: request.request_id,
            },
        })
    }
}

#[async_trait]
impl Worker for InsightsWorker {
    fn name(&self) -> &str {
        "insights"
    }

    async fn handle(&self, request: WorkerRequest) -> WorkerReply {
        match request {
            WorkerRequest::Insights(req) => self.explain(req).await,
            other => mismatch(self.name(), &other),
        }
    }
}

/// Concept graph facts about `node`, formatted for a prompt.
pub fn knowledge_section(node: &ConceptNode, prerequisite_order: &LearningOrder) -> String {
    let mut out = format!("Concept: {}\n", node.key.display_name());
    out.push_str(&format!("Definition: {}\n", node.definition));
    if !prerequisite_order.order.is_empty() {
        out.push_str(&format!(
            "Prerequisites (study order): {}\n",
            display_list(prerequisite_order.order.iter())
        ));
    }
    if !node.related.is_empty() {
        out.push_str(&format!("Related concepts: {}\n", display_list(node.related.iter())));
    }
    if !node.learning_path.is_empty() {
        out.push_str(&format!("Learning path: {}\n", node.learning_path.join(" → ")));
    }
    out.push_str(&format!("Difficulty: {}\n", node.difficulty));
    out.push_str(&format!("Estimated time: {}\n", node.estimated_time));
    if node.is_synthesized() {
        out.push_str("Note: this entry was generated from templates and may be imprecise.\n");
    }
    out
}

fn display_list<'a>(keys: impl Iterator<Item = &'a ConceptKey>) -> String {
    keys.map(|k| k.display_name()).collect::<Vec<_>>().join(", ")
}

pub fn insights_prompt(request: &InsightsRequest, knowledge: &str) -> String {
    format!(
        "You are an experienced tutor. The learner asked ({}): \"{}\"\n\n\
Knowledge graph:\n{}\n\
Explain {} clearly for the domain \"{}\". Cover what it is, why it matters, how \
the prerequisites build toward it, common misconceptions, and a practical first \
exercise.\n",
        request.query_kind,
        request.user_query,
        knowledge,
        title_case(&request.concept),
        title_case(&request.domain)
    )
}
