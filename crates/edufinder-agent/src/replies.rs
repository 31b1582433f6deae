//! Text the orchestrator sends to users without consulting a worker.

use crate::classifier::{ClassifiedIntent, IntentKind};
use edufinder_kg::{title_case, ConceptNode, LearningOrder};

pub fn welcome() -> String {
    "\
**Welcome to EduFinder, your learning companion!**

I build personalized curricula, find educational resources, and explain how concepts depend on each other.

**What I can do:**
- **Curriculum creation**: structured learning paths for any technical domain
- **Resource discovery**: courses, books, projects, and videos
- **Concept insights**: prerequisites, related ideas, and a suggested study order

**Try asking:**
- \"Teach me React development\"
- \"Find Python resources with videos\"
- \"Explain neural networks\"

What would you like to learn today?"
        .to_string()
}

pub fn goodbye() -> String {
    "Thanks for learning with EduFinder. Good luck with your studies!".to_string()
}

pub fn greeting() -> String {
    "\
Hello! I'm EduFinder. Tell me what you want to learn and I'll put together a plan, \
point you at resources, or explain the concepts involved.

Try \"Teach me machine learning\" or \"Find blockchain tutorials\"."
        .to_string()
}

pub fn help() -> String {
    "\
**How to use EduFinder**

- **Learning plans**: \"teach me ...\", \"create a study plan for ...\", \"curriculum for ...\"
- **Resources**: \"find ...\", \"show me courses on ...\", add \"videos\" to include video results
- **Insights**: \"explain ...\", \"what is ...\", \"prerequisites of ...\"

Supported domains include AI engineering, web and web3 development, data science, \
mobile, DevOps, cybersecurity, game development, UI/UX, cloud, databases, and \
general software engineering."
        .to_string()
}

/// Local answer for an utterance that matched no actionable intent.
///
/// When the topic is a seeded concept, answer from the concept graph directly.
pub fn fallback(intent: &ClassifiedIntent, node: Option<&ConceptNode>, order: Option<&LearningOrder>) -> String {
    match node {
        Some(node) => deep_dive(node, order),
        None => format!(
            "I'm not sure what you'd like to do with **{}**. \
Try \"teach me {}\" for a learning plan, \"find {} resources\" for materials, \
or \"explain {}\" for concept insights.",
            title_case(&intent.topic),
            spoken(&intent.topic),
            spoken(&intent.topic),
            spoken(&intent.topic),
        ),
    }
}

fn deep_dive(node: &ConceptNode, order: Option<&LearningOrder>) -> String {
    let mut out = format!(
        "**{}**\n\n{}\n\n**Difficulty:** {}\n**Estimated time:** {}\n",
        node.key.display_name(),
        node.definition,
        node.difficulty,
        node.estimated_time
    );

    let prerequisites: Vec<String> = match order {
        Some(order) if !order.order.is_empty() => {
            order.order.iter().map(|k| k.display_name()).collect()
        }
        _ => node.prerequisites.iter().map(|k| k.display_name()).collect(),
    };
    if !prerequisites.is_empty() {
        out.push_str(&format!("\n**Study first:** {}\n", prerequisites.join(" → ")));
    }

    if !node.learning_path.is_empty() {
        out.push_str("\n**Learning path:**\n");
        for (i, step) in node.learning_path.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }

    if !node.related.is_empty() {
        let related: Vec<String> = node.related.iter().map(|k| k.display_name()).collect();
        out.push_str(&format!("\n**Related:** {}\n", related.join(", ")));
    }

    out.push_str(&format!(
        "\nSay \"teach me {}\" for a full curriculum.",
        spoken(node.key.as_str())
    ));
    out
}

/// Interim acknowledgement sent right after dispatching to a worker.
pub fn interim(kind: IntentKind, topic: &str) -> String {
    let topic = title_case(topic);
    match kind {
        IntentKind::CreatePlan => format!("Creating your educational plan for {}...", topic),
        IntentKind::FindResources => format!("Finding resources for {}...", topic),
        IntentKind::Explain => format!("Analyzing concepts around {}...", topic),
        _ => format!("Working on {}...", topic),
    }
}

/// Sent when a worker reports failure.
pub fn worker_failure(error_text: &str) -> String {
    if error_text.trim().is_empty() {
        "Sorry, I couldn't complete that request. Please try again.".to_string()
    } else {
        format!(
            "Sorry, I couldn't complete that request. Please try again.\n\nError: {}",
            error_text
        )
    }
}

/// Sent when the request could not be handed to its worker.
pub fn dispatch_failure(kind: IntentKind) -> String {
    format!(
        "Sorry, the {} service is unavailable right now. Please try again later.",
        kind.slug()
    )
}

/// Sent when a pending request outlives its TTL.
pub fn timeout(kind: IntentKind, topic: &str) -> String {
    format!(
        "Sorry, your {} request for {} took too long and was cancelled. Please try again.",
        kind.slug(),
        title_case(topic)
    )
}

fn spoken(topic: &str) -> String {
    topic.replace('_', " ")
}
