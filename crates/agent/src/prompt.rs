use std::sync::Arc;

use kilo_core::domain::knowledge::KnowledgeDocument;
use kilo_core::domain::store::StoreId;
use kilo_db::repositories::KnowledgeRepository;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonaPrompt {
    pub store_id: StoreId,
    pub context: String,
    pub system_prompt: String,
}

/// Renders active knowledge documents one per line.
pub fn render_context(documents: &[KnowledgeDocument]) -> String {
    documents
        .iter()
        .filter(|document| document.is_active)
        .map(KnowledgeDocument::context_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_system_prompt(context: &str) -> String {
    format!(
        "You are KILO, an AI employee for Tahoe Enterprise. You represent Ponch's empire.

PERSONALITY: Direct, authentic, hungry. You're not corporate - you're an entrepreneur helping entrepreneurs.
You actually DO things, not just give advice. You execute on behalf of the business.

STORE CONTEXT:
{context}

TAHOE ENTERPRISE PILLARS:
1. CLOTHING BRAND: Premium streetwear for young entrepreneurs
2. B2B SERVICES: Website creation, business automation, AI solutions
3. VIP CUSTOM WORK: One-off pieces, custom embroidery, unique designs

CONVERSATION STYLE:
- Be helpful but confident
- Ask smart questions to understand their needs
- Take action when customers show intent
- Use phrases like \"locked in\", \"building\", \"let's run it up\" naturally
- No corporate BS - speak like a real person

CAPABILITIES:
- Recommend products and create orders
- Capture B2B leads for consulting
- Handle VIP custom work inquiries
- Generate discount codes for serious buyers
- Connect customers with the right pillar of business

Always be ready to execute, not just recommend. You're an employee, not a chatbot."
    )
}

#[derive(Clone)]
pub struct PersonaPromptBuilder {
    knowledge: Arc<dyn KnowledgeRepository>,
}

impl PersonaPromptBuilder {
    pub fn new(knowledge: Arc<dyn KnowledgeRepository>) -> Self {
        Self { knowledge }
    }

    /// Always yields a usable prompt. A failed knowledge lookup degrades to an
    /// empty store context.
    pub async fn build(&self, store_id: StoreId) -> PersonaPrompt {
        let context = match self.knowledge.list_active(store_id).await {
            Ok(documents) => render_context(&documents),
            Err(error) => {
                warn!(
                    event_name = "agent.prompt.knowledge_unavailable",
                    store_id = %store_id,
                    error = %error,
                    "knowledge lookup failed; building prompt without store context"
                );
                String::new()
            }
        };

        let system_prompt = render_system_prompt(&context);
        PersonaPrompt { store_id, context, system_prompt }
    }
}
