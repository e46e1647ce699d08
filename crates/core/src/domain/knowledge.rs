use serde::{Deserialize, Serialize};

use crate::domain::store::StoreId;

/// A store-specific snippet injected into the persona prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub store_id: StoreId,
    pub doc_type: String,
    pub title: String,
    pub content: String,
    pub is_active: bool,
}

impl KnowledgeDocument {
    pub fn new(
        store_id: StoreId,
        doc_type: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            doc_type: doc_type.into(),
            title: title.into(),
            content: content.into(),
            is_active: true,
        }
    }

    /// `[doc_type] title: content`
    pub fn context_line(&self) -> String {
        format!("[{}] {}: {}", self.doc_type, self.title, self.content)
    }
}
