use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::store::StoreId;
use crate::errors::DomainError;

/// Score recorded on every keyword-captured lead.
pub const CAPTURED_LEAD_INTENT_SCORE: i64 = 85;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    B2bBulk,
    VipCustom,
}

impl LeadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B2bBulk => "b2b_bulk",
            Self::VipCustom => "vip_custom",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub store_id: StoreId,
    pub email: String,
    pub name: Option<String>,
    pub lead_type: LeadType,
    pub intent_score: i64,
    pub chat_context: String,
    pub consent_email: bool,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    /// Builds a captured lead; an email with no visible characters is rejected.
    pub fn captured(
        store_id: StoreId,
        email: &str,
        name: Option<String>,
        lead_type: LeadType,
        chat_context: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(DomainError::MissingField("email"));
        }

        Ok(Self {
            store_id,
            email: email.to_string(),
            name,
            lead_type,
            intent_score: CAPTURED_LEAD_INTENT_SCORE,
            chat_context: chat_context.into(),
            consent_email: true,
            created_at: Utc::now(),
        })
    }
}

/// Placeholder written when a customer shows purchase intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub store_id: StoreId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub note: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DraftOrder {
    pub fn placeholder(
        store_id: StoreId,
        email: Option<String>,
        name: Option<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            email,
            name,
            note: note.into(),
            status: "draft".to_string(),
            created_at: Utc::now(),
        }
    }
}
