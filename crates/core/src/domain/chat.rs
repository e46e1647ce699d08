use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::store::StoreId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Session id handed out when the widget did not send one.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("session_{}", now.timestamp_millis()))
    }

    /// Uses the caller's id when it carries any text, otherwise generates one.
    pub fn from_request(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ => Self::generate(now),
        }
    }
}

/// One customer message and the reply it received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub customer_message: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(
        store_id: StoreId,
        session_id: SessionId,
        customer_message: impl Into<String>,
        ai_response: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            session_id,
            customer_message: customer_message.into(),
            ai_response: ai_response.into(),
            created_at: Utc::now(),
        }
    }
}
