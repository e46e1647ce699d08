//! Keyword intent tagging.
//!
//! A flat, ordered rule table evaluated against the lower-cased customer
//! message. Every rule is checked independently, so one message can raise
//! several actions. The keyword sets and thresholds are product behavior:
//! changing them changes which leads get captured, so bump
//! [`INTENT_RULES_VERSION`] whenever the table changes.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const INTENT_RULES_VERSION: u32 = 1;

/// Messages longer than this many characters count as high engagement.
pub const ENGAGEMENT_MIN_CHARS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    CaptureB2bLead,
    CaptureVipLead,
    CreateDraftOrder,
    MarkEngagedCustomer,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CaptureB2bLead => "capture_b2b_lead",
            Self::CaptureVipLead => "capture_vip_lead",
            Self::CreateDraftOrder => "create_draft_order",
            Self::MarkEngagedCustomer => "mark_engaged_customer",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// High and medium actions get executed; low ones are only reported.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentAction {
    #[serde(rename = "type")]
    pub kind: IntentKind,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Fires when the lower-cased message contains any of the keywords.
    AnyKeyword(&'static [&'static str]),
    /// Fires on long messages or messages that ask a question.
    Engagement { min_chars: usize, marker: char },
}

impl RuleMatcher {
    fn matches(&self, raw_message: &str, normalized_message: &str) -> bool {
        match self {
            Self::AnyKeyword(keywords) => {
                keywords.iter().any(|keyword| normalized_message.contains(keyword))
            }
            Self::Engagement { min_chars, marker } => {
                raw_message.chars().count() > *min_chars || raw_message.contains(*marker)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentRule {
    pub matcher: RuleMatcher,
    pub kind: IntentKind,
    pub priority: Priority,
    pub reason: &'static str,
}

impl IntentRule {
    fn action(&self) -> IntentAction {
        IntentAction { kind: self.kind, priority: self.priority, reason: self.reason.to_string() }
    }
}

pub const B2B_KEYWORDS: &[&str] =
    &["website", "automation", "business", "bulk", "team", "company"];
pub const VIP_CUSTOM_KEYWORDS: &[&str] = &["custom", "one-off", "unique", "embroidery", "design"];
pub const PURCHASE_KEYWORDS: &[&str] = &["buy", "purchase", "order", "cart", "checkout"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    pub version: u32,
    pub rules: Vec<IntentRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            version: INTENT_RULES_VERSION,
            rules: vec![
                IntentRule {
                    matcher: RuleMatcher::AnyKeyword(B2B_KEYWORDS),
                    kind: IntentKind::CaptureB2bLead,
                    priority: Priority::High,
                    reason: "B2B services inquiry detected",
                },
                IntentRule {
                    matcher: RuleMatcher::AnyKeyword(VIP_CUSTOM_KEYWORDS),
                    kind: IntentKind::CaptureVipLead,
                    priority: Priority::High,
                    reason: "VIP custom work inquiry detected",
                },
                IntentRule {
                    matcher: RuleMatcher::AnyKeyword(PURCHASE_KEYWORDS),
                    kind: IntentKind::CreateDraftOrder,
                    priority: Priority::Medium,
                    reason: "Purchase intent detected",
                },
                IntentRule {
                    matcher: RuleMatcher::Engagement {
                        min_chars: ENGAGEMENT_MIN_CHARS,
                        marker: '?',
                    },
                    kind: IntentKind::MarkEngagedCustomer,
                    priority: Priority::Low,
                    reason: "High engagement detected",
                },
            ],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IntentTagger {
    table: RuleTable,
}

impl IntentTagger {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn rules_version(&self) -> u32 {
        self.table.version
    }

    /// Tags a customer message. The generated reply is accepted so callers can
    /// pass the whole exchange, but matching only looks at the message.
    pub fn tag(&self, message: &str, _response: Option<&str>) -> Vec<IntentAction> {
        let normalized = message.to_lowercase();
        self.table
            .rules
            .iter()
            .filter(|rule| rule.matcher.matches(message, &normalized))
            .map(IntentRule::action)
            .collect()
    }
}
