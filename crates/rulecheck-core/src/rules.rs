//! The three compliance rule fields

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::form_fields;

/// Example rules shown as input placeholders
const PLACEHOLDERS: [&str; 3] = [
    "The document must have a purpose section",
    "The document must mention at least one date",
    "The document must define at least one term",
];

/// Identifies one of the three rule inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSlot {
    One,
    Two,
    Three,
}

impl RuleSlot {
    pub const ALL: [RuleSlot; 3] = [RuleSlot::One, RuleSlot::Two, RuleSlot::Three];

    /// Zero-based position
    pub fn index(self) -> usize {
        match self {
            RuleSlot::One => 0,
            RuleSlot::Two => 1,
            RuleSlot::Three => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Multipart field name sent to the service
    pub fn field_name(self) -> &'static str {
        match self {
            RuleSlot::One => form_fields::RULE_1,
            RuleSlot::Two => form_fields::RULE_2,
            RuleSlot::Three => form_fields::RULE_3,
        }
    }

    pub fn placeholder(self) -> &'static str {
        PLACEHOLDERS[self.index()]
    }
}

impl fmt::Display for RuleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule {}", self.index() + 1)
    }
}

/// The three user-authored rules submitted together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rule1: String,
    pub rule2: String,
    pub rule3: String,
}

impl RuleSet {
    pub fn new(rule1: impl Into<String>, rule2: impl Into<String>, rule3: impl Into<String>) -> Self {
        Self {
            rule1: rule1.into(),
            rule2: rule2.into(),
            rule3: rule3.into(),
        }
    }

    pub fn get(&self, slot: RuleSlot) -> &str {
        match slot {
            RuleSlot::One => &self.rule1,
            RuleSlot::Two => &self.rule2,
            RuleSlot::Three => &self.rule3,
        }
    }

    pub fn set(&mut self, slot: RuleSlot, text: impl Into<String>) {
        let field = match slot {
            RuleSlot::One => &mut self.rule1,
            RuleSlot::Two => &mut self.rule2,
            RuleSlot::Three => &mut self.rule3,
        };
        *field = text.into();
    }

    /// First slot that is empty or whitespace-only
    pub fn first_missing(&self) -> Option<RuleSlot> {
        RuleSlot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).trim().is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// `(field name, text)` pairs in submission order
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        RuleSlot::ALL.map(|slot| (slot.field_name(), self.get(slot)))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
