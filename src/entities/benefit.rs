// 🎁 Benefit Entity - one recurring or one-time perk owned by a card
//
// The natural key is (cardId, titleEn). cardId is assigned by the store at
// insert time, so in the model a benefit lives nested under its CardBundle
// instead of carrying a dangling id.

use serde::{Deserialize, Serialize};

// ============================================================================
// FREQUENCY
// ============================================================================

/// How often a benefit renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    OneTime,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Wire string (JSON value and SQL `frequency` column)
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneTime => "ONE_TIME",
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Parse a raw wire string.
    ///
    /// Returns None for anything unknown - the normalizer treats that as a
    /// validation gap and drops the benefit rather than guessing.
    pub fn parse(s: &str) -> Option<Frequency> {
        match s {
            "ONE_TIME" => Some(Frequency::OneTime),
            "MONTHLY" => Some(Frequency::Monthly),
            "QUARTERLY" => Some(Frequency::Quarterly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

// ============================================================================
// BENEFIT
// ============================================================================

/// One perk attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub category: String,
    pub category_en: String,

    /// Localized title
    pub title: String,

    /// Canonical English title - natural key within the owning card
    pub title_en: String,

    pub description: String,
    pub description_en: String,

    /// Monetary cap. None is a domain value (non-monetary or
    /// percentage-based with no fixed cap) - never coerced to zero.
    pub amount: Option<f64>,

    /// Currency code (USD, CAD, TWD, ... or POINTS)
    pub currency: String,

    pub frequency: Frequency,

    // Active window within a calendar year, 1-based. Defaults 1/1 - 12/31.
    pub start_month: u8,
    pub start_day: u8,
    pub end_month: u8,
    pub end_day: u8,

    /// Days before the window closes to surface a reminder
    pub reminder_days: u32,

    pub is_active: bool,
}

// ============================================================================
// TESTS
// ============================================================================
