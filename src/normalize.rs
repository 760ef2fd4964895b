// 🧹 Record Normalizer - raw candidates into canonical rows
//
// Per-record policy: a card without a usable nameEn is dropped, a benefit
// missing its natural key, currency or frequency is dropped, and the rest
// of the batch continues. Nothing in here is fatal. Records sharing a
// nameEn are all kept - deduplication belongs to the persister.

use crate::entities::{Benefit, Card, CardBundle, Frequency, Region};
use crate::report::{PipelineEvent, Reporter};
use crate::source::{RawBenefit, RawCard};

/// Turns raw source records into canonical CardBundles, filling defaults
/// and dropping records that cannot be keyed.
pub struct Normalizer {
    default_region: Region,
}

impl Normalizer {
    /// Normalizer whose records fall into `default_region` when a raw
    /// record does not carry a usable region of its own
    pub fn new(default_region: Region) -> Self {
        Normalizer { default_region }
    }

    /// Normalize a whole fetch batch, preserving source order
    pub fn normalize_batch(&self, raw: Vec<RawCard>, reporter: &dyn Reporter) -> Vec<CardBundle> {
        let mut bundles = Vec::with_capacity(raw.len());
        for record in raw {
            if let Some(bundle) = self.normalize(record, reporter) {
                bundles.push(bundle);
            }
        }
        bundles
    }

    /// Normalize one record. None means the record was dropped.
    pub fn normalize(&self, raw: RawCard, reporter: &dyn Reporter) -> Option<CardBundle> {
        let name_en = match raw.name_en.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                reporter.report(PipelineEvent::RecordDropped {
                    name: raw.name.unwrap_or_else(|| "<unnamed>".to_string()),
                    reason: "missing nameEn (natural key)".to_string(),
                });
                return None;
            }
        };

        let region = raw
            .region
            .as_deref()
            .and_then(|s| s.parse::<Region>().ok())
            .unwrap_or(self.default_region);

        // localized name falls back to the English one
        let name = match raw.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => name_en.clone(),
        };

        let mut benefits = Vec::with_capacity(raw.benefits.len());
        for raw_benefit in raw.benefits {
            if let Some(benefit) = self.normalize_benefit(raw_benefit, &name_en, reporter) {
                benefits.push(benefit);
            }
        }

        let card = Card {
            name,
            name_en,
            bank: raw.bank.unwrap_or_default(),
            bank_en: raw.bank_en.unwrap_or_default(),
            issuer: raw.issuer.unwrap_or_default(),
            region,
            description: raw.description.unwrap_or_default(),
            description_en: raw.description_en.unwrap_or_default(),
            photo: raw.photo,
            is_active: true,
        };

        Some(CardBundle::new(card, benefits))
    }

    fn normalize_benefit(
        &self,
        raw: RawBenefit,
        card: &str,
        reporter: &dyn Reporter,
    ) -> Option<Benefit> {
        let report_drop = |title: &Option<String>, reason: String| {
            reporter.report(PipelineEvent::BenefitDropped {
                card: card.to_string(),
                title: title.clone().unwrap_or_else(|| "<untitled>".to_string()),
                reason,
            });
        };

        let title_en = match raw.title_en.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                report_drop(&raw.title, "missing titleEn (natural key)".to_string());
                return None;
            }
        };

        // no currency inference: an amount is meaningless without one
        let currency = match raw.currency {
            Some(c) if !c.trim().is_empty() => c,
            _ => {
                report_drop(&raw.title, "missing currency".to_string());
                return None;
            }
        };

        let frequency = match raw.frequency.as_deref().and_then(Frequency::parse) {
            Some(f) => f,
            None => {
                let reason = match raw.frequency {
                    Some(f) => format!("unknown frequency '{}'", f),
                    None => "missing frequency".to_string(),
                };
                report_drop(&raw.title, reason);
                return None;
            }
        };

        let title = match raw.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => title_en.clone(),
        };

        Some(Benefit {
            category: raw.category.unwrap_or_default(),
            category_en: raw.category_en.unwrap_or_default(),
            title,
            title_en,
            description: raw.description.unwrap_or_default(),
            description_en: raw.description_en.unwrap_or_default(),
            // absent stays absent: non-monetary, not zero
            amount: raw.amount,
            currency,
            frequency,
            start_month: raw.start_month.unwrap_or(1),
            start_day: raw.start_day.unwrap_or(1),
            end_month: raw.end_month.unwrap_or(12),
            end_day: raw.end_day.unwrap_or(31),
            reminder_days: raw.reminder_days.unwrap_or(30),
            is_active: true,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(Region::America)
    }
}

// ============================================================================
// TESTS
// ============================================================================
