// 📣 Pipeline Events - structured progress reporting
//
// Components never print. They hand PipelineEvents to a Reporter: the
// console reporter renders the human-readable lines, the capturing
// reporter lets tests assert on what happened instead of scraping stdout.

use std::sync::Mutex;

use crate::entities::Region;

// ============================================================================
// EVENTS
// ============================================================================

/// Artifact flavors the emitter can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Sql,
    Json,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Sql => "SQL",
            ArtifactKind::Json => "JSON",
        }
    }
}

/// One observable step of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Live fetch is about to run
    FetchStarted { region: Region, url: String },

    /// Live fetch or parse failed; the source degrades to its fallback
    FetchFailed { reason: String },

    /// Static catalog substituted for a failed or empty live fetch
    FallbackUsed { region: Region, count: usize },

    /// Source finished with this many raw records
    FetchCompleted { count: usize },

    /// A raw card was dropped during normalization
    RecordDropped { name: String, reason: String },

    /// A raw benefit was dropped during normalization
    BenefitDropped {
        card: String,
        title: String,
        reason: String,
    },

    /// Card row inserted with a fresh id
    CardInserted { name_en: String, card_id: i64 },

    /// Card already present; id reused, fields untouched
    CardSkipped { name_en: String, card_id: i64 },

    BenefitInserted { card_id: i64, title_en: String },

    /// Benefit already present under that card
    BenefitSkipped { card_id: i64, title_en: String },

    /// Whole batch committed
    BatchCommitted {
        cards_inserted: usize,
        cards_skipped: usize,
        benefits_inserted: usize,
        benefits_skipped: usize,
    },

    /// Artifact file written
    ArtifactWritten { kind: ArtifactKind, path: String },
}

// ============================================================================
// REPORTER
// ============================================================================

/// Sink for pipeline events, passed into each component.
pub trait Reporter {
    fn report(&self, event: PipelineEvent);
}

/// Renders events as progress lines on stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::FetchStarted { region, url } => {
                println!("🔍 Fetching {} cards from {}", region, url);
            }
            PipelineEvent::FetchFailed { reason } => {
                println!("❌ Fetch failed: {}", reason);
            }
            PipelineEvent::FallbackUsed { region, count } => {
                println!("⚠️  Using built-in {} catalog ({} cards)", region, count);
            }
            PipelineEvent::FetchCompleted { count } => {
                println!("✅ Fetched {} card records", count);
            }
            PipelineEvent::RecordDropped { name, reason } => {
                println!("⚠️  Dropped card '{}': {}", name, reason);
            }
            PipelineEvent::BenefitDropped { card, title, reason } => {
                println!("   ⚠️  Dropped benefit '{}' of '{}': {}", title, card, reason);
            }
            PipelineEvent::CardInserted { name_en, card_id } => {
                println!("✅ Added card: {} (ID: {})", name_en, card_id);
            }
            PipelineEvent::CardSkipped { name_en, card_id } => {
                println!("⚠️  Card already exists, skipping: {} (ID: {})", name_en, card_id);
            }
            PipelineEvent::BenefitInserted { title_en, .. } => {
                println!("   ✅ Added benefit: {}", title_en);
            }
            PipelineEvent::BenefitSkipped { title_en, .. } => {
                println!("   ⚠️  Benefit already exists, skipping: {}", title_en);
            }
            PipelineEvent::BatchCommitted {
                cards_inserted,
                cards_skipped,
                benefits_inserted,
                benefits_skipped,
            } => {
                println!(
                    "✓ Committed: {} cards inserted, {} skipped; {} benefits inserted, {} skipped",
                    cards_inserted, cards_skipped, benefits_inserted, benefits_skipped
                );
            }
            PipelineEvent::ArtifactWritten { kind, path } => {
                println!("✅ {} written to: {}", kind.as_str(), path);
            }
        }
    }
}

/// Swallows every event (embedders that do their own reporting).
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: PipelineEvent) {}
}

/// Records every event for later inspection.
pub struct CapturingReporter {
    events: Mutex<Vec<PipelineEvent>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        CapturingReporter {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything reported so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Count events matching a predicate
    pub fn count_matching(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl Default for CapturingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for CapturingReporter {
    fn report(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capturing_reporter_preserves_order() {
        let reporter = CapturingReporter::new();

        reporter.report(PipelineEvent::FetchCompleted { count: 3 });
        reporter.report(PipelineEvent::RecordDropped {
            name: "?".to_string(),
            reason: "missing nameEn".to_string(),
        });

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PipelineEvent::FetchCompleted { count: 3 });
        assert!(matches!(events[1], PipelineEvent::RecordDropped { .. }));
    }

    #[test]
    fn test_count_matching_filters_events() {
        let reporter = CapturingReporter::new();

        reporter.report(PipelineEvent::CardInserted {
            name_en: "A".to_string(),
            card_id: 1,
        });
        reporter.report(PipelineEvent::CardSkipped {
            name_en: "A".to_string(),
            card_id: 1,
        });
        reporter.report(PipelineEvent::CardInserted {
            name_en: "B".to_string(),
            card_id: 2,
        });

        let inserted =
            reporter.count_matching(|e| matches!(e, PipelineEvent::CardInserted { .. }));
        assert_eq!(inserted, 2);
    }
}
