// cardseed - Core Library
// Fetch, normalize, deduplicate and persist credit-card catalogs

pub mod catalog;
pub mod db;
pub mod emit;
pub mod entities;
pub mod normalize;
pub mod report;
pub mod source;

// Re-export commonly used types
pub use db::{
    card_count, benefit_count, find_card_id, persist_batch, persist_card, setup_database,
    PersistResult, PersistSummary,
};
pub use emit::{render_json, render_sql, write_artifact, CardExport};
pub use entities::{Benefit, Card, CardBundle, Frequency, Region};
pub use normalize::Normalizer;
pub use report::{
    ArtifactKind, CapturingReporter, ConsoleReporter, NullReporter, PipelineEvent, Reporter,
};
pub use source::{
    parse_card_page, search_url, CardSource, RawBenefit, RawCard, StaticCatalogSource,
    WebCardSource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
