use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use std::path::PathBuf;

use cardseed::{
    db, emit, ArtifactKind, CardBundle, CardSource, ConsoleReporter, Normalizer, RawCard, Region,
    Reporter, StaticCatalogSource, WebCardSource,
};

/// Fetch credit-card catalogs and seed them into SQLite or SQL/JSON artifacts
#[derive(Parser)]
#[command(name = "cardseed", version)]
struct Cli {
    /// Market to ingest
    #[arg(long, default_value = "america")]
    region: Region,

    /// Issuer-specific card listing instead of the regional search
    #[arg(long, value_enum)]
    vendor: Option<Vendor>,

    /// Skip the live fetch and read the built-in catalog directly
    #[arg(long)]
    offline: bool,

    /// Persist into this SQLite database (schema created when missing)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Write the SQL seeding script here
    /// (defaults to seed-<region>-cards.sql when no other output is chosen)
    #[arg(long)]
    output_sql: Option<PathBuf>,

    /// Write the JSON export here
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Show the fetched cards without persisting or writing anything
    #[arg(long)]
    display_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Vendor {
    /// American Express card listing (america market)
    Amex,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let reporter = ConsoleReporter;

    // the Amex listing is an america-market source
    let region = match cli.vendor {
        Some(Vendor::Amex) => Region::America,
        None => cli.region,
    };

    println!("{}", "=".repeat(60));
    println!("Ingesting credit cards for {}", region.as_str().to_uppercase());
    println!("{}", "=".repeat(60));

    // 1. Fetch (live unless --offline; failures degrade to the catalog)
    let raw = fetch_cards(&cli, region, &reporter);

    // 2. Normalize
    let normalizer = Normalizer::new(region);
    let batch = normalizer.normalize_batch(raw, &reporter);
    let total_benefits: usize = batch.iter().map(|b| b.benefits.len()).sum();
    println!("✓ Normalized {} cards ({} benefits)", batch.len(), total_benefits);

    // 3. Display
    display_results(region, &batch);

    if cli.display_only {
        println!("⚠️  Display-only mode, nothing persisted or written");
        return Ok(());
    }

    let generated_at = Utc::now();

    // 4. Persist
    if let Some(db_path) = &cli.db {
        println!("💾 Persisting into {}...", db_path.display());
        let mut conn = Connection::open(db_path)?;
        db::setup_database(&conn)?;
        db::persist_batch(&mut conn, &batch, &reporter)?;

        let cards = db::card_count(&conn)?;
        let benefits = db::benefit_count(&conn)?;
        println!("✓ Database now holds {} cards and {} benefits", cards, benefits);
    }

    // 5. Emit artifacts; the SQL script is the default outcome of a run
    //    that names no destination at all
    let default_sql = cli.db.is_none() && cli.output_sql.is_none() && cli.output_json.is_none();
    let sql_path = cli
        .output_sql
        .clone()
        .or_else(|| default_sql.then(|| PathBuf::from(format!("seed-{}-cards.sql", region))));

    if let Some(path) = sql_path {
        let sql = emit::render_sql(region, &batch, generated_at);
        emit::write_artifact(&path, ArtifactKind::Sql, &sql, &reporter)?;
    }

    if let Some(path) = &cli.output_json {
        let json = emit::render_json(region, &batch, generated_at)?;
        emit::write_artifact(path, ArtifactKind::Json, &json, &reporter)?;
    }

    println!("\n✅ Done");

    Ok(())
}

fn fetch_cards(cli: &Cli, region: Region, reporter: &dyn Reporter) -> Vec<RawCard> {
    match (cli.vendor, cli.offline) {
        (Some(Vendor::Amex), true) => StaticCatalogSource::amex().fetch(reporter),
        (Some(Vendor::Amex), false) => WebCardSource::amex().fetch(reporter),
        (None, true) => StaticCatalogSource::new(region).fetch(reporter),
        (None, false) => WebCardSource::for_region(region).fetch(reporter),
    }
}

fn display_results(region: Region, batch: &[CardBundle]) {
    if batch.is_empty() {
        println!("❌ No card records found");
        return;
    }

    println!("\n{}", "=".repeat(60));
    println!("Cards - {}", region.as_str().to_uppercase());
    println!("{}\n", "=".repeat(60));

    for (i, bundle) in batch.iter().enumerate() {
        let card = &bundle.card;
        println!("{}. {}", i + 1, card.name_en);
        if card.name != card.name_en {
            println!("   Name: {}", card.name);
        }
        println!("   Bank: {}", card.bank_en);
        println!("   Issuer: {}", card.issuer);
        println!("   Description: {}", card.description_en);
        println!("   Benefits: {}", bundle.benefits.len());
        if let Some(photo) = &card.photo {
            println!("   Photo: {}", photo);
        }
        println!();
    }
}
