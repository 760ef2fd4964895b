// 🧾 Artifact Emitter - SQL and JSON renderings of a normalized batch
//
// Pure text generation, nothing here touches the store. The SQL flavor
// targets the same schema the persister writes, with benefits linked to
// their card through a nameEn subquery so the script survives unknown
// row ids. String values are escaped by doubling single quotes.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entities::{CardBundle, Region};
use crate::report::{ArtifactKind, PipelineEvent, Reporter};

// ============================================================================
// SQL ARTIFACT
// ============================================================================

/// Escape a value for direct interpolation into an SQL string literal
fn sql_str(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn sql_opt(value: Option<&str>) -> String {
    match value {
        Some(v) => sql_str(v),
        None => "NULL".to_string(),
    }
}

/// Render a nullable amount. NULL is a domain value here, never 0.
fn sql_amount(amount: Option<f64>) -> String {
    match amount {
        Some(a) => a.to_string(),
        None => "NULL".to_string(),
    }
}

fn sql_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Render the seeding script for a batch: one CreditCard INSERT per card
/// followed by one Benefit INSERT per benefit.
pub fn render_sql(region: Region, batch: &[CardBundle], generated_at: DateTime<Utc>) -> String {
    let mut statements: Vec<String> = Vec::new();

    statements.push(format!("-- Credit Cards for {}", region.as_str().to_uppercase()));
    statements.push(format!("-- Generated at {}\n", generated_at.to_rfc3339()));

    for bundle in batch {
        let card = &bundle.card;

        statements.push(format!("-- {}", card.name_en));
        statements.push(format!(
            "INSERT INTO CreditCard (name, nameEn, bank, bankEn, issuer, region, \
             description, descriptionEn, photo, isActive, createdAt, updatedAt)\n\
             VALUES (\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  \
             datetime('now'),\n  datetime('now')\n);\n",
            sql_str(&card.name),
            sql_str(&card.name_en),
            sql_str(&card.bank),
            sql_str(&card.bank_en),
            sql_str(&card.issuer),
            sql_str(card.region.as_str()),
            sql_str(&card.description),
            sql_str(&card.description_en),
            sql_opt(card.photo.as_deref()),
            sql_bool(card.is_active),
        ));

        for benefit in &bundle.benefits {
            statements.push(format!(
                "INSERT INTO Benefit (cardId, category, categoryEn, title, titleEn, \
                 description, descriptionEn, amount, currency, frequency, startMonth, \
                 startDay, endMonth, endDay, reminderDays, isActive, createdAt, updatedAt)\n\
                 VALUES (\n  (SELECT id FROM CreditCard WHERE nameEn = {}),\n  {},\n  {},\n  \
                 {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  {},\n  \
                 {},\n  {},\n  datetime('now'),\n  datetime('now')\n);\n",
                sql_str(&card.name_en),
                sql_str(&benefit.category),
                sql_str(&benefit.category_en),
                sql_str(&benefit.title),
                sql_str(&benefit.title_en),
                sql_str(&benefit.description),
                sql_str(&benefit.description_en),
                sql_amount(benefit.amount),
                sql_str(&benefit.currency),
                sql_str(benefit.frequency.as_str()),
                benefit.start_month,
                benefit.start_day,
                benefit.end_month,
                benefit.end_day,
                benefit.reminder_days,
                sql_bool(benefit.is_active),
            ));
        }

        statements.push(String::new());
    }

    statements.join("\n")
}

// ============================================================================
// JSON ARTIFACT
// ============================================================================

/// Envelope of the JSON artifact - the cross-language wire contract
#[derive(Debug, Serialize, Deserialize)]
pub struct CardExport {
    pub region: Region,
    pub generated_at: DateTime<Utc>,
    pub total_cards: usize,
    pub cards: Vec<CardBundle>,
}

pub fn render_json(
    region: Region,
    batch: &[CardBundle],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let export = CardExport {
        region,
        generated_at,
        total_cards: batch.len(),
        cards: batch.to_vec(),
    };

    serde_json::to_string_pretty(&export).context("serializing card export")
}

// ============================================================================
// FILE OUTPUT
// ============================================================================

/// Write an artifact file as UTF-8. A failure here concerns this artifact
/// only; it never unwinds a persistence step that already committed.
pub fn write_artifact(
    path: &Path,
    kind: ArtifactKind,
    contents: &str,
    reporter: &dyn Reporter,
) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("writing {} artifact to {}", kind.as_str(), path.display()))?;

    reporter.report(PipelineEvent::ArtifactWritten {
        kind,
        path: path.display().to_string(),
    });

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
