// 💾 SQLite Persistence - deduplicating card/benefit writes
//
// Natural keys: CreditCard.nameEn and Benefit (cardId, titleEn). Dedup is
// check-then-insert, never upsert: the first write wins and an existing
// row is left untouched. A whole batch runs in one transaction, so a
// storage error mid-batch leaves the database exactly as it was.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::entities::{Benefit, Card, CardBundle};
use crate::report::{PipelineEvent, Reporter};

/// Outcome of persisting one card and its benefits
#[derive(Debug, Clone, PartialEq)]
pub struct PersistResult {
    pub name_en: String,
    pub card_id: i64,
    pub card_inserted: bool,
    pub inserted_benefits: usize,
    pub skipped_benefits: usize,
}

/// Aggregate outcome of one persisted batch
#[derive(Debug, Clone, Default)]
pub struct PersistSummary {
    pub cards_inserted: usize,
    pub cards_skipped: usize,
    pub benefits_inserted: usize,
    pub benefits_skipped: usize,
    pub results: Vec<PersistResult>,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS CreditCard (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            nameEn TEXT UNIQUE NOT NULL,
            bank TEXT NOT NULL,
            bankEn TEXT NOT NULL,
            issuer TEXT NOT NULL,
            region TEXT NOT NULL,
            description TEXT NOT NULL,
            descriptionEn TEXT NOT NULL,
            photo TEXT,
            isActive INTEGER NOT NULL DEFAULT 1,
            createdAt TEXT NOT NULL,
            updatedAt TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Benefit (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cardId INTEGER NOT NULL REFERENCES CreditCard(id),
            category TEXT NOT NULL,
            categoryEn TEXT NOT NULL,
            title TEXT NOT NULL,
            titleEn TEXT NOT NULL,
            description TEXT NOT NULL,
            descriptionEn TEXT NOT NULL,
            amount REAL,
            currency TEXT NOT NULL,
            frequency TEXT NOT NULL,
            startMonth INTEGER NOT NULL DEFAULT 1,
            startDay INTEGER NOT NULL DEFAULT 1,
            endMonth INTEGER NOT NULL DEFAULT 12,
            endDay INTEGER NOT NULL DEFAULT 31,
            reminderDays INTEGER NOT NULL DEFAULT 30,
            isActive INTEGER NOT NULL DEFAULT 1,
            createdAt TEXT NOT NULL,
            updatedAt TEXT NOT NULL,
            UNIQUE (cardId, titleEn)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_card_region ON CreditCard(region)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_benefit_card ON Benefit(cardId)",
        [],
    )?;

    Ok(())
}

/// Persist a normalized batch inside a single transaction.
///
/// Commits only after every bundle went through; any error unwinds the
/// whole batch. Duplicate cards and benefits are skipped, never updated.
pub fn persist_batch(
    conn: &mut Connection,
    batch: &[CardBundle],
    reporter: &dyn Reporter,
) -> Result<PersistSummary> {
    let tx = conn.transaction().context("opening batch transaction")?;
    let mut summary = PersistSummary::default();

    for bundle in batch {
        let result = persist_card(&tx, &bundle.card, &bundle.benefits, reporter)?;

        if result.card_inserted {
            summary.cards_inserted += 1;
        } else {
            summary.cards_skipped += 1;
        }
        summary.benefits_inserted += result.inserted_benefits;
        summary.benefits_skipped += result.skipped_benefits;
        summary.results.push(result);
    }

    tx.commit().context("committing batch")?;

    reporter.report(PipelineEvent::BatchCommitted {
        cards_inserted: summary.cards_inserted,
        cards_skipped: summary.cards_skipped,
        benefits_inserted: summary.benefits_inserted,
        benefits_skipped: summary.benefits_skipped,
    });

    Ok(summary)
}

/// Persist one card and its benefits, deduplicating on the natural keys.
/// Runs inside whatever transaction the connection is in.
pub fn persist_card(
    conn: &Connection,
    card: &Card,
    benefits: &[Benefit],
    reporter: &dyn Reporter,
) -> Result<PersistResult> {
    let now = Utc::now().to_rfc3339();

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM CreditCard WHERE nameEn = ?1",
            params![card.name_en],
            |row| row.get(0),
        )
        .optional()
        .context("looking up card by nameEn")?;

    let (card_id, card_inserted) = match existing {
        Some(id) => {
            // first write wins: the existing row is left untouched
            reporter.report(PipelineEvent::CardSkipped {
                name_en: card.name_en.clone(),
                card_id: id,
            });
            (id, false)
        }
        None => {
            conn.execute(
                "INSERT INTO CreditCard (
                    name, nameEn, bank, bankEn, issuer, region,
                    description, descriptionEn, photo, isActive,
                    createdAt, updatedAt
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    card.name,
                    card.name_en,
                    card.bank,
                    card.bank_en,
                    card.issuer,
                    card.region.as_str(),
                    card.description,
                    card.description_en,
                    card.photo,
                    card.is_active,
                    now,
                    now,
                ],
            )
            .context("inserting card")?;

            let id = conn.last_insert_rowid();
            reporter.report(PipelineEvent::CardInserted {
                name_en: card.name_en.clone(),
                card_id: id,
            });
            (id, true)
        }
    };

    let mut inserted_benefits = 0;
    let mut skipped_benefits = 0;

    for benefit in benefits {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM Benefit WHERE cardId = ?1 AND titleEn = ?2",
                params![card_id, benefit.title_en],
                |row| row.get(0),
            )
            .optional()
            .context("looking up benefit by (cardId, titleEn)")?;

        if exists.is_some() {
            skipped_benefits += 1;
            reporter.report(PipelineEvent::BenefitSkipped {
                card_id,
                title_en: benefit.title_en.clone(),
            });
            continue;
        }

        conn.execute(
            "INSERT INTO Benefit (
                cardId, category, categoryEn, title, titleEn,
                description, descriptionEn, amount, currency, frequency,
                startMonth, startDay, endMonth, endDay, reminderDays,
                isActive, createdAt, updatedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                card_id,
                benefit.category,
                benefit.category_en,
                benefit.title,
                benefit.title_en,
                benefit.description,
                benefit.description_en,
                benefit.amount,
                benefit.currency,
                benefit.frequency.as_str(),
                benefit.start_month,
                benefit.start_day,
                benefit.end_month,
                benefit.end_day,
                benefit.reminder_days,
                benefit.is_active,
                now,
                now,
            ],
        )
        .context("inserting benefit")?;

        inserted_benefits += 1;
        reporter.report(PipelineEvent::BenefitInserted {
            card_id,
            title_en: benefit.title_en.clone(),
        });
    }

    Ok(PersistResult {
        name_en: card.name_en.clone(),
        card_id,
        card_inserted,
        inserted_benefits,
        skipped_benefits,
    })
}

pub fn card_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM CreditCard", [], |row| row.get(0))?;

    Ok(count)
}

pub fn benefit_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM Benefit", [], |row| row.get(0))?;

    Ok(count)
}

/// Look up a card id by its natural key
pub fn find_card_id(conn: &Connection, name_en: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM CreditCard WHERE nameEn = ?1",
        params![name_en],
        |row| row.get(0),
    )
    .optional()
    .context("looking up card by nameEn")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Frequency, Region};
    use crate::report::{CapturingReporter, NullReporter};

    /// Helper to build a card with the fields the schema requires
    fn test_card(name_en: &str) -> Card {
        Card {
            name: format!("{} 測試", name_en),
            name_en: name_en.to_string(),
            bank: "Test Bank".to_string(),
            bank_en: "Test Bank".to_string(),
            issuer: "Visa".to_string(),
            region: Region::America,
            description: "測試卡".to_string(),
            description_en: "test card".to_string(),
            photo: None,
            is_active: true,
        }
    }

    fn test_benefit(title_en: &str, amount: Option<f64>) -> Benefit {
        Benefit {
            category: "回饋".to_string(),
            category_en: "Rewards".to_string(),
            title: format!("{} 測試", title_en),
            title_en: title_en.to_string(),
            description: "測試回饋".to_string(),
            description_en: "test benefit".to_string(),
            amount,
            currency: "USD".to_string(),
            frequency: Frequency::Monthly,
            start_month: 1,
            start_day: 1,
            end_month: 12,
            end_day: 31,
            reminder_days: 7,
            is_active: true,
        }
    }

    fn test_batch() -> Vec<CardBundle> {
        vec![
            CardBundle::new(
                test_card("Alpha Card"),
                vec![
                    test_benefit("Alpha Travel Credit", Some(300.0)),
                    test_benefit("Alpha Lounge Access", None),
                ],
            ),
            CardBundle::new(test_card("Beta Card"), vec![test_benefit("Beta Cash Back", None)]),
        ]
    }

    #[test]
    fn test_persist_twice_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let batch = test_batch();

        // First run
        let first = persist_batch(&mut conn, &batch, &NullReporter).unwrap();
        assert_eq!(first.cards_inserted, 2);
        assert_eq!(first.benefits_inserted, 3);
        assert_eq!(card_count(&conn).unwrap(), 2);
        assert_eq!(benefit_count(&conn).unwrap(), 3);

        // Second run (same batch)
        let second = persist_batch(&mut conn, &batch, &NullReporter).unwrap();
        assert_eq!(second.cards_inserted, 0, "second run must insert no cards");
        assert_eq!(second.cards_skipped, 2);
        assert_eq!(second.benefits_inserted, 0);
        assert_eq!(second.benefits_skipped, 3);
        assert_eq!(card_count(&conn).unwrap(), 2);
        assert_eq!(benefit_count(&conn).unwrap(), 3);

        // skipped cards resolve to the exact ids of the first run
        for (a, b) in first.results.iter().zip(second.results.iter()) {
            assert_eq!(a.card_id, b.card_id, "card id must be stable across runs");
        }

        println!("✅ Idempotency test PASSED: second run inserted nothing");
    }

    #[test]
    fn test_duplicate_name_en_within_one_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let batch = vec![
            CardBundle::new(test_card("Twin Card"), vec![test_benefit("Twin Perk", None)]),
            CardBundle::new(test_card("Twin Card"), vec![test_benefit("Twin Perk", None)]),
        ];

        let summary = persist_batch(&mut conn, &batch, &NullReporter).unwrap();

        assert_eq!(summary.cards_inserted, 1);
        assert_eq!(summary.cards_skipped, 1);
        assert_eq!(summary.benefits_inserted, 1);
        assert_eq!(summary.benefits_skipped, 1);
        assert_eq!(card_count(&conn).unwrap(), 1);
        assert_eq!(summary.results[0].card_id, summary.results[1].card_id);
    }

    #[test]
    fn test_existing_card_gains_new_benefits() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let first = vec![CardBundle::new(
            test_card("Growing Card"),
            vec![test_benefit("Original Perk", None)],
        )];
        persist_batch(&mut conn, &first, &NullReporter).unwrap();

        // same card again, one duplicate perk and one new perk
        let second = vec![CardBundle::new(
            test_card("Growing Card"),
            vec![
                test_benefit("Original Perk", None),
                test_benefit("Added Perk", Some(50.0)),
            ],
        )];
        let summary = persist_batch(&mut conn, &second, &NullReporter).unwrap();

        assert_eq!(summary.cards_inserted, 0);
        assert_eq!(summary.benefits_inserted, 1);
        assert_eq!(summary.benefits_skipped, 1);
        assert_eq!(card_count(&conn).unwrap(), 1);
        assert_eq!(benefit_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_null_amount_round_trips_as_null() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let batch = vec![CardBundle::new(
            test_card("Null Amount Card"),
            vec![test_benefit("Non-monetary Perk", None)],
        )];
        persist_batch(&mut conn, &batch, &NullReporter).unwrap();

        let amount: Option<f64> = conn
            .query_row(
                "SELECT amount FROM Benefit WHERE titleEn = ?1",
                params!["Non-monetary Perk"],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(amount, None, "absent amount must be stored as NULL, not 0");

        println!("✅ NULL amount test PASSED");
    }

    #[test]
    fn test_same_title_under_different_cards_is_allowed() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let batch = vec![
            CardBundle::new(test_card("Card One"), vec![test_benefit("Shared Perk", None)]),
            CardBundle::new(test_card("Card Two"), vec![test_benefit("Shared Perk", None)]),
        ];
        let summary = persist_batch(&mut conn, &batch, &NullReporter).unwrap();

        // the benefit key is scoped to the card
        assert_eq!(summary.benefits_inserted, 2);
        assert_eq!(benefit_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_failed_batch_rolls_back_entirely() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        // sabotage the benefit table so the second half of the write fails
        conn.execute("DROP TABLE Benefit", []).unwrap();

        let batch = vec![CardBundle::new(
            test_card("Doomed Card"),
            vec![test_benefit("Doomed Perk", None)],
        )];
        let result = persist_batch(&mut conn, &batch, &NullReporter);

        assert!(result.is_err());
        assert_eq!(
            card_count(&conn).unwrap(),
            0,
            "failed batch must leave no partial writes"
        );

        println!("✅ Rollback test PASSED: no partial writes survived");
    }

    #[test]
    fn test_persist_events_are_reported() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let reporter = CapturingReporter::new();
        let batch = test_batch();
        persist_batch(&mut conn, &batch, &reporter).unwrap();

        let inserts =
            reporter.count_matching(|e| matches!(e, PipelineEvent::CardInserted { .. }));
        let commits =
            reporter.count_matching(|e| matches!(e, PipelineEvent::BatchCommitted { .. }));
        assert_eq!(inserts, 2);
        assert_eq!(commits, 1);

        // the commit event carries the summary numbers
        let events = reporter.events();
        match events.last().unwrap() {
            PipelineEvent::BatchCommitted {
                cards_inserted,
                benefits_inserted,
                ..
            } => {
                assert_eq!(*cards_inserted, 2);
                assert_eq!(*benefits_inserted, 3);
            }
            other => panic!("expected BatchCommitted, got {:?}", other),
        }
    }

    #[test]
    fn test_find_card_id() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        persist_batch(&mut conn, &test_batch(), &NullReporter).unwrap();

        let id = find_card_id(&conn, "Alpha Card").unwrap();
        assert!(id.is_some());
        assert_eq!(find_card_id(&conn, "No Such Card").unwrap(), None);
    }
}
