// 🌐 Card Sources - raw record producers
//
// A source yields RawCards for one region. The live source does a blocking
// page fetch and a best-effort scan for card containers; every failure
// (connect, timeout, bad status, zero usable candidates) degrades to the
// injected fallback source and is surfaced only as reporter events. No
// fetch error ever reaches the caller.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog;
use crate::entities::Region;
use crate::report::{PipelineEvent, Reporter};

/// Whole-request limit for the live fetch before degrading to fallback
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Heading text shorter than this is treated as page noise
const MIN_NAME_CHARS: usize = 3;

/// Cap on page candidates, so a noisy page cannot flood the batch
const MAX_PAGE_CANDIDATES: usize = 5;

/// American Express US card listing
const AMEX_CARDS_URL: &str = "https://www.americanexpress.com/us/credit-cards/";

/// Desktop browser agent; the card pages reject obvious bot agents
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ============================================================================
// RAW RECORDS
// ============================================================================

/// RawCard - a candidate record as produced by a source, before
/// normalization. Only `nameEn` is load-bearing; everything else may be
/// missing or blank and gets defaulted or dropped by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub name: Option<String>,
    pub name_en: Option<String>,
    pub bank: Option<String>,
    pub bank_en: Option<String>,
    pub issuer: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub photo: Option<String>,
    #[serde(default)]
    pub benefits: Vec<RawBenefit>,
}

impl RawCard {
    /// Create a raw record with the always-extracted text fields
    pub fn new(
        name: &str,
        name_en: &str,
        bank: &str,
        bank_en: &str,
        issuer: &str,
        description: &str,
        description_en: &str,
    ) -> Self {
        RawCard {
            name: Some(name.to_string()),
            name_en: Some(name_en.to_string()),
            bank: Some(bank.to_string()),
            bank_en: Some(bank_en.to_string()),
            issuer: Some(issuer.to_string()),
            region: None,
            description: Some(description.to_string()),
            description_en: Some(description_en.to_string()),
            photo: None,
            benefits: Vec::new(),
        }
    }

    /// Builder pattern: set the market this record belongs to
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region.as_str().to_string());
        self
    }

    /// Builder pattern: attach a card image path
    pub fn with_photo(mut self, photo: &str) -> Self {
        self.photo = Some(photo.to_string());
        self
    }

    /// Builder pattern: attach the benefit list
    pub fn with_benefits(mut self, benefits: Vec<RawBenefit>) -> Self {
        self.benefits = benefits;
        self
    }
}

/// RawBenefit - one perk as carried by a raw record. `titleEn`, `currency`
/// and `frequency` are required downstream; the window and reminder fields
/// default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBenefit {
    pub category: Option<String>,
    pub category_en: Option<String>,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub frequency: Option<String>,
    pub start_month: Option<u8>,
    pub start_day: Option<u8>,
    pub end_month: Option<u8>,
    pub end_day: Option<u8>,
    pub reminder_days: Option<u32>,
}

impl RawBenefit {
    /// Create a raw benefit with the always-present text fields
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        category: &str,
        category_en: &str,
        title: &str,
        title_en: &str,
        description: &str,
        description_en: &str,
        currency: &str,
        frequency: &str,
    ) -> Self {
        RawBenefit {
            category: Some(category.to_string()),
            category_en: Some(category_en.to_string()),
            title: Some(title.to_string()),
            title_en: Some(title_en.to_string()),
            description: Some(description.to_string()),
            description_en: Some(description_en.to_string()),
            amount: None,
            currency: Some(currency.to_string()),
            frequency: Some(frequency.to_string()),
            start_month: None,
            start_day: None,
            end_month: None,
            end_day: None,
            reminder_days: None,
        }
    }

    /// Builder pattern: set a monetary cap (absent means non-monetary)
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Builder pattern: override the 30-day reminder lead
    pub fn with_reminder_days(mut self, days: u32) -> Self {
        self.reminder_days = Some(days);
        self
    }
}

// ============================================================================
// CARD SOURCE TRAIT
// ============================================================================

/// A producer of raw card records.
///
/// `fetch` is infallible by contract: implementations hide their failures,
/// degrade to whatever they can produce and report what happened through
/// the event interface.
pub trait CardSource {
    fn fetch(&self, reporter: &dyn Reporter) -> Vec<RawCard>;
}

// ============================================================================
// STATIC CATALOG SOURCE
// ============================================================================

/// The embedded catalog as an explicit, injectable source.
///
/// Not a cache of a prior fetch: the tables are compiled in, used exactly
/// because live scraping of the card pages is best-effort.
pub struct StaticCatalogSource {
    region: Region,
    cards: Vec<RawCard>,
}

impl StaticCatalogSource {
    /// Built-in catalog for a region
    pub fn new(region: Region) -> Self {
        StaticCatalogSource {
            region,
            cards: catalog::builtin_cards(region),
        }
    }

    /// Built-in American Express table (america market)
    pub fn amex() -> Self {
        StaticCatalogSource {
            region: Region::America,
            cards: catalog::amex_cards(),
        }
    }
}

impl CardSource for StaticCatalogSource {
    fn fetch(&self, reporter: &dyn Reporter) -> Vec<RawCard> {
        reporter.report(PipelineEvent::FallbackUsed {
            region: self.region,
            count: self.cards.len(),
        });
        self.cards.clone()
    }
}

// ============================================================================
// WEB SOURCE
// ============================================================================

/// Live page fetch with degrade-to-fallback.
pub struct WebCardSource<F: CardSource> {
    region: Region,
    url: String,
    bank_hint: Option<String>,
    timeout: Duration,
    fallback: F,
}

impl WebCardSource<StaticCatalogSource> {
    /// Search-driven source for a region, backed by the built-in catalog
    pub fn for_region(region: Region) -> Self {
        WebCardSource::new(region, search_url(region), StaticCatalogSource::new(region))
    }

    /// American Express card listing, backed by the built-in Amex table
    pub fn amex() -> Self {
        WebCardSource::new(Region::America, AMEX_CARDS_URL, StaticCatalogSource::amex())
            .with_bank_hint("American Express")
    }
}

impl<F: CardSource> WebCardSource<F> {
    /// Live source with a caller-chosen fallback
    pub fn new(region: Region, url: impl Into<String>, fallback: F) -> Self {
        WebCardSource {
            region,
            url: url.into(),
            bank_hint: None,
            timeout: FETCH_TIMEOUT,
            fallback,
        }
    }

    /// Builder pattern: attribute parsed candidates to this bank
    pub fn with_bank_hint(mut self, bank: &str) -> Self {
        self.bank_hint = Some(bank.to_string());
        self
    }

    /// Builder pattern: override the fetch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fetch_live(&self) -> Result<Vec<RawCard>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("building HTTP client")?;

        let response = client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .context("requesting card page")?
            .error_for_status()
            .context("card page returned an error status")?;

        let body = response.text().context("reading card page body")?;

        Ok(parse_card_page(
            &body,
            self.region,
            self.bank_hint.as_deref(),
        ))
    }
}

impl<F: CardSource> CardSource for WebCardSource<F> {
    fn fetch(&self, reporter: &dyn Reporter) -> Vec<RawCard> {
        reporter.report(PipelineEvent::FetchStarted {
            region: self.region,
            url: self.url.clone(),
        });

        match self.fetch_live() {
            Ok(cards) if !cards.is_empty() => {
                reporter.report(PipelineEvent::FetchCompleted { count: cards.len() });
                cards
            }
            Ok(_) => {
                reporter.report(PipelineEvent::FetchFailed {
                    reason: "page yielded no usable card candidates".to_string(),
                });
                self.fallback.fetch(reporter)
            }
            Err(err) => {
                reporter.report(PipelineEvent::FetchFailed {
                    reason: format!("{:#}", err),
                });
                self.fallback.fetch(reporter)
            }
        }
    }
}

// ============================================================================
// PAGE HEURISTIC
// ============================================================================

/// Best-effort scan of a card listing page. Explicitly allowed to return
/// an empty list; the caller degrades to its fallback in that case.
///
/// Containers are elements whose class mentions card or product; the first
/// heading inside one is taken as the card name, names shorter than 3
/// characters are discarded, and at most the first 5 containers count.
pub fn parse_card_page(html: &str, region: Region, bank_hint: Option<&str>) -> Vec<RawCard> {
    let document = Html::parse_document(html);

    // class substring match stands in for the card|product pattern
    let containers =
        Selector::parse(r#"div[class*="card"], div[class*="product"]"#).unwrap();
    let headings = Selector::parse("h2, h3, h4").unwrap();

    let mut cards = Vec::new();

    for element in document.select(&containers).take(MAX_PAGE_CANDIDATES) {
        let heading = match element.select(&headings).next() {
            Some(h) => h,
            None => continue,
        };

        let name = heading.text().collect::<String>().trim().to_string();
        if name.chars().count() < MIN_NAME_CHARS {
            continue;
        }

        let bank = bank_hint.unwrap_or("");
        let description = if bank.is_empty() {
            name.clone()
        } else {
            format!("{} {}", bank, name)
        };

        cards.push(
            RawCard::new(&name, &name, bank, bank, bank, &description, &description)
                .with_region(region),
        );
    }

    cards
}

/// Search page for a market. Rarely yields parseable containers in
/// practice, which is exactly what the fallback catalog is for.
pub fn search_url(region: Region) -> String {
    format!(
        "https://html.duckduckgo.com/html/?q={}",
        urlencoding::encode(&region_query(region))
    )
}

fn region_query(region: Region) -> String {
    match region {
        Region::America => "best credit cards USA 2025 rewards cashback".to_string(),
        Region::Canada => "best credit cards Canada 2025 rewards".to_string(),
        Region::Japan => "best credit cards Japan 2025 rewards".to_string(),
        other => format!("best credit cards {} 2025", other),
    }
}

// ============================================================================
// TESTS
// ============================================================================
