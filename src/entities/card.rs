// 💳 Card Entity - one credit-card product
//
// Identity is the canonical English name (nameEn): the persister dedups on
// it and the SQL artifact resolves foreign keys through it. Generated ids
// only exist inside the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::Benefit;

// ============================================================================
// REGION
// ============================================================================

/// Market a card catalog belongs to.
///
/// Lowercase on the wire: JSON artifact, SQL `region` column and the CLI
/// flag all use the same spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    America,
    Canada,
    Taiwan,
    Japan,
    Singapore,
}

impl Region {
    /// Every selectable region
    pub const ALL: [Region; 5] = [
        Region::America,
        Region::Canada,
        Region::Taiwan,
        Region::Japan,
        Region::Singapore,
    ];

    /// Wire name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::America => "america",
            Region::Canada => "canada",
            Region::Taiwan => "taiwan",
            Region::Japan => "japan",
            Region::Singapore => "singapore",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "america" => Ok(Region::America),
            "canada" => Ok(Region::Canada),
            "taiwan" => Ok(Region::Taiwan),
            "japan" => Ok(Region::Japan),
            "singapore" => Ok(Region::Singapore),
            other => Err(anyhow::anyhow!(
                "unknown region '{}' (expected america, canada, taiwan, japan or singapore)",
                other
            )),
        }
    }
}

// ============================================================================
// CARD
// ============================================================================

/// One credit-card product.
///
/// Rust fields are snake_case; the wire names are camelCase and double as
/// the SQL column names, so they are part of the external contract and
/// never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Localized display name
    pub name: String,

    /// Canonical English name - the natural key
    pub name_en: String,

    pub bank: String,
    pub bank_en: String,

    /// Card network or issuing organization (Visa, Mastercard, ...)
    pub issuer: String,

    pub region: Region,

    pub description: String,
    pub description_en: String,

    /// Optional reference path to a card image
    pub photo: Option<String>,

    pub is_active: bool,
}

// ============================================================================
// CARD BUNDLE
// ============================================================================

/// A card together with its normalized benefits - the unit the persister
/// and the emitters work on. Serializes to the nested artifact shape
/// (card fields flattened, `benefits` array alongside).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBundle {
    #[serde(flatten)]
    pub card: Card,
    pub benefits: Vec<Benefit>,
}

impl CardBundle {
    pub fn new(card: Card, benefits: Vec<Benefit>) -> Self {
        CardBundle { card, benefits }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_wire_names_round_trip() {
        for region in Region::ALL {
            let parsed: Region = region.as_str().parse().unwrap();
            assert_eq!(parsed, region, "as_str/from_str should round-trip");
        }
    }

    #[test]
    fn test_region_parse_is_case_insensitive() {
        let region: Region = "AMERICA".parse().unwrap();
        assert_eq!(region, Region::America);
    }

    #[test]
    fn test_region_parse_rejects_unknown() {
        assert!("europe".parse::<Region>().is_err());
    }

    #[test]
    fn test_card_serializes_with_camel_case_wire_names() {
        let card = Card {
            name: "測試卡".to_string(),
            name_en: "Test Card".to_string(),
            bank: "測試銀行".to_string(),
            bank_en: "Test Bank".to_string(),
            issuer: "Visa".to_string(),
            region: Region::America,
            description: "".to_string(),
            description_en: "".to_string(),
            photo: None,
            is_active: true,
        };

        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["nameEn"], "Test Card");
        assert_eq!(json["bankEn"], "Test Bank");
        assert_eq!(json["region"], "america");
        assert_eq!(json["isActive"], true);
        // photo is present-but-null, never omitted
        assert!(json.get("photo").is_some());
        assert!(json["photo"].is_null());
    }

    #[test]
    fn test_bundle_flattens_card_fields() {
        let card = Card {
            name: "X".to_string(),
            name_en: "X".to_string(),
            bank: "B".to_string(),
            bank_en: "B".to_string(),
            issuer: "Visa".to_string(),
            region: Region::Canada,
            description: "".to_string(),
            description_en: "".to_string(),
            photo: Some("/images/cards/x.jpg".to_string()),
            is_active: true,
        };
        let bundle = CardBundle::new(card, Vec::new());

        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["nameEn"], "X");
        assert_eq!(json["photo"], "/images/cards/x.jpg");
        assert_eq!(json["benefits"].as_array().unwrap().len(), 0);
    }
}
