// 📇 Built-in Card Catalog - deterministic fallback tables
//
// Static per-region card data compiled into the binary, served whenever a
// live fetch fails or yields nothing. Not a cache: the tables exist
// precisely because scraping the card pages is best-effort. Every record
// here passes normalization without drops.

use crate::entities::Region;
use crate::source::{RawBenefit, RawCard};

/// Built-in catalog for a region. Never empty.
pub fn builtin_cards(region: Region) -> Vec<RawCard> {
    match region {
        Region::America => america_cards(),
        Region::Canada => canada_cards(),
        Region::Taiwan => taiwan_cards(),
        Region::Japan => japan_cards(),
        Region::Singapore => singapore_cards(),
    }
}

fn america_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "Chase Sapphire Preferred",
            "Chase Sapphire Preferred® Card",
            "Chase",
            "Chase Bank",
            "Visa",
            "旅行回饋信用卡，享2-5倍積分",
            "Travel rewards card with 2-5x points",
        )
        .with_region(Region::America)
        .with_benefits(vec![
            RawBenefit::new(
                "旅行回饋",
                "Travel Rewards",
                "旅行預訂5倍積分",
                "5x Points on Travel",
                "透過Chase旅行網站預訂獲得5倍積分",
                "5x points on travel purchased through Chase Travel",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "餐飲回饋",
                "Dining Rewards",
                "餐廳3倍積分",
                "3x Points on Dining",
                "餐廳消費獲得3倍積分",
                "3x points on dining",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "新戶禮",
                "Sign-up Bonus",
                "開卡禮60,000積分",
                "60,000 Bonus Points",
                "開卡三個月內消費$4,000獲得60,000積分",
                "60,000 bonus points after spending $4,000 in first 3 months",
                "POINTS",
                "ONE_TIME",
            )
            .with_amount(60000.0),
        ]),
        RawCard::new(
            "Capital One Venture X",
            "Capital One Venture X Rewards Credit Card",
            "Capital One",
            "Capital One",
            "Visa",
            "高端旅行信用卡，提供機場貴賓室和旅行回饋",
            "Premium travel card with lounge access and travel credits",
        )
        .with_region(Region::America)
        .with_benefits(vec![
            RawBenefit::new(
                "旅行回饋",
                "Travel Rewards",
                "所有消費2倍里程",
                "2x Miles on Everything",
                "所有消費獲得2倍里程",
                "2x miles on every purchase",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "旅行回饋",
                "Travel Credit",
                "年度旅行回饋$300",
                "$300 Annual Travel Credit",
                "每年$300旅行回饋",
                "$300 annual travel credit",
                "USD",
                "YEARLY",
            )
            .with_amount(300.0),
            RawBenefit::new(
                "機場貴賓室",
                "Airport Lounge",
                "機場貴賓室通行證",
                "Airport Lounge Access",
                "Priority Pass貴賓室和Capital One機場貴賓室",
                "Priority Pass and Capital One Lounge access",
                "USD",
                "YEARLY",
            ),
        ]),
        RawCard::new(
            "Citi Double Cash Card",
            "Citi® Double Cash Card",
            "Citibank",
            "Citibank",
            "Mastercard",
            "無年費2%現金回饋卡",
            "No annual fee 2% cash back card",
        )
        .with_region(Region::America)
        .with_benefits(vec![RawBenefit::new(
            "現金回饋",
            "Cash Back",
            "所有消費2%現金回饋",
            "2% Cash Back on Everything",
            "購買時1%，付款時再1%，總計2%",
            "1% when you buy, 1% when you pay, totaling 2%",
            "USD",
            "YEARLY",
        )]),
    ]
}

/// American Express vendor table, served when the card listing page
/// cannot be fetched or parsed.
pub fn amex_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "American Express 白金卡",
            "The Platinum Card® from American Express",
            "American Express",
            "American Express",
            "American Express",
            "高端旅行信用卡，提供全球機場貴賓室、飯店禮遇和旅行回饋",
            "Premium travel card with global lounge access, hotel benefits, and travel rewards",
        )
        .with_region(Region::America)
        .with_photo("/images/cards/amex-platinum.jpg")
        .with_benefits(vec![
            RawBenefit::new(
                "機場貴賓室",
                "Airport Lounge",
                "全球機場貴賓室通行證",
                "Global Lounge Access",
                "免費使用全球1,400+機場貴賓室（包含美國運通Centurion、Priority Pass等）",
                "Free access to 1,400+ airport lounges worldwide (including Amex Centurion, Priority Pass)",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "旅行回饋",
                "Travel Credit",
                "年度飯店回饋$200",
                "$200 Annual Hotel Credit",
                "每年可獲得$200飯店預訂回饋",
                "$200 annual hotel credit through Amex Travel",
                "USD",
                "YEARLY",
            )
            .with_amount(200.0),
            RawBenefit::new(
                "旅行回饋",
                "Airline Credit",
                "年度航空回饋$200",
                "$200 Annual Airline Fee Credit",
                "每年$200航空雜費回饋（托運行李、機上餐飲等）",
                "$200 annual airline fee credit for baggage, in-flight purchases",
                "USD",
                "YEARLY",
            )
            .with_amount(200.0),
            RawBenefit::new(
                "串流服務",
                "Streaming Credit",
                "串流服務每月$20回饋",
                "$20 Monthly Streaming Credit",
                "符合條件的串流媒體服務每月$20回饋",
                "$20 monthly credit for eligible streaming services",
                "USD",
                "MONTHLY",
            )
            .with_amount(20.0)
            .with_reminder_days(7),
        ]),
        RawCard::new(
            "American Express 金卡",
            "American Express® Gold Card",
            "American Express",
            "American Express",
            "American Express",
            "餐飲和超市消費最佳選擇，提供4倍積分回饋",
            "Best for dining and groceries with 4x points",
        )
        .with_region(Region::America)
        .with_photo("/images/cards/amex-gold.jpg")
        .with_benefits(vec![
            RawBenefit::new(
                "餐飲回饋",
                "Dining Rewards",
                "餐廳消費4倍積分",
                "4x Points on Restaurants",
                "全球餐廳消費獲得4倍積分（每年最高$50,000）",
                "4x points at restaurants worldwide (up to $50,000 per year)",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "超市回饋",
                "Grocery Rewards",
                "超市消費4倍積分",
                "4x Points at Supermarkets",
                "美國超市消費4倍積分（每年最高$25,000）",
                "4x points at U.S. supermarkets (up to $25,000 per year)",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "餐飲回饋",
                "Dining Credit",
                "Uber Cash每月$10",
                "$10 Monthly Uber Cash",
                "每月$10 Uber Cash用於搭車或Uber Eats",
                "$10 monthly Uber Cash for rides or Uber Eats",
                "USD",
                "MONTHLY",
            )
            .with_amount(10.0)
            .with_reminder_days(7),
            RawBenefit::new(
                "餐飲回饋",
                "Dining Credit",
                "餐廳回饋每月$10",
                "$10 Monthly Dining Credit",
                "符合條件的餐廳每月$10回饋",
                "$10 monthly dining credit at select restaurants",
                "USD",
                "MONTHLY",
            )
            .with_amount(10.0)
            .with_reminder_days(7),
        ]),
        RawCard::new(
            "American Express 藍色現金天天卡",
            "Blue Cash Everyday® Card from American Express",
            "American Express",
            "American Express",
            "American Express",
            "無年費現金回饋卡，超市3%回饋",
            "No annual fee cash back card with 3% at U.S. supermarkets",
        )
        .with_region(Region::America)
        .with_photo("/images/cards/amex-blue-cash.jpg")
        .with_benefits(vec![
            RawBenefit::new(
                "超市回饋",
                "Grocery Cash Back",
                "超市3%現金回饋",
                "3% Cash Back at U.S. Supermarkets",
                "美國超市消費3%現金回饋（每年最高$6,000）",
                "3% cash back at U.S. supermarkets (up to $6,000 per year)",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "加油回饋",
                "Gas Cash Back",
                "加油站2%現金回饋",
                "2% Cash Back at Gas Stations",
                "美國加油站消費2%現金回饋",
                "2% cash back at U.S. gas stations",
                "USD",
                "YEARLY",
            ),
            RawBenefit::new(
                "串流服務",
                "Streaming Cash Back",
                "串流服務2%現金回饋",
                "2% Cash Back on Streaming",
                "符合條件的串流媒體服務2%現金回饋",
                "2% cash back on eligible streaming subscriptions",
                "USD",
                "YEARLY",
            ),
        ]),
    ]
}

fn canada_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "Scotiabank Gold American Express",
            "Scotiabank Gold American Express® Card",
            "Scotiabank",
            "Scotiabank",
            "American Express",
            "餐飲和娛樂5倍積分",
            "5x points on dining and entertainment",
        )
        .with_region(Region::Canada)
        .with_benefits(vec![RawBenefit::new(
            "餐飲回饋",
            "Dining Rewards",
            "餐飲娛樂5倍積分",
            "5x Points on Dining & Entertainment",
            "餐廳和娛樂消費5倍積分",
            "5x points on dining and entertainment",
            "CAD",
            "YEARLY",
        )]),
        RawCard::new(
            "TD Aeroplan Visa Infinite",
            "TD® Aeroplan® Visa Infinite* Card",
            "TD Bank",
            "TD Bank",
            "Visa",
            "加航Aeroplan積分最佳選擇",
            "Best for Air Canada Aeroplan points",
        )
        .with_region(Region::Canada)
        .with_benefits(vec![RawBenefit::new(
            "航空回饋",
            "Flight Rewards",
            "加航消費2倍積分",
            "2x Points on Air Canada",
            "加拿大航空消費2倍Aeroplan積分",
            "2x Aeroplan points on Air Canada purchases",
            "CAD",
            "YEARLY",
        )]),
    ]
}

fn taiwan_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "台新銀行 @GoGo 卡",
            "Taishin @GoGo Card",
            "台新銀行",
            "Taishin Bank",
            "Visa",
            "網購、行動支付最高 3.8% 回饋",
            "Up to 3.8% cashback on online shopping and mobile payments",
        )
        .with_region(Region::Taiwan)
        .with_benefits(vec![RawBenefit::new(
            "網購回饋",
            "Online Shopping",
            "網購通路 3.8% 回饋",
            "3.8% cashback on online shopping",
            "每月需完成任務，當月一般消費達 5,000 元",
            "Complete monthly mission: spend NT$5,000 on general purchases",
            "TWD",
            "MONTHLY",
        )
        .with_amount(800.0)
        .with_reminder_days(7)]),
        RawCard::new(
            "國泰世華 CUBE 卡",
            "Cathay CUBE Card",
            "國泰世華銀行",
            "Cathay United Bank",
            "Visa",
            "自選通路 3% 回饋",
            "Select your own category for 3% cashback",
        )
        .with_region(Region::Taiwan)
        .with_benefits(vec![RawBenefit::new(
            "自選回饋",
            "Custom Category",
            "自選通路 3% 回饋",
            "3% cashback on selected category",
            "每季可自選一個通路享 3% 回饋，上限 2,000 元",
            "Choose one category per quarter, max NT$2,000 cashback",
            "TWD",
            "QUARTERLY",
        )
        .with_amount(2000.0)
        .with_reminder_days(14)]),
        RawCard::new(
            "中國信託 LINE Pay 卡",
            "CTBC LINE Pay Card",
            "中國信託",
            "CTBC Bank",
            "Mastercard",
            "LINE Pay 消費最高 5% 回饋",
            "Up to 5% cashback on LINE Pay purchases",
        )
        .with_region(Region::Taiwan)
        .with_benefits(vec![
            RawBenefit::new(
                "LINE Pay",
                "LINE Pay",
                "LINE Pay 5% 回饋",
                "5% cashback on LINE Pay",
                "LINE Pay 消費享 5% LINE Points 回饋",
                "5% LINE Points on LINE Pay purchases",
                "TWD",
                "MONTHLY",
            )
            .with_amount(1000.0)
            .with_reminder_days(7),
            RawBenefit::new(
                "新戶禮",
                "New Member Gift",
                "新戶首刷禮 500 點",
                "New member 500 points",
                "核卡後 60 天內首刷任意金額",
                "First purchase within 60 days of card approval",
                "TWD",
                "ONE_TIME",
            )
            .with_amount(500.0),
        ]),
    ]
}

fn japan_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "楽天カード",
            "Rakuten Card",
            "楽天カード",
            "Rakuten Card Co.",
            "Visa",
            "年会費無料、楽天市場でポイント3倍",
            "No annual fee with 3x points at Rakuten Ichiba",
        )
        .with_region(Region::Japan)
        .with_benefits(vec![
            RawBenefit::new(
                "ポイント還元",
                "Points Rewards",
                "楽天市場ポイント3倍",
                "3x Points at Rakuten Ichiba",
                "楽天市場での買い物はいつでもポイント3倍",
                "Always 3x points on Rakuten Ichiba purchases",
                "JPY",
                "YEARLY",
            ),
            RawBenefit::new(
                "新規入会",
                "Sign-up Bonus",
                "新規入会特典5,000ポイント",
                "5,000 Points Sign-up Bonus",
                "新規入会とカード利用で5,000ポイント",
                "5,000 points for joining and making a first purchase",
                "POINTS",
                "ONE_TIME",
            )
            .with_amount(5000.0),
        ]),
        RawCard::new(
            "JCB カード W",
            "JCB CARD W",
            "JCB",
            "JCB",
            "JCB",
            "39歳以下限定、ポイントいつでも2倍",
            "For ages 39 and under with double points everywhere",
        )
        .with_region(Region::Japan)
        .with_benefits(vec![RawBenefit::new(
            "ポイント還元",
            "Points Rewards",
            "ポイントいつでも2倍",
            "2x Points on Everything",
            "通常の2倍のOki Dokiポイントを獲得",
            "Double Oki Doki points on all purchases",
            "JPY",
            "YEARLY",
        )]),
    ]
}

fn singapore_cards() -> Vec<RawCard> {
    vec![
        RawCard::new(
            "星展銀行 Altitude 卡",
            "DBS Altitude Visa Signature Card",
            "星展銀行",
            "DBS Bank",
            "Visa",
            "里程回饋首選，線上旅遊消費3倍里程",
            "Top miles card with 3x miles on online travel bookings",
        )
        .with_region(Region::Singapore)
        .with_benefits(vec![
            RawBenefit::new(
                "里程回饋",
                "Miles Rewards",
                "線上旅遊3倍里程",
                "3x Miles on Online Travel",
                "線上機票與飯店預訂每S$1累積3里程",
                "3 miles per S$1 on online flight and hotel bookings",
                "SGD",
                "YEARLY",
            ),
            RawBenefit::new(
                "續卡禮",
                "Renewal Bonus",
                "續卡禮10,000里程",
                "10,000 Bonus Miles on Renewal",
                "支付年費續卡即享10,000里程",
                "10,000 bonus miles when the annual fee is paid on renewal",
                "POINTS",
                "YEARLY",
            )
            .with_amount(10000.0),
        ]),
        RawCard::new(
            "華僑銀行 365 卡",
            "OCBC 365 Credit Card",
            "華僑銀行",
            "OCBC Bank",
            "Visa",
            "日常消費現金回饋，餐飲最高6%",
            "Everyday cashback card with up to 6% on dining",
        )
        .with_region(Region::Singapore)
        .with_benefits(vec![RawBenefit::new(
            "餐飲回饋",
            "Dining Cash Back",
            "餐飲6%現金回饋",
            "6% Cash Back on Dining",
            "本地與海外餐飲消費6%回饋",
            "6% cashback on local and overseas dining",
            "SGD",
            "YEARLY",
        )]),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Frequency;
    use crate::normalize::Normalizer;
    use crate::report::{CapturingReporter, PipelineEvent};

    #[test]
    fn test_every_region_has_a_catalog() {
        for region in Region::ALL {
            let cards = builtin_cards(region);
            assert!(!cards.is_empty(), "{} catalog is empty", region);
            for card in &cards {
                assert_eq!(card.region.as_deref(), Some(region.as_str()));
            }
        }
    }

    #[test]
    fn test_america_catalog_contents() {
        let cards = builtin_cards(Region::America);

        assert_eq!(cards.len(), 3);
        let names: Vec<&str> = cards.iter().filter_map(|c| c.name_en.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                "Chase Sapphire Preferred® Card",
                "Capital One Venture X Rewards Credit Card",
                "Citi® Double Cash Card",
            ]
        );

        // the sign-up bonus is the only monetary benefit on the Chase card
        let chase = &cards[0];
        assert_eq!(chase.benefits.len(), 3);
        assert_eq!(chase.benefits[0].amount, None);
        assert_eq!(chase.benefits[2].amount, Some(60000.0));
        assert_eq!(chase.benefits[2].frequency.as_deref(), Some("ONE_TIME"));
    }

    #[test]
    fn test_amex_table_carries_photos_and_monthly_reminders() {
        let cards = amex_cards();

        assert_eq!(cards.len(), 3);
        for card in &cards {
            let photo = card.photo.as_deref().unwrap();
            assert!(photo.starts_with("/images/cards/amex-"));
        }

        let monthlies: Vec<&RawBenefit> = cards
            .iter()
            .flat_map(|c| &c.benefits)
            .filter(|b| b.frequency.as_deref() == Some("MONTHLY"))
            .collect();
        assert_eq!(monthlies.len(), 3);
        for benefit in monthlies {
            assert_eq!(benefit.reminder_days, Some(7));
            assert!(benefit.amount.is_some(), "monthly credits carry a cap");
        }
    }

    #[test]
    fn test_taiwan_catalog_includes_quarterly_benefit() {
        let cards = builtin_cards(Region::Taiwan);
        let cube = cards
            .iter()
            .find(|c| c.name_en.as_deref() == Some("Cathay CUBE Card"))
            .unwrap();

        assert_eq!(cube.benefits.len(), 1);
        assert_eq!(cube.benefits[0].frequency.as_deref(), Some("QUARTERLY"));
        assert_eq!(
            Frequency::parse(cube.benefits[0].frequency.as_deref().unwrap()),
            Some(Frequency::Quarterly)
        );
        assert_eq!(cube.benefits[0].reminder_days, Some(14));
    }

    #[test]
    fn test_all_catalog_records_normalize_without_drops() {
        let normalizer = Normalizer::new(Region::America);

        let mut all: Vec<RawCard> = Region::ALL.iter().flat_map(|r| builtin_cards(*r)).collect();
        all.extend(amex_cards());
        let expected = all.len();

        let reporter = CapturingReporter::new();
        let bundles = normalizer.normalize_batch(all, &reporter);

        assert_eq!(bundles.len(), expected);
        let drops = reporter.count_matching(|e| {
            matches!(
                e,
                PipelineEvent::RecordDropped { .. } | PipelineEvent::BenefitDropped { .. }
            )
        });
        assert_eq!(drops, 0, "catalog data must be clean");
    }
}
