//! Token catalog shown by the explorer and the token details page.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::{AppError, AppResult};

/// Explorer card data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    pub market_cap: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub holders: u64,
    pub description: String,
}

/// Details page data: the summary plus supply, links and contract address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    #[serde(flatten)]
    pub summary: TokenSummary,
    pub total_supply: u64,
    pub website: String,
    pub twitter: String,
    pub telegram: String,
    pub contract: String,
}

/// Explorer tabs
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TokenFilter {
    #[default]
    Trending,
    New,
    TopGainers,
    Volume,
}

impl TokenFilter {
    pub fn label(&self) -> &'static str {
        match self {
            TokenFilter::Trending => "Trending",
            TokenFilter::New => "New Launches",
            TokenFilter::TopGainers => "Top Gainers",
            TokenFilter::Volume => "High Volume",
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn summary(
    id: &str,
    name: &str,
    symbol: &str,
    image_seed: u8,
    price: f64,
    change_24h: f64,
    market_cap: f64,
    volume_24h: f64,
    holders: u64,
    description: &str,
) -> TokenSummary {
    TokenSummary {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        image: format!("https://picsum.photos/100/100?random={image_seed}"),
        price,
        change_24h,
        market_cap,
        volume_24h,
        holders,
        description: description.to_string(),
    }
}

// Listing order: the last entry is the most recent launch.
static CATALOG: Lazy<Vec<TokenSummary>> = Lazy::new(|| {
    vec![
        summary("moondog", "Moon Dog", "MDOG", 1, 0.00234, 156.7, 2_340_000.0, 890_000.0, 15_420, "The first dog to reach the moon! 🌙🐕"),
        summary("rocketcat", "Rocket Cat", "RCAT", 2, 0.00156, -23.4, 1_560_000.0, 450_000.0, 8_930, "Cats conquering space, one purr at a time! 🚀🐱"),
        summary("memewizard", "Meme Wizard", "MWIZ", 3, 0.00789, 89.2, 7_890_000.0, 1_200_000.0, 25_600, "Casting meme magic across the blockchain! 🧙‍♂️✨"),
        summary("diamondhands", "Diamond Hands", "DHAND", 4, 0.00445, 12.8, 4_450_000.0, 670_000.0, 18_900, "For those who never sell! 💎🙌"),
        summary("galaxyfrog", "Galaxy Frog", "GFROG", 5, 0.00098, 245.6, 980_000.0, 340_000.0, 7_650, "Hopping across galaxies! 🐸🌌"),
        summary("cryptoking", "Crypto King", "CKING", 6, 0.01234, -5.7, 12_340_000.0, 890_000.0, 34_500, "Rule the crypto kingdom! 👑⚔️"),
    ]
});

static DETAILS: Lazy<Vec<TokenDetails>> = Lazy::new(|| {
    let mut moondog = summary("moondog", "Moon Dog", "MDOG", 1, 0.00234, 156.7, 2_340_000.0, 890_000.0, 15_420,
        "The first dog to reach the moon! 🌙🐕 Join our pack as we explore the lunar surface and beyond.");
    moondog.image = "https://picsum.photos/200/200?random=1".to_string();
    let mut rocketcat = summary("rocketcat", "Rocket Cat", "RCAT", 2, 0.00156, -23.4, 1_560_000.0, 450_000.0, 8_930,
        "Cats conquering space, one purr at a time! 🚀🐱 Our feline astronauts are on a mission to Mars.");
    rocketcat.image = "https://picsum.photos/200/200?random=2".to_string();

    vec![
        TokenDetails {
            summary: moondog,
            total_supply: 1_000_000_000,
            website: "https://moondog.space".to_string(),
            twitter: "https://twitter.com/moondog".to_string(),
            telegram: "https://t.me/moondog".to_string(),
            contract: "0x1234567890123456789012345678901234567890".to_string(),
        },
        TokenDetails {
            summary: rocketcat,
            total_supply: 500_000_000,
            website: "https://rocketcat.io".to_string(),
            twitter: "https://twitter.com/rocketcat".to_string(),
            telegram: "https://t.me/rocketcat".to_string(),
            contract: "0x2345678901234567890123456789012345678901".to_string(),
        },
    ]
});

pub fn catalog() -> &'static [TokenSummary] {
    &CATALOG
}

/// Details for the token behind a route identifier.
pub fn lookup(id: &str) -> AppResult<TokenDetails> {
    DETAILS
        .iter()
        .find(|details| details.summary.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Token not found: {id}")))
}

/// Case-insensitive substring match on name or symbol; an empty query matches all.
pub fn search<'a>(tokens: &'a [TokenSummary], query: &str) -> Vec<&'a TokenSummary> {
    let query = query.trim().to_lowercase();
    tokens
        .iter()
        .filter(|token| {
            token.name.to_lowercase().contains(&query)
                || token.symbol.to_lowercase().contains(&query)
        })
        .collect()
}

/// Explorer ordering for a tab. Stable, so ties keep listing order.
pub fn apply_filter(tokens: &[TokenSummary], filter: TokenFilter) -> Vec<TokenSummary> {
    let mut ordered = tokens.to_vec();
    let descending = |x: f64, y: f64| y.partial_cmp(&x).unwrap_or(Ordering::Equal);
    match filter {
        TokenFilter::Trending => {}
        TokenFilter::New => ordered.reverse(),
        TokenFilter::TopGainers => ordered.sort_by(|a, b| descending(a.change_24h, b.change_24h)),
        TokenFilter::Volume => ordered.sort_by(|a, b| descending(a.volume_24h, b.volume_24h)),
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_token_resolves() {
        let details = lookup("rocketcat").unwrap();
        assert_eq!(details.summary.symbol, "RCAT");
        assert_eq!(details.total_supply, 500_000_000);
    }

    #[test]
    fn unknown_token_is_not_found() {
        let err = lookup("shibmoon").unwrap_err();
        assert_eq!(err, AppError::NotFound("Token not found: shibmoon".to_string()));
    }

    #[test]
    fn search_matches_name_or_symbol() {
        let hits: Vec<_> = search(catalog(), "FROG").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(hits, ["galaxyfrog"]);
        let hits: Vec<_> = search(catalog(), "cat").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(hits, ["rocketcat"]);
        assert_eq!(search(catalog(), "").len(), catalog().len());
        assert!(search(catalog(), "zzz").is_empty());
    }

    #[test]
    fn filters_order_the_catalog() {
        let gainers = apply_filter(catalog(), TokenFilter::TopGainers);
        assert_eq!(gainers[0].symbol, "GFROG");
        assert_eq!(gainers.last().unwrap().symbol, "RCAT");

        let volume = apply_filter(catalog(), TokenFilter::Volume);
        assert_eq!(volume[0].symbol, "MWIZ");
        // MDOG and CKING tie on volume and keep listing order
        assert_eq!(volume[1].symbol, "MDOG");
        assert_eq!(volume[2].symbol, "CKING");

        assert_eq!(apply_filter(catalog(), TokenFilter::New)[0].symbol, "CKING");
    }
}
