//! News feed model: search response parsing, feed composition and the
//! relative date / source labels shown on each card.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::{AppError, AppResult};
use crate::domain::logging::{LogComponent, LogLevel, get_logger};

const MEMECOIN_RESULTS: usize = 8;
const DEFAULT_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_date: Option<String>,
}

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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    Memecoins,
    Defi,
    Nft,
    General,
}

impl NewsCategory {
    /// Search term sent to the endpoint
    pub fn query(&self) -> &'static str {
        match self {
            NewsCategory::Memecoins => "memecoins",
            NewsCategory::Defi => "defi",
            NewsCategory::Nft => "nft",
            NewsCategory::General => "crypto",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::Memecoins => "Memecoins",
            NewsCategory::Defi => "DeFi",
            NewsCategory::Nft => "NFTs",
            NewsCategory::General => "General",
        }
    }
}

/// Extracts the `results` array of a search response body.
///
/// A body without a `results` array is a parse error carrying the body's
/// `error` text when present. Items that do not decode are logged and skipped.
pub fn parse_search_response(body: &str) -> AppResult<Vec<NewsArticle>> {
    let data: Value = serde_json::from_str(body)?;

    match data.get("results") {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match NewsArticle::deserialize(item) {
                Ok(article) => Some(article),
                Err(e) => {
                    get_logger().log_with_metadata(
                        LogLevel::Warn,
                        LogComponent::Domain("News"),
                        "Skipped malformed search result",
                        &format!("index={index} error={e}"),
                    );
                    None
                }
            })
            .collect()),
        _ => {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Invalid response format");
            Err(AppError::ParseError(message.to_string()))
        }
    }
}

/// Stories pinned on top of the memecoin tab
pub fn featured_stories(now: DateTime<Utc>) -> Vec<NewsArticle> {
    let published = |hours: i64| {
        Some((now - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true))
    };
    vec![
        NewsArticle {
            title: "New Memecoin 'Galaxy Frog' Surges 300% in 24 Hours".to_string(),
            content: "The latest Solana-based memecoin featuring a cartoon frog has captured investors' attention with its unique staking mechanics and viral marketing campaign.".to_string(),
            url: "https://example.com/galaxy-frog-surge".to_string(),
            published_date: published(2),
        },
        NewsArticle {
            title: "Pump.fun Alternative Launches with Enhanced Security Features".to_string(),
            content: "A new token launchpad promises better security measures and rug-pull protection while maintaining the ease of use that made Pump.fun popular.".to_string(),
            url: "https://example.com/new-launchpad".to_string(),
            published_date: published(6),
        },
    ]
}

/// Cards for a tab: featured stories plus the first 8 results on the
/// memecoin tab, the first 10 results elsewhere.
pub fn compose_feed(
    category: NewsCategory,
    results: Vec<NewsArticle>,
    now: DateTime<Utc>,
) -> Vec<NewsArticle> {
    match category {
        NewsCategory::Memecoins => featured_stories(now)
            .into_iter()
            .chain(results.into_iter().take(MEMECOIN_RESULTS))
            .collect(),
        _ => results.into_iter().take(DEFAULT_RESULTS).collect(),
    }
}

/// "Just now", "N hours ago", "N days ago", or the calendar date after a week.
pub fn format_published(published: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(published) = published.and_then(|p| DateTime::parse_from_rfc3339(p).ok()) else {
        return "Recently".to_string();
    };
    let published = published.with_timezone(&Utc);

    let hours = (now - published).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days} days ago");
    }
    published.format("%d.%m.%Y").to_string()
}

/// First host label without "www.", e.g. "coindesk" for https://www.coindesk.com/x
pub fn extract_source(url: &str) -> String {
    let Some((_, rest)) = url.split_once("://") else {
        return "Unknown Source".to_string();
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);

    match host.split('.').next() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => "Unknown Source".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_results_array() {
        let body = r#"{"results":[{"title":"A","content":"c","url":"https://a.io/1","published_date":"2024-03-15T10:00:00Z"},{"title":"B"}]}"#;
        let articles = parse_search_response(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].title, "B");
        assert!(articles[1].published_date.is_none());
    }

    #[test]
    fn malformed_items_are_skipped() {
        let body = r#"{"results":[
            {"title":"ok","url":"https://a.io/1"},
            {"title":null,"url":"https://a.io/2"},
            {"title":"also ok","published_date":42},
            {"title":"last"}
        ]}"#;
        let titles: Vec<_> = parse_search_response(body)
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, ["ok", "last"]);
        assert!(parse_search_response(r#"{"results":[null, 3]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_bodies_are_parse_errors() {
        assert_eq!(
            parse_search_response(r#"{"error":"rate limited"}"#).unwrap_err(),
            AppError::ParseError("rate limited".to_string())
        );
        assert_eq!(
            parse_search_response(r#"{"results":"nope"}"#).unwrap_err(),
            AppError::ParseError("Invalid response format".to_string())
        );
        assert!(matches!(parse_search_response("<html>"), Err(AppError::ParseError(_))));
    }

    #[test]
    fn memecoin_tab_pins_featured_stories() {
        let results: Vec<NewsArticle> = (0..12)
            .map(|i| NewsArticle {
                title: format!("r{i}"),
                content: String::new(),
                url: String::new(),
                published_date: None,
            })
            .collect();

        let memes = compose_feed(NewsCategory::Memecoins, results.clone(), now());
        assert_eq!(memes.len(), 10);
        assert!(memes[0].title.contains("Galaxy Frog"));
        assert_eq!(memes[2].title, "r0");

        let defi = compose_feed(NewsCategory::Defi, results, now());
        assert_eq!(defi.len(), 10);
        assert_eq!(defi[0].title, "r0");
    }

    #[test]
    fn relative_dates() {
        assert_eq!(format_published(Some("2024-03-15T11:30:00Z"), now()), "Just now");
        assert_eq!(format_published(Some("2024-03-15T07:00:00Z"), now()), "5 hours ago");
        assert_eq!(format_published(Some("2024-03-12T12:00:00Z"), now()), "3 days ago");
        assert_eq!(format_published(Some("2024-02-01T00:00:00Z"), now()), "01.02.2024");
        assert_eq!(format_published(Some("yesterday"), now()), "Recently");
        assert_eq!(format_published(None, now()), "Recently");
    }

    #[test]
    fn featured_stories_read_as_recent() {
        let stories = featured_stories(now());
        assert_eq!(format_published(stories[0].published_date.as_deref(), now()), "2 hours ago");
        assert_eq!(format_published(stories[1].published_date.as_deref(), now()), "6 hours ago");
    }

    #[test]
    fn source_is_first_host_label() {
        assert_eq!(extract_source("https://www.coindesk.com/markets/x"), "coindesk");
        assert_eq!(extract_source("https://example.com/galaxy-frog-surge"), "example");
        assert_eq!(extract_source("http://news.site.io:8080?q=1"), "news");
        assert_eq!(extract_source("not a url"), "Unknown Source");
        assert_eq!(extract_source("https:///path"), "Unknown Source");
    }

    #[test]
    fn general_tab_searches_crypto() {
        assert_eq!(NewsCategory::General.query(), "crypto");
        assert_eq!(NewsCategory::Defi.to_string(), "defi");
    }
}
