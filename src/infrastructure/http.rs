use chrono::Utc;
use gloo::net::http::Request;

use crate::domain::{
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger},
    news::{NewsArticle, NewsCategory, compose_feed, parse_search_response},
};

/// HTTP client for the article search endpoint
#[derive(Debug, Clone)]
pub struct NewsHttpClient {
    base_url: String,
}

impl NewsHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_url(&self, query: &str) -> String {
        HttpUtils::build_url_with_params(
            &format!("{}/api/search", self.base_url.trim_end_matches('/')),
            &[("query", query)],
        )
    }

    /// Raw search results for `query`
    pub async fn search(&self, query: &str) -> AppResult<Vec<NewsArticle>> {
        let url = self.search_url(query);
        get_logger().debug(LogComponent::Infrastructure("NewsHttp"), &format!("GET {url}"));

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to send request: {e}")))?;

        if !HttpUtils::is_success_status(response.status()) {
            let message = format!("HTTP {} {}", response.status(), response.status_text());
            get_logger().error(LogComponent::Infrastructure("NewsHttp"), &message);
            return Err(AppError::NetworkError(message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to read response: {e}")))?;

        let articles = parse_search_response(&body)?;
        get_logger().debug(
            LogComponent::Infrastructure("NewsHttp"),
            &format!("{} articles for '{query}'", articles.len()),
        );
        Ok(articles)
    }

    /// Cards for one tab of the news feed
    pub async fn load_feed(&self, category: NewsCategory) -> AppResult<Vec<NewsArticle>> {
        let results = self.search(category.query()).await?;
        Ok(compose_feed(category, results, Utc::now()))
    }
}

pub struct HttpUtils;

impl HttpUtils {
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// Appends `params` as a query string, encoding each value.
    pub fn build_url_with_params(base_url: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{base_url}?{query_string}")
    }

    /// Percent-encodes everything outside the RFC 3986 unreserved set
    pub fn url_encode(input: &str) -> String {
        let mut encoded = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    encoded.push(byte as char)
                }
                _ => encoded.push_str(&format!("%{byte:02X}")),
            }
        }
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        let client = NewsHttpClient::new("https://news.example.com/");
        assert_eq!(
            client.search_url("meme coins & nfts"),
            "https://news.example.com/api/search?query=meme%20coins%20%26%20nfts"
        );
    }

    #[test]
    fn url_encoding() {
        assert_eq!(HttpUtils::url_encode("hello world"), "hello%20world");
        assert_eq!(HttpUtils::url_encode("a&b=c?#"), "a%26b%3Dc%3F%23");
        assert_eq!(HttpUtils::url_encode("ünï"), "%C3%BCn%C3%AF");
        assert_eq!(HttpUtils::url_encode("safe-_.~"), "safe-_.~");
    }

    #[test]
    fn success_statuses() {
        assert!(HttpUtils::is_success_status(204));
        assert!(!HttpUtils::is_success_status(304));
        assert!(!HttpUtils::is_success_status(500));
    }
}
