use chrono::{TimeZone, Utc};
use memecoin_dashboard_wasm::config::AppConfig;
use memecoin_dashboard_wasm::domain::analysis::AiAnalysis;
use memecoin_dashboard_wasm::domain::errors::AppError;
use memecoin_dashboard_wasm::domain::news::{
    NewsCategory, compose_feed, format_published, parse_search_response,
};
use memecoin_dashboard_wasm::domain::tokens::{self, TokenFilter};

#[test]
fn unknown_token_lookup_is_not_found() {
    match tokens::lookup("does-not-exist") {
        Err(AppError::NotFound(message)) => assert!(message.contains("does-not-exist")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn explorer_tabs_reorder_catalog() {
    let catalog = tokens::catalog();

    let gainers = tokens::apply_filter(catalog, TokenFilter::TopGainers);
    assert_eq!(gainers[0].id, "galaxyfrog");
    assert!(gainers.windows(2).all(|w| w[0].change_24h >= w[1].change_24h));

    let newest = tokens::apply_filter(catalog, TokenFilter::New);
    assert_eq!(newest[0].id, "cryptoking");
    assert_eq!(newest.len(), catalog.len());

    let hits = tokens::search(catalog, "  CAT ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].symbol, "RCAT");
}

#[test]
fn malformed_news_body_is_a_parse_error() {
    for body in ["", "{}", r#"{"results": {}}"#, "not json"] {
        assert!(
            matches!(parse_search_response(body), Err(AppError::ParseError(_))),
            "body {body:?} should not parse"
        );
    }
}

#[test]
fn news_cards_render_source_and_age() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let body = r#"{"results":[
        {"title":"DeFi summer returns","content":"...","url":"https://www.theblock.co/post/1","published_date":"2024-05-31T09:00:00Z"}
    ]}"#;
    let feed = compose_feed(NewsCategory::Defi, parse_search_response(body).unwrap(), now);

    assert_eq!(feed.len(), 1);
    assert_eq!(format_published(feed[0].published_date.as_deref(), now), "1 days ago");
}

#[test]
fn analysis_serializes_for_the_view() {
    let analysis = AiAnalysis::from_scores(0.8, 0.2, 0.75, 0.5, 3);
    let json = serde_json::to_string_pretty(&analysis).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "sentiment": "Bullish",
      "sentimentScore": 80.0,
      "riskLevel": "Low",
      "riskScore": 20.0,
      "prediction": 50.0,
      "confidence": 85.0,
      "factors": [
        "High trading volume activity",
        "Strong community engagement",
        "Positive social media sentiment"
      ]
    }
    "#);
}

#[test]
fn nested_simulator_config_keeps_defaults() {
    let config = AppConfig::from_json(r#"{"simulator": {"volatility": 0.3}}"#).unwrap();
    assert_eq!(config.simulator.volatility, 0.3);
    assert_eq!(config.simulator.tick_spread, 0.4273);
    assert_eq!(config.market_refresh_ms, 5_000);
}
