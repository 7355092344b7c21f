use std::str::FromStr;

use chrono::Utc;
use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use rand::{SeedableRng, rngs::SmallRng};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::{AnalyzeTokenUseCase, LoadNewsUseCase};
use crate::config::AppConfig;
use crate::domain::{
    errors::AppError,
    logging::{LogComponent, get_logger, get_time_provider},
    market_data::MarketDataSimulator,
    news::{self, NewsCategory},
    portfolio::{Holding, SortKey, Timeframe, aggregate_over, sort_holdings_over},
    tokens::{self, TokenFilter},
};
use crate::infrastructure::http::NewsHttpClient;

impl From<AppError> for JsValue {
    fn from(error: AppError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| AppError::from(e).into())
}

fn parse_enum<T: FromStr>(value: &str, what: &str) -> Result<T, JsValue> {
    T::from_str(value)
        .map_err(|_| AppError::ValidationError(format!("Unknown {what}: {value}")).into())
}

/// JavaScript entry point for the dashboard's data operations.
/// Thin bridge: every method delegates to the domain or application layer.
#[wasm_bindgen]
pub struct MemecoinApi {
    config: AppConfig,
    simulator: MarketDataSimulator,
    rng: SmallRng,
}

#[wasm_bindgen]
impl MemecoinApi {
    /// `config_json` may be partial; missing fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MemecoinApi, JsValue> {
        let config = match config_json {
            Some(json) => AppConfig::from_json(&json)?,
            None => AppConfig::default(),
        };
        let simulator = MarketDataSimulator::new(config.simulator)?;
        let seed = get_time_provider().current_timestamp();

        get_logger().info(
            LogComponent::Presentation("WasmApi"),
            &format!("MemecoinApi ready, news from {}", config.news_base_url),
        );
        Ok(Self { config, simulator, rng: SmallRng::seed_from_u64(seed) })
    }

    #[wasm_bindgen(js_name = generateCandles)]
    pub fn generate_candles(&mut self, base_price: f64, count: Option<usize>) -> Result<JsValue, JsValue> {
        let count = count.unwrap_or(self.config.candle_count);
        let now_ms = get_time_provider().current_timestamp();
        let candles = self.simulator.produce(base_price, count, now_ms, &mut self.rng)?;
        to_js(&candles)
    }

    #[wasm_bindgen(js_name = generateTicks)]
    pub fn generate_ticks(&mut self, base_price: f64, count: Option<usize>) -> Result<JsValue, JsValue> {
        let count = count.unwrap_or(self.config.tick_count);
        let now_ms = get_time_provider().current_timestamp();
        let ticks = self.simulator.produce_ticks(base_price, count, now_ms, &mut self.rng)?;
        to_js(&ticks)
    }

    /// `timeframe` is one of "24h", "7d", "30d"; defaults to "24h".
    #[wasm_bindgen(js_name = aggregatePortfolio)]
    pub fn aggregate_portfolio(&self, holdings: JsValue, timeframe: Option<String>) -> Result<JsValue, JsValue> {
        let holdings: Vec<Holding> = holdings.into_serde().map_err(AppError::from)?;
        let timeframe = match timeframe {
            Some(tf) => parse_enum::<Timeframe>(&tf, "timeframe")?,
            None => Timeframe::default(),
        };
        to_js(&aggregate_over(&holdings, timeframe))
    }

    /// `change` ordering reads the given window; defaults to "24h".
    #[wasm_bindgen(js_name = sortHoldings)]
    pub fn sort_holdings(
        &self,
        holdings: JsValue,
        key: &str,
        timeframe: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let holdings: Vec<Holding> = holdings.into_serde().map_err(AppError::from)?;
        let key = parse_enum::<SortKey>(key, "sort key")?;
        let timeframe = match timeframe {
            Some(tf) => parse_enum::<Timeframe>(&tf, "timeframe")?,
            None => Timeframe::default(),
        };
        to_js(&sort_holdings_over(&holdings, key, timeframe))
    }

    #[wasm_bindgen(js_name = lookupToken)]
    pub fn lookup_token(&self, token_id: &str) -> Result<JsValue, JsValue> {
        to_js(&tokens::lookup(token_id)?)
    }

    /// Explorer list for a tab, narrowed by a free-text query
    #[wasm_bindgen(js_name = exploreTokens)]
    pub fn explore_tokens(&self, query: &str, filter: Option<String>) -> Result<JsValue, JsValue> {
        let filter = match filter {
            Some(f) => parse_enum::<TokenFilter>(&f, "filter")?,
            None => TokenFilter::default(),
        };
        let ordered = tokens::apply_filter(tokens::catalog(), filter);
        to_js(&tokens::search(&ordered, query))
    }

    #[wasm_bindgen(js_name = fetchNews)]
    pub fn fetch_news(&self, category: Option<String>) -> Result<Promise, JsValue> {
        let category = match category {
            Some(c) => parse_enum::<NewsCategory>(&c, "news category")?,
            None => NewsCategory::default(),
        };
        let use_case = LoadNewsUseCase::new(NewsHttpClient::new(self.config.news_base_url.clone()));

        Ok(future_to_promise(async move {
            let articles = use_case.execute(category).await?;
            to_js(&articles)
        }))
    }

    #[wasm_bindgen(js_name = analyzeToken)]
    pub fn analyze_token(&self, token_id: String) -> Promise {
        let use_case = AnalyzeTokenUseCase::new(
            self.config.analysis_delay_ms,
            get_time_provider().current_timestamp(),
        );
        future_to_promise(async move {
            let analysis = use_case.execute(&token_id).await?;
            to_js(&analysis)
        })
    }

    #[wasm_bindgen(js_name = formatPublished)]
    pub fn format_published(&self, published: Option<String>) -> String {
        news::format_published(published.as_deref(), Utc::now())
    }

    #[wasm_bindgen(js_name = extractSource)]
    pub fn extract_source(&self, url: &str) -> String {
        news::extract_source(url)
    }
}
