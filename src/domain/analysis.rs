//! Simulated token analysis. The scores are random draws; only the
//! bucketing of scores into labels is deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

const FACTORS: [&str; 5] = [
    "High trading volume activity",
    "Strong community engagement",
    "Positive social media sentiment",
    "Recent partnership announcements",
    "Technical indicators bullish",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub sentiment: Sentiment,
    /// 0..100
    pub sentiment_score: f64,
    pub risk_level: RiskLevel,
    /// 0..100
    pub risk_score: f64,
    /// Predicted move in percent, -100..100
    pub prediction: f64,
    /// 70..100
    pub confidence: f64,
    pub factors: Vec<String>,
}

impl AiAnalysis {
    /// Builds the analysis from unit scores in [0, 1]. `factor_count` is clamped to 3..=5.
    pub fn from_scores(
        sentiment: f64,
        risk: f64,
        prediction: f64,
        confidence: f64,
        factor_count: usize,
    ) -> Self {
        let sentiment = sentiment.clamp(0.0, 1.0);
        let risk = risk.clamp(0.0, 1.0);

        Self {
            sentiment: if sentiment > 0.7 {
                Sentiment::Bullish
            } else if sentiment > 0.3 {
                Sentiment::Neutral
            } else {
                Sentiment::Bearish
            },
            sentiment_score: round1(sentiment * 100.0),
            risk_level: if risk > 0.7 {
                RiskLevel::High
            } else if risk > 0.3 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            },
            risk_score: round1(risk * 100.0),
            prediction: round1((prediction.clamp(0.0, 1.0) - 0.5) * 200.0),
            confidence: round1(70.0 + confidence.clamp(0.0, 1.0) * 30.0),
            factors: FACTORS
                .iter()
                .take(factor_count.clamp(3, FACTORS.len()))
                .map(|f| f.to_string())
                .collect(),
        }
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_scores(
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(3..=5),
        )
    }

    pub fn is_positive_outlook(&self) -> bool {
        self.prediction >= 0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
