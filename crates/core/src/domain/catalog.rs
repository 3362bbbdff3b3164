use crate::domain::snapshot::{MacdSignal, PricePoint, StockSnapshot};
use std::sync::OnceLock;

pub const PAGE_TITLE: &str = "Indian Stock Analyzer - Best Stocks Under ₹50";
pub const PAGE_DESCRIPTION: &str =
    "AI-powered analysis of Indian stocks under ₹50 for strong buy opportunities";
pub const EXCHANGE: &str = "NSE";
pub const CURRENCY_SYMBOL: &str = "₹";

static REFERENCE: OnceLock<Vec<StockSnapshot>> = OnceLock::new();

/// The fixed mock universe. Built on first use and never mutated afterwards.
pub fn reference_snapshots() -> &'static [StockSnapshot] {
    REFERENCE.get_or_init(build_reference)
}

fn history(prices: [f64; 5]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            label: format!("Day {}", i + 1),
            price,
        })
        .collect()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn build_reference() -> Vec<StockSnapshot> {
    vec![
        StockSnapshot {
            symbol: "YESBANK".to_string(),
            name: "Yes Bank Ltd".to_string(),
            price: 21.45,
            change: 1.85,
            change_percent: 9.44,
            volume: 45_230_000,
            rsi: 68.5,
            macd: MacdSignal::Bullish,
            moving_avg: "Above 50-day MA".to_string(),
            support: 19.50,
            resistance: 23.00,
            score: 8.5,
            signals: tags(&["Strong Buy", "High Volume", "RSI Bullish", "MACD Positive"]),
            analysis: "Yes Bank shows strong bullish momentum with price breaking above key \
                       resistance. High volume indicates institutional interest. RSI at 68.5 \
                       suggests strong buying pressure without overbought conditions. MACD \
                       crossover confirms uptrend. Target: ₹25-27 in 2-3 days."
                .to_string(),
            price_history: history([18.2, 18.8, 19.5, 20.1, 21.45]),
        },
        StockSnapshot {
            symbol: "SUZLON".to_string(),
            name: "Suzlon Energy Ltd".to_string(),
            price: 47.30,
            change: 2.10,
            change_percent: 4.65,
            volume: 38_450_000,
            rsi: 62.3,
            macd: MacdSignal::Bullish,
            moving_avg: "Above 20-day MA".to_string(),
            support: 44.50,
            resistance: 50.00,
            score: 7.8,
            signals: tags(&["Buy", "Renewable Energy Sector", "Volume Surge"]),
            analysis: "Suzlon benefits from green energy push. Strong support at ₹44.50. Volume \
                       surge indicates accumulation phase. Price consolidating near resistance. \
                       Breakout above ₹50 can trigger rally to ₹55-58."
                .to_string(),
            price_history: history([43.5, 44.2, 45.8, 46.1, 47.3]),
        },
        StockSnapshot {
            symbol: "RPOWER".to_string(),
            name: "Reliance Power Ltd".to_string(),
            price: 28.65,
            change: 1.25,
            change_percent: 4.56,
            volume: 28_900_000,
            rsi: 58.7,
            macd: MacdSignal::Neutral,
            moving_avg: "Near 50-day MA".to_string(),
            support: 26.00,
            resistance: 31.00,
            score: 6.9,
            signals: tags(&["Hold", "Power Sector Play", "Consolidating"]),
            analysis: "Reliance Power showing signs of bottoming out. Price consolidating with \
                       good support at ₹26. Any positive news catalyst could trigger sharp \
                       upward move. Risk-reward favorable for short-term trades."
                .to_string(),
            price_history: history([26.8, 27.1, 27.5, 28.2, 28.65]),
        },
        StockSnapshot {
            symbol: "TATASTLBSL".to_string(),
            name: "Tata Steel BSL Ltd".to_string(),
            price: 43.80,
            change: 1.95,
            change_percent: 4.66,
            volume: 12_340_000,
            rsi: 64.2,
            macd: MacdSignal::Bullish,
            moving_avg: "Above all MAs".to_string(),
            support: 41.00,
            resistance: 47.00,
            score: 7.5,
            signals: tags(&["Buy", "Metal Sector", "Technical Breakout"]),
            analysis: "Steel sector showing revival. Tata Steel BSL breaking out of consolidation \
                       pattern. Strong fundamentals backed by parent company. Volume increasing \
                       on up days. Target ₹48-52."
                .to_string(),
            price_history: history([40.5, 41.2, 42.3, 43.1, 43.8]),
        },
        StockSnapshot {
            symbol: "SAIL".to_string(),
            name: "Steel Authority of India".to_string(),
            price: 118.25,
            change: 3.45,
            change_percent: 3.00,
            volume: 35_670_000,
            rsi: 61.8,
            macd: MacdSignal::Bullish,
            moving_avg: "Golden Cross".to_string(),
            support: 112.00,
            resistance: 125.00,
            score: 8.2,
            signals: tags(&["Strong Buy", "PSU Stock", "High Liquidity", "Dividend Play"]),
            analysis: "SAIL showing strong momentum with golden cross pattern. PSU status provides \
                       stability. High trading volume ensures liquidity. Infrastructure push to \
                       benefit steel demand. Near-term target: ₹130-135."
                .to_string(),
            price_history: history([110.5, 112.8, 114.2, 116.5, 118.25]),
        },
    ]
}
