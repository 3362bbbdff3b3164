use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignal {
    Bullish,
    Neutral,
    Bearish,
}

impl fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MacdSignal::Bullish => "Bullish",
            MacdSignal::Neutral => "Neutral",
            MacdSignal::Bearish => "Bearish",
        };
        f.write_str(label)
    }
}

/// One point of the price trend. Labels are ordinal ("Day 1", "Day 2", ...), not timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub rsi: f64,
    pub macd: MacdSignal,
    pub moving_avg: String,
    pub support: f64,
    pub resistance: f64,
    pub score: f64,
    pub signals: Vec<String>,
    pub analysis: String,
    pub price_history: Vec<PricePoint>,
}

impl StockSnapshot {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.symbol.trim().is_empty(), "symbol must be non-empty");
        ensure!(
            !self.name.trim().is_empty(),
            "name must be non-empty (symbol={})",
            self.symbol
        );
        ensure!(
            self.price > 0.0,
            "price must be positive (symbol={}, price={})",
            self.symbol,
            self.price
        );
        ensure!(
            (0.0..=MAX_SCORE).contains(&self.score),
            "score must be between 0 and {MAX_SCORE} (symbol={}, score={})",
            self.symbol,
            self.score
        );
        ensure!(
            !self.price_history.is_empty(),
            "price history must be non-empty (symbol={})",
            self.symbol
        );
        Ok(())
    }

    pub fn is_gaining(&self) -> bool {
        self.change >= 0.0
    }

    pub fn volume_millions(&self) -> f64 {
        self.volume as f64 / 1_000_000.0
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::snapshot;
    use super::*;

    #[test]
    fn validate_accepts_well_formed_snapshot() {
        assert!(snapshot("ABC", 12.5, 7.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_score_out_of_range() {
        assert!(snapshot("ABC", 12.5, 10.5).validate().is_err());
        assert!(snapshot("ABC", 12.5, -0.1).validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        assert!(snapshot("ABC", 0.0, 5.0).validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_history() {
        let mut s = snapshot("ABC", 12.5, 5.0);
        s.price_history.clear();
        assert!(s.validate().is_err());
    }

    #[test]
    fn macd_serializes_as_snake_case_and_displays_capitalised() {
        assert_eq!(
            serde_json::to_value(MacdSignal::Bullish).unwrap(),
            serde_json::json!("bullish")
        );
        assert_eq!(MacdSignal::Neutral.to_string(), "Neutral");
    }

    #[test]
    fn volume_is_reported_in_millions() {
        let mut s = snapshot("ABC", 12.5, 5.0);
        s.volume = 45_230_000;
        assert!((s.volume_millions() - 45.23).abs() < 1e-9);
    }
}
