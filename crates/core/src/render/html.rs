//! Server-side rendering of the analysis page.
//!
//! The page is a pure function of [`ViewState`]; nothing rendered here feeds back into it.

use crate::domain::catalog::{EXCHANGE, PAGE_DESCRIPTION, PAGE_TITLE};
use crate::domain::snapshot::StockSnapshot;
use crate::render::chart::{BarChart, LineChart};
use crate::render::{direction_arrow, render_template, rupees, PAGE_TEMPLATE};
use crate::view::state::{Analysis, Control, ViewState};
use serde::Serialize;

/// Path the trigger form posts to. Must match the form action in `page.html`.
pub const ANALYZE_PATH: &str = "/analyze";

/// Seconds between browser reloads while an analysis is running.
const LOADING_REFRESH_SECS: u32 = 1;

const DISCLAIMER: &str = "This analysis is for educational purposes only and should not be \
considered as financial advice. Stock market investments carry risks. The analysis is based on \
technical indicators and historical patterns. Always conduct your own research and consult with \
a qualified financial advisor before making investment decisions. Past performance does not \
guarantee future results. Invest only what you can afford to lose.";

#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'static str,
    description: &'static str,
    refresh_secs: Option<u32>,
    control: Control,
    loading: bool,
    best: Option<BestPickContext<'a>>,
    others: Vec<CardContext<'a>>,
    score_chart: Option<ChartContext>,
    disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
struct Metric {
    label: &'static str,
    value: String,
    highlight: bool,
}

fn metric(label: &'static str, value: impl Into<String>, highlight: bool) -> Metric {
    Metric {
        label,
        value: value.into(),
        highlight,
    }
}

#[derive(Debug, Serialize)]
struct BestPickContext<'a> {
    name: &'a str,
    symbol: &'a str,
    exchange: &'static str,
    score: String,
    price: String,
    change_class: &'static str,
    arrow: &'static str,
    delta: String,
    change_percent: String,
    metrics: Vec<Metric>,
    signals: &'a [String],
    analysis: &'a str,
    trend_title: String,
    trend_svg: String,
}

#[derive(Debug, Serialize)]
struct CardContext<'a> {
    name: &'a str,
    symbol: &'a str,
    price: String,
    change_class: &'static str,
    arrow: &'static str,
    change_percent: String,
    metrics: Vec<Metric>,
    score: String,
    signals: &'a [String],
    analysis: &'a str,
}

#[derive(Debug, Serialize)]
struct ChartContext {
    title: String,
    svg: String,
}

fn change_class(stock: &StockSnapshot) -> &'static str {
    if stock.is_gaining() {
        "positive"
    } else {
        "negative"
    }
}

fn best_pick_context(stock: &StockSnapshot) -> anyhow::Result<BestPickContext<'_>> {
    let trend = LineChart::price_trend(stock);
    Ok(BestPickContext {
        name: &stock.name,
        symbol: &stock.symbol,
        exchange: EXCHANGE,
        score: stock.score.to_string(),
        price: rupees(stock.price),
        change_class: change_class(stock),
        arrow: direction_arrow(stock.is_gaining()),
        delta: rupees(stock.change.abs()),
        change_percent: format!("{:.2}", stock.change_percent),
        metrics: vec![
            metric("Volume", format!("{:.2}M", stock.volume_millions()), false),
            metric("RSI", stock.rsi.to_string(), true),
            metric("Support", rupees(stock.support), false),
            metric("Resistance", rupees(stock.resistance), false),
        ],
        signals: &stock.signals,
        analysis: &stock.analysis,
        trend_svg: trend.to_svg()?,
        trend_title: trend.title,
    })
}

fn card_context(stock: &StockSnapshot) -> CardContext<'_> {
    CardContext {
        name: &stock.name,
        symbol: &stock.symbol,
        price: rupees(stock.price),
        change_class: change_class(stock),
        arrow: direction_arrow(stock.is_gaining()),
        change_percent: format!("{:.2}", stock.change_percent),
        metrics: vec![
            metric("RSI", stock.rsi.to_string(), false),
            metric("MACD", stock.macd.to_string(), false),
            metric("Volume", format!("{:.1}M", stock.volume_millions()), false),
            metric("Moving Avg", stock.moving_avg.as_str(), false),
        ],
        score: stock.score.to_string(),
        signals: &stock.signals,
        analysis: &stock.analysis,
    }
}

fn score_chart_context(analysis: &Analysis) -> anyhow::Result<ChartContext> {
    let chart = BarChart::score_comparison(&analysis.picks);
    Ok(ChartContext {
        svg: chart.to_svg()?,
        title: chart.title,
    })
}

pub fn render_page(state: &ViewState) -> anyhow::Result<String> {
    let mut ctx = PageContext {
        title: PAGE_TITLE,
        description: PAGE_DESCRIPTION,
        refresh_secs: state.is_loading().then_some(LOADING_REFRESH_SECS),
        control: state.control(),
        loading: state.is_loading(),
        best: None,
        others: Vec::new(),
        score_chart: None,
        disclaimer: DISCLAIMER,
    };

    // No best pick means nothing passed the screen; the page then shows no analysis at all.
    if let Some(analysis) = state.analysis() {
        if let Some(best) = analysis.best_pick() {
            ctx.best = Some(best_pick_context(best)?);
            ctx.others = analysis.others().iter().map(card_context).collect();
            ctx.score_chart = Some(score_chart_context(analysis)?);
        }
    }

    render_template(PAGE_TEMPLATE, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::fixtures::snapshot;
    use crate::view::state::AnalysisView;
    use std::sync::Arc;

    fn analyzed(view: &mut AnalysisView) -> String {
        view.trigger();
        view.complete();
        render_page(view.state()).unwrap()
    }

    #[test]
    fn idle_page_offers_analyze_control_only() {
        let html = render_page(&ViewState::Idle).unwrap();
        assert!(html.contains("<title>Indian Stock Analyzer - Best Stocks Under ₹50</title>"));
        assert!(html.contains(
            "content=\"AI-powered analysis of Indian stocks under ₹50 for strong buy opportunities\""
        ));
        assert!(html.contains(&format!("action=\"{ANALYZE_PATH}\"")));
        assert!(html.contains(">Analyze Stocks Now</button>"));
        assert!(!html.contains(" disabled>"));
        assert!(!html.contains("Best Pick"));
        assert!(!html.contains("<div class=\"spinner\">"));
        assert!(html.contains("Investment Disclaimer"));
    }

    #[test]
    fn loading_page_disables_control_and_hides_analysis() {
        let html = render_page(&ViewState::Loading).unwrap();
        assert!(html.contains(" disabled>Analyzing Market...</button>"));
        assert!(html.contains("<div class=\"spinner\"></div>"));
        assert!(html.contains("Analyzing Indian stocks under ₹50..."));
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"1\" />"));
        assert!(!html.contains("Best Pick"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn analyzed_page_shows_best_pick_then_others_then_scores() {
        let html = analyzed(&mut AnalysisView::reference());
        assert!(html.contains(">Refresh Analysis</button>"));
        assert!(!html.contains("http-equiv=\"refresh\""));
        assert!(!html.contains("<div class=\"spinner\">"));

        assert!(html.contains("🏆 Best Pick: Yes Bank Ltd"));
        assert!(html.contains("Score: 8.5/10"));
        assert!(html.contains("YESBANK • NSE"));
        assert!(html.contains("↑ ₹1.85 (9.44%)"));
        assert!(html.contains(">45.23M<"));
        assert!(html.contains("<div class=\"metric-value positive\">68.5</div>"));
        assert!(html.contains("Expert Analysis:"));
        assert!(html.contains("5-Day Price Trend"));

        // Remaining picks in score order, each with the card layout.
        assert_eq!(html.matches("<div class=\"stock-card\">").count(), 3);
        let suzlon = html.find("Suzlon Energy Ltd").unwrap();
        let tata = html.find("Tata Steel BSL Ltd").unwrap();
        let rpower = html.find("Reliance Power Ltd").unwrap();
        assert!(html.find("Other Strong Opportunities").unwrap() < suzlon);
        assert!(suzlon < tata && tata < rpower);
        assert!(html.contains(">38.5M<"));
        assert!(html.contains(">7.8/10<"));
        assert!(html.contains("↑ 4.65%"));
        assert!(html.contains(">Above all MAs<"));

        assert!(html.contains("Investment Score Comparison"));
        assert!(!html.contains("Steel Authority of India"));
        assert_eq!(html.matches("<svg").count(), 2);
    }

    #[test]
    fn empty_analysis_renders_no_picks() {
        let mut view = AnalysisView::new(Arc::from(vec![snapshot("SAIL", 118.25, 8.2)]));
        let html = analyzed(&mut view);
        assert!(html.contains(">Refresh Analysis</button>"));
        assert!(!html.contains("Best Pick"));
        assert!(!html.contains("Other Strong Opportunities"));
        assert!(!html.contains("<div class=\"stock-card\">"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn falling_stock_uses_down_arrow() {
        let mut falling = snapshot("DROP", 10.0, 5.0);
        falling.change = -0.75;
        falling.change_percent = -6.98;
        let mut view = AnalysisView::new(Arc::from(vec![falling]));
        let html = analyzed(&mut view);
        assert!(html.contains("class=\"change negative\""));
        assert!(html.contains("↓ ₹0.75 (-6.98%)"));
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let mut odd = snapshot("X<Y", 10.0, 5.0);
        odd.analysis = "<script>alert(1)</script>".to_string();
        let mut view = AnalysisView::new(Arc::from(vec![odd]));
        let html = analyzed(&mut view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("X&lt;Y"));
    }
}
