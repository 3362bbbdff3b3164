//! Inline SVG charts for the analysis page.

use crate::domain::snapshot::{StockSnapshot, MAX_SCORE};
use crate::render::{render_template, CHART_TEMPLATE};
use serde::Serialize;

/// Absolute padding added above and below the observed price range.
pub const PRICE_PADDING: f64 = 2.0;

const WIDTH: f64 = 600.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 32.0;
const Y_TICKS: usize = 5;

fn px(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Serialize)]
struct Tick {
    y: String,
    label_y: String,
    label: String,
}

#[derive(Debug, Serialize)]
struct Polyline {
    stroke: &'static str,
    width: f64,
    points: String,
}

#[derive(Debug, Serialize)]
struct Marker {
    cx: String,
    cy: String,
    fill: &'static str,
    title: String,
}

#[derive(Debug, Serialize)]
struct Bar {
    x: String,
    y: String,
    width: String,
    height: String,
    fill: &'static str,
    title: String,
}

#[derive(Debug, Serialize)]
struct XLabel {
    x: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct Legend {
    x: String,
    text_x: String,
    fill: &'static str,
    text: String,
}

/// Template context for `chart.svg`. Coordinates are preformatted pixel strings.
#[derive(Debug, Serialize)]
struct SvgChart<'a> {
    width: f64,
    height: f64,
    title: &'a str,
    grid_x1: String,
    grid_x2: String,
    tick_x: String,
    x_label_y: String,
    ticks: Vec<Tick>,
    polyline: Option<Polyline>,
    markers: Vec<Marker>,
    bars: Vec<Bar>,
    x_labels: Vec<XLabel>,
    legend: Option<Legend>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    height: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_bottom(&self) -> f64 {
        self.height - MARGIN_BOTTOM
    }

    fn y_px(&self, value: f64) -> f64 {
        let plot_height = self.plot_bottom() - MARGIN_TOP;
        let span = self.y_max - self.y_min;
        if span <= 0.0 {
            return self.plot_bottom();
        }
        MARGIN_TOP + (self.y_max - value) / span * plot_height
    }

    /// Empty chart with the dashed value grid filled in.
    fn chart<'a>(&self, title: &'a str, decimals: usize) -> SvgChart<'a> {
        let ticks = (0..=Y_TICKS)
            .map(|i| {
                let value = self.y_min + (self.y_max - self.y_min) * i as f64 / Y_TICKS as f64;
                let y = self.y_px(value);
                Tick {
                    y: px(y),
                    label_y: px(y + 4.0),
                    label: format!("{value:.decimals$}"),
                }
            })
            .collect();

        SvgChart {
            width: WIDTH,
            height: self.height,
            title,
            grid_x1: px(MARGIN_LEFT),
            grid_x2: px(WIDTH - MARGIN_RIGHT),
            tick_x: px(MARGIN_LEFT - 6.0),
            x_label_y: px(self.plot_bottom() + 18.0),
            ticks,
            polyline: None,
            markers: Vec::new(),
            bars: Vec::new(),
            x_labels: Vec::new(),
            legend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub height: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    points: Vec<(String, f64)>,
    y_domain: (f64, f64),
}

impl LineChart {
    pub fn price_trend(snapshot: &StockSnapshot) -> Self {
        let points: Vec<(String, f64)> = snapshot
            .price_history
            .iter()
            .map(|p| (p.label.clone(), p.price))
            .collect();

        let (lo, hi) = points
            .iter()
            .map(|(_, price)| *price)
            .fold(None, |acc: Option<(f64, f64)>, price| match acc {
                Some((lo, hi)) => Some((lo.min(price), hi.max(price))),
                None => Some((price, price)),
            })
            .unwrap_or((snapshot.price, snapshot.price));

        Self {
            title: "5-Day Price Trend".to_string(),
            height: 200.0,
            stroke: "#10b981",
            stroke_width: 3.0,
            points,
            y_domain: (lo - PRICE_PADDING, hi + PRICE_PADDING),
        }
    }

    pub fn y_domain(&self) -> (f64, f64) {
        self.y_domain
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(label, _)| label.as_str())
    }

    pub fn to_svg(&self) -> anyhow::Result<String> {
        let frame = Frame {
            height: self.height,
            y_min: self.y_domain.0,
            y_max: self.y_domain.1,
        };
        let mut chart = frame.chart(&self.title, 1);

        let n = self.points.len();
        let x_px = |i: usize| {
            if n <= 1 {
                MARGIN_LEFT + frame.plot_width() / 2.0
            } else {
                MARGIN_LEFT + frame.plot_width() * i as f64 / (n - 1) as f64
            }
        };

        let mut path = Vec::with_capacity(n);
        for (i, (label, price)) in self.points.iter().enumerate() {
            let (x, y) = (x_px(i), frame.y_px(*price));
            path.push(format!("{x:.1},{y:.1}"));
            chart.markers.push(Marker {
                cx: px(x),
                cy: px(y),
                fill: self.stroke,
                title: format!("{label}: {price}"),
            });
            chart.x_labels.push(XLabel {
                x: px(x),
                text: label.clone(),
            });
        }
        chart.polyline = Some(Polyline {
            stroke: self.stroke,
            width: self.stroke_width,
            points: path.join(" "),
        });

        render_template(CHART_TEMPLATE, &chart)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub height: f64,
    pub fill: &'static str,
    pub legend: String,
    bars: Vec<(String, f64)>,
}

impl BarChart {
    pub fn score_comparison(picks: &[StockSnapshot]) -> Self {
        Self {
            title: "Investment Score Comparison".to_string(),
            height: 300.0,
            fill: "#667eea",
            legend: "Investment Score".to_string(),
            bars: picks.iter().map(|s| (s.symbol.clone(), s.score)).collect(),
        }
    }

    /// Fixed to the score range regardless of the data.
    pub fn y_domain(&self) -> (f64, f64) {
        (0.0, MAX_SCORE)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.bars.iter().map(|(symbol, _)| symbol.as_str())
    }

    pub fn to_svg(&self) -> anyhow::Result<String> {
        let (y_min, y_max) = self.y_domain();
        let frame = Frame {
            height: self.height,
            y_min,
            y_max,
        };
        let mut chart = frame.chart(&self.title, 0);

        let band = frame.plot_width() / self.bars.len().max(1) as f64;
        let bar_width = band * 0.6;
        for (i, (symbol, score)) in self.bars.iter().enumerate() {
            let center = MARGIN_LEFT + band * (i as f64 + 0.5);
            let top = frame.y_px(score.clamp(y_min, y_max));
            chart.bars.push(Bar {
                x: px(center - bar_width / 2.0),
                y: px(top),
                width: px(bar_width),
                height: px(frame.plot_bottom() - top),
                fill: self.fill,
                title: format!("{symbol}: {score}"),
            });
            chart.x_labels.push(XLabel {
                x: px(center),
                text: symbol.clone(),
            });
        }

        chart.legend = Some(Legend {
            x: px(WIDTH - MARGIN_RIGHT - 140.0),
            text_x: px(WIDTH - MARGIN_RIGHT - 122.0),
            fill: self.fill,
            text: self.legend.clone(),
        });

        render_template(CHART_TEMPLATE, &chart)
    }
}
