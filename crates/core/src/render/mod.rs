pub mod chart;
pub mod html;
pub mod text;

use crate::domain::catalog::CURRENCY_SYMBOL;
use anyhow::Context;
use minijinja::{AutoEscape, Environment, Value};
use serde::Serialize;

pub(crate) const PAGE_TEMPLATE: &str = "page.html";
pub(crate) const CHART_TEMPLATE: &str = "chart.svg";

/// Renders one of the bundled templates. Every template is HTML auto-escaped,
/// including the SVG one, so dynamic text never needs escaping by hand.
pub(crate) fn render_template(name: &str, ctx: impl Serialize) -> anyhow::Result<String> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template(PAGE_TEMPLATE, include_str!("../../templates/page.html"))
        .context("page template is invalid")?;
    env.add_template(CHART_TEMPLATE, include_str!("../../templates/chart.svg"))
        .context("chart template is invalid")?;

    let template = env
        .get_template(name)
        .with_context(|| format!("unknown template {name}"))?;
    template
        .render(Value::from_serialize(&ctx))
        .with_context(|| format!("failed to render template {name}"))
}

pub fn rupees(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

pub fn direction_arrow(gaining: bool) -> &'static str {
    if gaining {
        "↑"
    } else {
        "↓"
    }
}
