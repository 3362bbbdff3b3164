use crate::domain::catalog::EXCHANGE;
use crate::render::{direction_arrow, rupees};
use crate::view::state::Analysis;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};

/// Terminal report of one analysis: the best pick followed by a table of every pick.
pub fn render_report(analysis: &Analysis) -> String {
    let Some(best) = analysis.best_pick() else {
        return format!(
            "Analysis {} found no stocks under the price ceiling.\n",
            analysis.run_id
        );
    };

    let mut out = format!(
        "Best Pick: {} ({} • {EXCHANGE}) {} {} {:.2}%  Score: {}/10\n",
        best.name,
        best.symbol,
        rupees(best.price),
        direction_arrow(best.is_gaining()),
        best.change_percent,
        best.score,
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            "#", "Symbol", "Name", "Price", "Change", "RSI", "MACD", "Score",
        ]);

    for (i, stock) in analysis.picks.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&stock.symbol),
            Cell::new(&stock.name),
            Cell::new(rupees(stock.price)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} {:.2}%",
                direction_arrow(stock.is_gaining()),
                stock.change_percent
            ))
            .set_alignment(CellAlignment::Right),
            Cell::new(stock.rsi),
            Cell::new(stock.macd),
            Cell::new(format!("{}/10", stock.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    out.push_str(&table.to_string());
    out.push('\n');
    out
}
