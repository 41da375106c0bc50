use prettytable::{Cell, Row, Table};

use crate::solver::engine::SearchStats;

/// Renders the search counters as a small text table, for printing after an
/// enumeration finishes (or mid-way, for a progress snapshot).
pub fn render_stats_table(stats: &SearchStats) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

    let rows: [(&str, String); 5] = [
        ("Options tried", stats.nodes_visited.to_string()),
        ("Backtracks", stats.backtracks.to_string()),
        ("Color conflicts", stats.color_conflicts.to_string()),
        ("Solutions", stats.solutions.to_string()),
        ("Max depth", stats.max_depth.to_string()),
    ];
    for (metric, value) in rows {
        table.add_row(Row::new(vec![Cell::new(metric), Cell::new(&value)]));
    }

    table.to_string()
}
