//! Column tables for agent and metric listings.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use console::style;

/// Columns holding numbers (row ids, process ids, readings) are right aligned.
const NUMERIC_COLUMNS: &[&str] = &["id", "pid", "value"];

pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|header| Cell::new(header.to_uppercase()).add_attribute(Attribute::Bold)),
        );

    for (index, header) in headers.iter().enumerate() {
        if NUMERIC_COLUMNS.contains(header) {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }
    table
}

/// Prefix the table with its row count, e.g. "3 readings:".
pub fn render_list(noun: &str, table: &Table, total: usize) -> String {
    match total {
        0 => format!("No {noun}s recorded."),
        1 => format!("{} {noun}:\n{table}", style(total).bold()),
        _ => format!("{} {noun}s:\n{table}", style(total).bold()),
    }
}
