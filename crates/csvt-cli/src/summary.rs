//! Tag summary table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use csvt_core::{Summary, TagSummary};

/// Label for the bucket of untagged records.
pub const UNTAGGED_LABEL: &str = "(untagged)";

pub fn print_summary(summary: &Summary) {
    println!("{}", summary_table(summary));
    println!(
        "{} of {} records tagged, {} untagged.",
        summary.annotated_count(),
        summary.total,
        summary.unannotated_count()
    );
}

/// One row per tag in registry order, then the untagged bucket and a total.
/// Every number column gets a total column.
pub fn summary_table(summary: &Summary) -> Table {
    let columns: Vec<&str> = summary
        .unannotated
        .totals
        .iter()
        .map(|t| t.column.as_str())
        .collect();

    let mut table = Table::new();
    let mut header = vec![header_cell("Tag"), header_cell("Records")];
    header.extend(columns.iter().map(|c| header_cell(c)));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 1..=columns.len() + 1 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for bucket in &summary.tags {
        table.add_row(bucket_row(bucket, &columns));
    }
    table.add_row(bucket_row(&summary.unannotated, &columns));

    let mut total_row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total).add_attribute(Attribute::Bold),
    ];
    for column in &columns {
        let total: f64 = summary
            .tags
            .iter()
            .chain([&summary.unannotated])
            .filter_map(|b| b.total(column))
            .sum();
        total_row.push(amount_cell(total).add_attribute(Attribute::Bold));
    }
    table.add_row(total_row);
    table
}

fn bucket_row(bucket: &TagSummary, columns: &[&str]) -> Vec<Cell> {
    let label = match &bucket.tag {
        Some(tag) => Cell::new(tag)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        None => dim_cell(UNTAGGED_LABEL),
    };
    let count = if bucket.count == 0 {
        dim_cell(0)
    } else {
        Cell::new(bucket.count)
    };
    let mut row = vec![label, count];
    for column in columns {
        row.push(amount_cell(bucket.total(column).unwrap_or_default()));
    }
    row
}

fn amount_cell(amount: f64) -> Cell {
    let cell = Cell::new(format!("{amount:.2}"));
    if amount < 0.0 {
        cell.fg(Color::Red)
    } else if amount > 0.0 {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

/// Compact style for key/value listings.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
