use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use calc_engine::{Composition, LayerSource, MortgageQuote, QuoteCheck};
use calc_session::{DistancePreview, Preview};

pub fn print_preview(preview: &Preview) {
    if !preview.description.is_empty() {
        println!("{}", preview.description);
    }
    let views = if preview.visible_views.is_empty() {
        "-".to_string()
    } else {
        preview.visible_views.join(", ")
    };
    println!("Views: {views}");
    println!("{}", layer_table(&preview.composition));
    println!("{}", price_table(preview));
}

pub fn layer_table(composition: &Composition) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Layer"), header_cell("Image")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    let Composition::View { view, layers } = composition else {
        table.add_row(vec![dim_cell("-"), dim_cell("no visible view"), dim_cell("-")]);
        return table;
    };
    for (index, layer) in layers.iter().enumerate() {
        let source = match &layer.source {
            LayerSource::Base => Cell::new(format!("{view} (base)"))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            LayerSource::Option(id) => Cell::new(id),
        };
        table.add_row(vec![Cell::new(index + 1), source, Cell::new(&layer.image)]);
    }
    table
}

pub fn price_table(preview: &Preview) -> Table {
    let price = &preview.price;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Price")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Base"), Cell::new(price.base)]);
    for line in &price.lines {
        let label = if line.label.is_empty() {
            &line.id
        } else {
            &line.label
        };
        table.add_row(vec![Cell::new(format!("  + {label}")), Cell::new(line.price)]);
    }
    table.add_row(vec![total_cell("TOTAL"), total_cell(price.total)]);
    table
}

pub fn print_distance(preview: &DistancePreview) {
    println!("{}", distance_table(preview));
}

pub fn distance_table(preview: &DistancePreview) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let Some(quote) = preview.quote else {
        let tariff = preview.tariff;
        table.add_row(vec![Cell::new("Base"), amount_cell(tariff.base)]);
        table.add_row(vec![Cell::new("Per km"), amount_cell(tariff.price_per_km)]);
        table.add_row(vec![Cell::new("Loading + unloading"), amount_cell(tariff.load)]);
        return table;
    };
    table.add_row(vec![Cell::new("Distance, km"), amount_cell(quote.one_way_km)]);
    table.add_row(vec![Cell::new("Charged km"), amount_cell(quote.effective_km)]);
    table.add_row(vec![Cell::new("Coefficient"), amount_cell(quote.coefficient)]);
    table.add_row(vec![Cell::new("Base"), amount_cell(quote.base)]);
    table.add_row(vec![Cell::new("Distance"), amount_cell(quote.km)]);
    table.add_row(vec![Cell::new("Loading + unloading"), amount_cell(quote.load)]);
    table.add_row(vec![total_cell("TOTAL"), total_cell(format_amount(quote.total))]);
    table
}

pub fn print_check(check: &QuoteCheck) {
    println!("{}", check_table(check));
    if check.is_consistent() {
        println!("Service pricing matches the tariff.");
    } else {
        eprintln!(
            "Service pricing differs from the tariff in {} item(s).",
            check.mismatches.len()
        );
    }
}

pub fn check_table(check: &QuoteCheck) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Local"),
        header_cell("Service"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    if check.is_consistent() {
        table.add_row(vec![
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
            amount_cell(check.local.total),
            amount_cell(check.local.total),
        ]);
        return table;
    }
    for mismatch in &check.mismatches {
        table.add_row(vec![
            Cell::new(mismatch.field).fg(Color::Red),
            amount_cell(mismatch.local),
            Cell::new(format_amount(mismatch.remote)).fg(Color::Red),
        ]);
    }
    table
}

pub fn print_mortgage(quote: &MortgageQuote) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Amount")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Monthly payment"), amount_cell(quote.monthly)]);
    table.add_row(vec![Cell::new("Overpayment"), amount_cell(quote.overpayment)]);
    table.add_row(vec![total_cell("TOTAL"), total_cell(format_amount(quote.total))]);
    println!("{table}");
}

/// Two decimals, trailing `.00` dropped.
pub fn format_amount(value: f64) -> String {
    let text = format!("{value:.2}");
    match text.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
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

fn total_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn amount_cell(value: f64) -> Cell {
    Cell::new(format_amount(value))
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
