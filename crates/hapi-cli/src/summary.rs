use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hapi_cli::types::{ConvertResult, VariableSummary};

pub fn print_summary(result: &ConvertResult) {
    println!("Source: {} ({})", result.data.display(), result.source_format);
    println!("Records: {}", result.records);
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Type"),
        header_cell("Values"),
        header_cell("Shape"),
        header_cell("Units"),
        header_cell("Depends"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for variable in &result.variables {
        table.add_row(vec![
            name_cell(variable),
            var_type_cell(&variable.var_type),
            Cell::new(variable.kind),
            Cell::new(&variable.shape),
            Cell::new(display_units(&variable.units)),
            Cell::new(&variable.depends),
        ]);
    }
    println!("{table}");

    if !result.frame_units.is_empty() {
        let mut units = Table::new();
        units.set_header(vec![header_cell("Column"), header_cell("Unit")]);
        apply_table_style(&mut units);
        for (column, unit) in &result.frame_units {
            units.add_row(vec![Cell::new(column), Cell::new(unit)]);
        }
        println!("{units}");
    }

    if !result.dangling.is_empty() {
        eprintln!("Unresolved dependencies:");
        for (variable, target) in &result.dangling {
            eprintln!("- {variable} -> {target}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn name_cell(variable: &VariableSummary) -> Cell {
    let cell = Cell::new(&variable.name).add_attribute(Attribute::Bold);
    if variable.record_varying {
        cell
    } else {
        cell.fg(Color::Blue)
    }
}

fn var_type_cell(var_type: &str) -> Cell {
    match var_type {
        "data" => Cell::new(var_type).fg(Color::Green),
        _ => Cell::new(var_type).add_attribute(Attribute::Dim),
    }
}

/// Blank units are a single space; show them as a dash.
fn display_units(units: &str) -> &str {
    if units.trim().is_empty() { "-" } else { units }
}
