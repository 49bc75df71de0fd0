use crate::config::config::DisplayConfig;
use crate::data::collection_view::CollectionView;
use crate::data::query::{QueryParams, SortDirection};
use crate::data::record::{collect_field_names, Record};
use crate::data::screens::ScreenPreset;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Columns to show: the screen's columns that the data actually carries,
/// or every field seen when there is no screen or none of them match.
pub fn resolve_columns(preset: Option<&ScreenPreset>, records: &[Record]) -> Vec<String> {
    let available = collect_field_names(records);

    if let Some(preset) = preset {
        let columns: Vec<String> = preset
            .columns
            .iter()
            .filter(|column| available.iter().any(|name| name.as_str() == **column))
            .map(|column| column.to_string())
            .collect();
        if !columns.is_empty() {
            return columns;
        }
    }

    available
}

fn truncate(text: String, max_width: usize) -> String {
    if max_width == 0 || text.chars().count() <= max_width {
        return text;
    }
    let mut truncated: String = text.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn header_label(column: &str, params: &QueryParams) -> String {
    match (params.sort_field.as_deref(), params.sort_direction) {
        (Some(field), SortDirection::Ascending) if field == column => format!("{} ▲", column),
        (Some(field), SortDirection::Descending) if field == column => format!("{} ▼", column),
        _ => column.to_string(),
    }
}

/// Build the table for the current page of a view
pub fn render_page(
    view: &CollectionView<'_>,
    columns: &[String],
    params: &QueryParams,
    display: &DisplayConfig,
) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers: Vec<Cell> = Vec::with_capacity(columns.len() + 1);
    if display.show_row_numbers {
        headers.push(Cell::new("#").add_attribute(Attribute::Bold));
    }
    headers.extend(
        columns
            .iter()
            .map(|column| Cell::new(header_label(column, params)).add_attribute(Attribute::Bold)),
    );
    table.set_header(headers);

    let first_row = view.page_info().first_row;
    for (offset, record) in view.page_slice().into_iter().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(columns.len() + 1);
        if display.show_row_numbers {
            row.push((first_row + offset).to_string());
        }
        row.extend(
            columns
                .iter()
                .map(|column| truncate(record.display_value(column), display.max_column_width)),
        );
        table.add_row(row);
    }

    table
}

/// Print a page with its footer, or the empty-state message
pub fn display_view(
    view: &CollectionView<'_>,
    columns: &[String],
    params: &QueryParams,
    display: &DisplayConfig,
) {
    if view.is_empty() {
        let message = if params.has_active_filters() {
            "No records match the current search and filters."
        } else {
            "No records found."
        };
        if display.use_color {
            println!("{}", message.yellow());
        } else {
            println!("{}", message);
        }
        return;
    }

    if view.page_slice().is_empty() {
        let message = format!(
            "Page {} is out of range ({} pages).",
            view.page(),
            view.total_pages()
        );
        if display.use_color {
            println!("{}", message.yellow());
        } else {
            println!("{}", message);
        }
        return;
    }

    println!("{}", render_page(view, columns, params, display));

    let footer = view.page_info().to_string();
    if display.use_color {
        println!("{}", footer.green());
    } else {
        println!("{}", footer);
    }
}
