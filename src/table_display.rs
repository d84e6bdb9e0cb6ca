use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

use column_state::column_menu::{ColumnMenu, MenuAction};
use column_state::config::config::IconConfig;
use column_state::data::SortDirection;
use column_state::state::ViewerSession;
use column_state::styling::CellStyle;

pub fn display_columns(session: &ViewerSession, icons: &IconConfig) {
    if session.columns.is_empty() {
        println!("{}", "No columns.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["#", "Column", "Type", "Locked", "Sort"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for (idx, column) in session.columns.iter().enumerate() {
        let lock = if column.locked {
            icons.lock.as_str()
        } else {
            ""
        };
        let sort = match session.sort_info.direction_of(&column.name) {
            Some(SortDirection::Asc) => icons.sort_asc.clone(),
            Some(SortDirection::Desc) => icons.sort_desc.clone(),
            None => String::new(),
        };

        let mut name = Cell::new(&column.name);
        if column.locked {
            name = name.add_attribute(Attribute::Bold);
        }

        table.add_row(vec![
            Cell::new(idx + 1),
            name,
            Cell::new(column.column_type()),
            Cell::new(lock),
            Cell::new(sort),
        ]);
    }

    println!("{table}");
    println!(
        "\n{}",
        format!(
            "{} columns, {} fixed, sort: [{}]",
            session.columns.len(),
            session.fixed_column_count,
            session.sort_info
        )
        .green()
    );
}

pub fn display_style(value: &str, style: &CellStyle) {
    let mut cell = Cell::new(value);
    if style.color() == Some("red") {
        cell = cell.fg(Color::Red);
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Style").add_attribute(Attribute::Bold),
    ]);
    let description = serde_json::to_string(style).unwrap_or_default();
    table.add_row(vec![cell, Cell::new(description)]);
    println!("{table}");
}

pub fn display_menu(menu: &ColumnMenu) {
    println!("{}", menu.header().bold());
    for action in menu.actions() {
        let line = match action {
            MenuAction::Sort(order) if order == menu.current_sort() => {
                format!("  sort {} (active)", order.label())
            }
            MenuAction::Sort(order) => format!("  sort {}", order.label()),
            MenuAction::Move(m) => format!("  {}", m.hint()),
            MenuAction::Lock => "  Lock".to_string(),
            MenuAction::Unlock => "  Unlock".to_string(),
            MenuAction::Popup(kind) => format!("  {}", kind.title()),
            MenuAction::Formats => "  Formats".to_string(),
        };
        println!("{}", line);
    }
}
