use super::app::{App, InputMode};
use crate::data::{self, Token};
use crate::view_model::{self, HighlightMetric, SortField, SortOrder};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const NAME_COLUMN_WIDTH: usize = 24;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Length(3), // Search field
            Constraint::Length(7), // Highlight panels
            Constraint::Min(0),    // Main table
            Constraint::Length(3), // Status bar
            Constraint::Length(1), // Footer line
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_search(f, app, chunks[1]);
    draw_highlights(f, app, chunks[2]);
    draw_main_table(f, app, chunks[3]);
    draw_status_bar(f, app, chunks[4]);
    draw_footer(f, chunks[5]);

    if app.mode == InputMode::Columns {
        draw_column_menu(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Do it for the Vine",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(title, area);
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == InputMode::Search;
    let cursor = if editing { "█" } else { "" };
    let value = if app.search_input.is_empty() && !editing {
        Span::styled(
            "(press / to search by name, symbol, or address)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            format!("{}{}", app.search_input, cursor),
            Style::default().fg(Color::White),
        )
    };

    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let search = Paragraph::new(Line::from(value)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search "),
    );
    f.render_widget(search, area);
}

fn draw_highlights(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_highlight_panel(f, app, halves[0], HighlightMetric::Holders);
    draw_highlight_panel(f, app, halves[1], HighlightMetric::Volume24h);
}

fn draw_highlight_panel(f: &mut Frame, app: &App, area: Rect, metric: HighlightMetric) {
    let window =
        view_model::highlight_window(&app.dataset.tokens, &app.state, metric, &app.reference);

    let header = Row::new(vec![
        header_cell("Rank"),
        header_cell("Name"),
        header_cell("Symbol"),
        header_cell("Holders"),
        header_cell("24H Volume ($)"),
    ])
    .height(1);

    let rows: Vec<Row> = window
        .iter()
        .map(|(rank, token)| {
            let style = if token.name == app.reference {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(rank.to_string()),
                Cell::from(truncate_to(&token.name, NAME_COLUMN_WIDTH)),
                Cell::from(token.symbol.clone()),
                Cell::from(data::format_count(token.holders)),
                Cell::from(data::format_amount(token.volume_24h)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(16),
    ];

    let title = format!(" {} ", metric.title());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(title),
    );
    f.render_widget(table, area);
}

fn draw_main_table(f: &mut Frame, app: &mut App, area: Rect) {
    let displayed = view_model::displayed(&app.dataset.tokens, &app.state);
    let ranks = view_model::rank_by_address(&displayed);
    let rows = view_model::searched(&displayed, &app.state.query);

    let visible = app.state.columns.visible();

    let title = format!(
        " Rank by {} ({} shown / {} displayed) ",
        app.state.sort_field.title().to_uppercase(),
        rows.len(),
        displayed.len(),
    );

    if rows.is_empty() {
        let message = if app.load_failed {
            "  No token data loaded. Check the data source and the logs."
        } else if displayed.is_empty() && !app.state.show_all {
            "  No tokens above the cap filter. Press a to show all."
        } else {
            "  No tokens match the current search."
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(title),
        );
        f.render_widget(empty, area);
        return;
    }

    let mut header_cells = vec![header_cell("Rank")];
    for field in &visible {
        header_cells.push(header_cell_for(app, *field));
    }
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let selected = app.table_state.selected();
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let is_selected = selected == Some(i);
            let style = if is_selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if token.name == app.reference {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if is_selected { "▶ " } else { "  " };
            let rank = ranks.get(token.address.as_str()).copied().unwrap_or(0);

            let mut cells = vec![Cell::from(format!("{}{}", prefix, rank))];
            for field in &visible {
                cells.push(Cell::from(cell_text(token, *field)));
            }
            Row::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![Constraint::Length(8)];
    for field in &visible {
        widths.push(column_width(*field));
    }

    let table = Table::new(table_rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(title),
    );
    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let (help_text, help_color) = if app.load_failed {
        (
            " Data load failed; the table is empty. q:Quit ".to_string(),
            Color::Red,
        )
    } else {
        let text = match app.mode {
            InputMode::Normal => {
                let filter = if app.state.show_all {
                    "a:Hide <1M Cap"
                } else {
                    "a:Show All"
                };
                format!(
                    " /:Search  1-7:Sort  {}  c:Columns  v:Find {}  ↑/↓:Select  q:Quit ",
                    filter, app.reference
                )
            }
            InputMode::Search => " Type to search  Enter:Accept  Esc:Clear ".to_string(),
            InputMode::Columns => " ↑/↓:Move  Space:Toggle  Esc:Close ".to_string(),
        };
        (text, Color::Cyan)
    };

    let help = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(help_color),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Keys "));

    let snapshot = app
        .dataset
        .last_updated
        .as_deref()
        .unwrap_or(data::NOT_AVAILABLE);
    let info = format!(
        " {} tokens | snapshot {} | fetched {} ",
        app.dataset.tokens.len(),
        snapshot,
        app.fetched_at.format("%H:%M:%S"),
    );
    let info_widget = Paragraph::new(Line::from(Span::styled(
        info,
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Info "));

    f.render_widget(help, chunks[0]);
    f.render_widget(info_widget, chunks[1]);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        "Explore the world of Vine Coin and other top tokens.",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_column_menu(f: &mut Frame, app: &App) {
    let area = centered_rect(34, (SortField::ALL.len() + 2) as u16, f.area());

    let items: Vec<ListItem> = SortField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let cursor = if i == app.column_cursor { "▶ " } else { "  " };
            let mark = if app.state.columns.is_visible(*field) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if i == app.column_cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{} {}", cursor, mark, field.title()),
                style,
            )))
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Toggle Columns "),
    );

    f.render_widget(Clear, area);
    f.render_widget(menu, area);
}

// Cell helpers

fn header_cell(label: &str) -> Cell<'static> {
    Cell::from(label.to_string()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

/// Header cell with the sort digit and, on the active column, the order
/// arrow.
fn header_cell_for(app: &App, field: SortField) -> Cell<'static> {
    let digit = SortField::ALL.iter().position(|f| *f == field).unwrap_or(0) + 1;
    let arrow = if app.state.sort_field == field {
        match app.state.sort_order {
            SortOrder::Asc => " ↑",
            SortOrder::Desc => " ↓",
        }
    } else {
        ""
    };
    header_cell(&format!("{} {}{}", digit, field.title(), arrow))
}

fn cell_text(token: &Token, field: SortField) -> String {
    match field {
        SortField::Name => truncate_to(&token.name, NAME_COLUMN_WIDTH),
        SortField::Symbol => token.symbol.clone(),
        SortField::Holders => data::format_count(token.holders),
        SortField::MarketCap => data::format_amount(token.market_cap),
        SortField::Price => data::format_price(token.price),
        SortField::Volume24h => data::format_amount(token.volume_24h),
        SortField::Supply => data::format_amount(token.supply),
    }
}

fn column_width(field: SortField) -> Constraint {
    match field {
        SortField::Name => Constraint::Min(NAME_COLUMN_WIDTH as u16),
        SortField::Symbol => Constraint::Length(10),
        SortField::Holders => Constraint::Length(14),
        SortField::MarketCap => Constraint::Length(20),
        SortField::Price => Constraint::Length(12),
        SortField::Volume24h => Constraint::Length(20),
        SortField::Supply => Constraint::Length(20),
    }
}

/// Truncate to a display width, terminal-cell aware.
fn truncate_to(s: &str, max: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return s.to_string();
    }
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let x = outer.x + outer.width.saturating_sub(width) / 2;
    let y = outer.y + outer.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(outer.width),
        height: height.min(outer.height),
    }
}
