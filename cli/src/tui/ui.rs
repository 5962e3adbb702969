use chrono::{DateTime, Local};
use listo_core::{Clock, Stats, TaskStore};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Confirm, InputMode};

pub fn draw<S: TaskStore, C: Clock>(f: &mut Frame, app: &mut App<S, C>) {
    let size = f.area();
    let stats = app.state.stats();

    let error_height = if app.state.error().is_some() { 3 } else { 0 };
    let stats_height = if stats.total > 0 { 3 } else { 0 };
    let input_height = if app.input_mode == InputMode::Normal { 0 } else { 3 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(error_height), // Error banner
            Constraint::Length(stats_height), // Stats
            Constraint::Min(1),               // Todo list
            Constraint::Length(input_height), // Input / confirmation
            Constraint::Length(1),            // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("LISTO")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, chunks[0]);

    if let Some(message) = app.state.error() {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled(message, Style::default().fg(Color::Red)),
            Span::styled("  (x to dismiss)", Style::default().fg(Color::DarkGray)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(banner, chunks[1]);
    }

    if stats.total > 0 {
        draw_stats(f, &stats, chunks[2]);
    }

    draw_task_list(f, app, chunks[3]);

    if app.input_mode != InputMode::Normal {
        draw_input(f, app, chunks[4]);
    }

    let help = match app.input_mode {
        InputMode::Normal => {
            "j/k: Navigate | space: Toggle | a: Add | e: Edit | d: Delete | c: Clear done | x: Dismiss | q: Quit"
        }
        InputMode::Adding | InputMode::Editing(_) => "Enter: Save | Esc: Cancel",
        InputMode::Confirming(_) => "y: Confirm | any other key: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[5]);
}

fn draw_stats(f: &mut Frame, stats: &Stats, area: Rect) {
    let label = format!(
        "{} total | {} completed | {} pending | {}%",
        stats.total,
        stats.completed,
        stats.pending,
        stats.progress_percent()
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Progress ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(stats.progress().clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_task_list<S: TaskStore, C: Clock>(f: &mut Frame, app: &mut App<S, C>, area: Rect) {
    let block = Block::default()
        .title(" Todos ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if app.rows.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No todos yet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Press 'a' to add your first todo."),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|task| {
            let (icon, text_style) = if task.completed {
                (
                    "✔",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("☐", Style::default())
            };
            let created: DateTime<Local> = DateTime::from(task.created_at);

            Row::new(vec![
                Span::styled(icon, Style::default().fg(Color::Green)),
                Span::styled(task.text.clone(), text_style),
                Span::styled(
                    created.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Min(10),    // Text
            Constraint::Length(10), // Created
        ],
    )
    .header(Row::new(vec!["", "Todo", "Created"]).style(Style::default().fg(Color::Yellow)))
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_input<S: TaskStore, C: Clock>(f: &mut Frame, app: &App<S, C>, area: Rect) {
    let (title, body) = match app.input_mode {
        InputMode::Adding => (" New todo ", app.input.as_str()),
        InputMode::Editing(_) => (" Edit todo ", app.input.as_str()),
        InputMode::Confirming(Confirm::Delete(_)) => {
            (" Confirm ", "Are you sure you want to delete this todo? (y/N)")
        }
        InputMode::Confirming(Confirm::ClearCompleted(n)) => {
            let prompt = format!("Are you sure you want to remove {n} completed todos? (y/N)");
            let widget = Paragraph::new(prompt).block(
                Block::default()
                    .title(" Confirm ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
            f.render_widget(widget, area);
            return;
        }
        InputMode::Normal => return,
    };

    let widget = Paragraph::new(body).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(widget, area);

    if matches!(app.input_mode, InputMode::Adding | InputMode::Editing(_)) {
        let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
        f.set_cursor_position((cursor_x(area, &before_cursor), area.y + 1));
    }
}

/// Column of the input cursor, kept inside the box border.
fn cursor_x(area: Rect, before_cursor: &str) -> u16 {
    let width = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(1).saturating_add(width);
    x.min(area.right().saturating_sub(2))
}
