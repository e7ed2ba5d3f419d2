//! Drawing
//!
//! Every piece of server-provided text goes through `sanitize_terminal`
//! before it reaches a widget, so a title can never move the cursor or
//! recolor the screen.

use crate::alert::{Alert, AlertKind};
use crate::app::{App, AppMode, RowAction, RowHit};
use crate::modal::{FormField, IssueForm, Modal};
use crate::view::{Badge, EMPTY_TEXT, EMPTY_TITLE, IssueListView, IssueRow};
use issuedesk_core::format::{format_label, sanitize_terminal};
use issuedesk_core::{Priority, Status};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Instant;

const ALERT_WIDTH: u16 = 44;
const ALERT_HEIGHT: u16 = 3;
const ROW_HEIGHT: u16 = 2;
const EDIT_BUTTON: &str = "[Edit]";
const DELETE_BUTTON: &str = "[Delete]";
/// Narrower lists get no row buttons; the keys still work
const ROW_BUTTONS_MIN_WIDTH: u16 = 40;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, app, chunks[0]);
    app.hit.rows = render_issue_list(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    app.hit.modal = None;
    if app.mode == AppMode::Help {
        render_help_overlay(f);
    }
    match app.modals.active() {
        Some(Modal::Create(form)) => {
            app.hit.modal = Some(render_issue_form(f, form, "New Issue"));
        }
        Some(Modal::Edit { form, .. }) => {
            app.hit.modal = Some(render_issue_form(f, form, "Edit Issue"));
        }
        Some(Modal::ConfirmDelete { title, .. }) => {
            app.hit.modal = Some(render_confirm_delete(f, title));
        }
        None => {}
    }

    render_alerts(f, app, size);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let stats_line = Line::from(vec![
        Span::styled("Open ", Style::default().fg(Color::Green)),
        Span::styled(
            stats.open.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("In Progress ", Style::default().fg(Color::Yellow)),
        Span::styled(
            stats.in_progress.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Closed ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            stats.closed.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw("Total "),
        Span::styled(
            stats.total.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let filter = &app.filter;
    let status = filter
        .status
        .map(|s| format_label(s.as_str()))
        .unwrap_or_else(|| "All".into());
    let priority = filter
        .priority
        .map(|p| format_label(p.as_str()))
        .unwrap_or_else(|| "All".into());
    let mut filter_line = vec![
        Span::styled("[s]", Style::default().fg(Color::Cyan)),
        Span::raw(format!(" Status: {status}  ")),
        Span::styled("[p]", Style::default().fg(Color::Cyan)),
        Span::raw(format!(" Priority: {priority}  ")),
        Span::styled("[/]", Style::default().fg(Color::Cyan)),
        Span::raw(format!(" Search: {}", sanitize_terminal(&filter.search))),
    ];
    if filter.is_active() {
        filter_line.push(Span::styled(
            "  [c] clear",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(vec![stats_line, Line::from(filter_line)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title("IssueDesk"),
    );
    f.render_widget(header, area);
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Open => Color::Green,
        Status::InProgress => Color::Yellow,
        Status::Closed => Color::DarkGray,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn badge(badge: &Badge, color: Color) -> Span<'static> {
    Span::styled(
        format!("[{}]", badge.label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn row_item(row: &IssueRow) -> ListItem<'static> {
    let header = Line::from(vec![
        Span::styled(
            format!("#{} ", sanitize_terminal(&row.short_id)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            sanitize_terminal(&row.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        badge(&row.status_badge, status_color(row.status)),
        Span::raw(" "),
        badge(&row.priority_badge, priority_color(row.priority)),
    ]);
    let body = Line::from(vec![
        Span::raw("    "),
        Span::styled(
            sanitize_terminal(&row.description),
            Style::default().fg(Color::Gray),
        ),
    ]);
    ListItem::new(vec![header, body])
}

fn render_issue_list(f: &mut Frame, app: &App, area: Rect) -> Vec<RowHit> {
    let view = app.list_view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!("Issues ({})", view.rows().len()));
    let inner = block.inner(area);

    match view {
        IssueListView::Empty => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    EMPTY_TITLE,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(EMPTY_TEXT),
            ];
            let empty = Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(empty, area);
            Vec::new()
        }
        IssueListView::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(row_item).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(app.selected));
            f.render_stateful_widget(list, area, &mut state);
            render_row_buttons(f, &rows, inner, state.offset())
        }
    }
}

/// Draws edit/delete buttons on each visible row and returns where rows and
/// buttons landed, buttons first
fn render_row_buttons(
    f: &mut Frame,
    rows: &[IssueRow],
    inner: Rect,
    offset: usize,
) -> Vec<RowHit> {
    let show_buttons = inner.width >= ROW_BUTTONS_MIN_WIDTH;
    let mut hits = Vec::new();
    let mut y = inner.y;

    for row in rows.iter().skip(offset) {
        if y >= inner.bottom() {
            break;
        }
        if show_buttons {
            let edit = Rect::new(inner.right().saturating_sub(16), y, 6, 1);
            let delete = Rect::new(edit.x + 7, y, 8, 1);
            f.render_widget(
                Paragraph::new(Span::styled(EDIT_BUTTON, Style::default().fg(Color::Yellow))),
                edit,
            );
            f.render_widget(
                Paragraph::new(Span::styled(DELETE_BUTTON, Style::default().fg(Color::Red))),
                delete,
            );
            hits.push(RowHit {
                id: row.id.clone(),
                action: RowAction::Edit,
                area: edit,
            });
            hits.push(RowHit {
                id: row.id.clone(),
                action: RowAction::Delete,
                area: delete,
            });
        }
        let height = ROW_HEIGHT.min(inner.bottom() - y);
        hits.push(RowHit {
            id: row.id.clone(),
            action: RowAction::Select,
            area: Rect::new(inner.x, y, inner.width, height),
        });
        y = y.saturating_add(ROW_HEIGHT);
    }
    hits
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(message) = app.loading.message() {
        Line::from(vec![
            Span::styled(
                format!("{} ", app.loading.spinner(Instant::now())),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(message.to_string(), Style::default().fg(Color::Cyan)),
        ])
    } else if app.mode == AppMode::Search {
        Line::from(vec![
            Span::styled(
                "[SEARCH] ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(sanitize_terminal(&app.filter.search)),
            Span::raw("_"),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                "[NORMAL]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(
                " | [a]dd [e]dit [d]elete [/]search [s]tatus [p]riority [r]eload [?]help [q]uit",
            ),
        ])
    };

    let bar = Paragraph::new(content)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(bar, area);
}

/// Newest alert on top, stacked down the right edge
fn render_alerts(f: &mut Frame, app: &mut App, area: Rect) {
    app.hit.alerts.clear();
    if app.alerts.is_empty() {
        return;
    }
    let width = ALERT_WIDTH.min(area.width);
    let x = area.x + area.width - width;

    let mut y = area.y;
    for alert in app.alerts.alerts().iter().rev() {
        if y + ALERT_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, ALERT_HEIGHT);
        render_alert(f, alert, rect);
        app.hit.alerts.push((alert.id, rect));
        y += ALERT_HEIGHT;
    }
}

fn render_alert(f: &mut Frame, alert: &Alert, area: Rect) {
    let (color, title) = match alert.kind {
        AlertKind::Success => (Color::Green, "Success"),
        AlertKind::Error => (Color::Red, "Error"),
        AlertKind::Info => (Color::Cyan, "Info"),
    };

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(sanitize_terminal(&alert.message))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Black))
                .title(format!("{title} {}", alert.created_at.format("%H:%M:%S"))),
        )
        .style(Style::default().fg(color));
    f.render_widget(paragraph, area);
}

fn render_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )]),
        Line::from(""),
        Line::from("  j/Down       Move down"),
        Line::from("  k/Up         Move up"),
        Line::from("  g/G          Go to top/bottom"),
        Line::from("  a/Ctrl-n     New issue"),
        Line::from("  e/Enter      Edit issue"),
        Line::from("  d            Delete issue"),
        Line::from("  / or Ctrl-/  Search"),
        Line::from("  s            Cycle status filter"),
        Line::from("  p            Cycle priority filter"),
        Line::from("  c            Clear filters"),
        Line::from("  r            Reload, dropping any pending request"),
        Line::from("  Esc          Cancel the pending request"),
        Line::from("  x            Dismiss newest alert"),
        Line::from("  ?            Help"),
        Line::from("  q/Ctrl-c     Quit"),
        Line::from(""),
        Line::from("In dialogs: Tab/Shift-Tab move, Up/Down change, Enter save, Esc cancel"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Black))
                .title("Help (press Esc to close)"),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_issue_form(f: &mut Frame, form: &IssueForm, title: &str) -> Rect {
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);

    let field_style = |field: FormField| {
        if form.focus == field {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let cursor = |field: FormField| if form.focus == field { "_" } else { "" };

    let mut text = vec![Line::from("")];
    for &field in form.fields() {
        let line = match field {
            FormField::Title => Line::from(vec![
                Span::styled("Title*: ", field_style(field)),
                Span::raw(sanitize_terminal(&form.title)),
                Span::raw(cursor(field)),
            ]),
            FormField::Description => Line::from(vec![
                Span::styled("Description*: ", field_style(field)),
                Span::raw(sanitize_terminal(&form.description)),
                Span::raw(cursor(field)),
            ]),
            FormField::Priority => Line::from(vec![
                Span::styled("Priority: ", field_style(field)),
                Span::styled(
                    format!("[{}]", format_label(form.priority.as_str())),
                    field_style(field).fg(priority_color(form.priority)),
                ),
                Span::raw(" (↑/↓ to change)"),
            ]),
            FormField::Status => Line::from(vec![
                Span::styled("Status: ", field_style(field)),
                Span::styled(
                    format!("[{}]", format_label(form.status.as_str())),
                    field_style(field).fg(status_color(form.status)),
                ),
                Span::raw(" (↑/↓ to change)"),
            ]),
        };
        text.push(line);
    }
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel  "),
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next field"),
    ]));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .style(Style::default().bg(Color::Black))
                .title(title.to_string()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
    area
}

fn render_confirm_delete(f: &mut Frame, title: &str) -> Rect {
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(format!("Delete \"{}\"?", sanitize_terminal(title))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red)),
            Span::raw(" Delete  "),
            Span::styled("[n]", Style::default().fg(Color::Green)),
            Span::raw(" Cancel"),
        ]),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black))
                .title("Delete Issue"),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
    area
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
