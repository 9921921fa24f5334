//! View rendering dispatch.

pub mod competencies;
pub mod jobs;
pub mod org_chart;

use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::App;
use chrono::{Duration, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Informational notifications fade after this long; errors stay.
const NOTIFICATION_TTL_SECS: i64 = 8;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::OrgChart => org_chart::render(f, app, layout[1]),
        View::Jobs => jobs::render(f, app, layout[1]),
        View::Competencies => competencies::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " COMPASS ",
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    )];
    for view in View::all() {
        let style = if *view == app.active_view {
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_dim)
        };
        spans.push(Span::styled(
            format!(" {}:{} ", view.index() + 1, view.title()),
            style,
        ));
    }
    let title = format!(" Root: {} ", app.org.root);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(title, Style::default().fg(app.theme.text)));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.active_view {
        View::OrgChart => {
            "j/k move • x toggle • E/C expand/collapse all • / search • v division • Enter drill • Bksp up • r refresh • Tab view • q quit"
        }
        View::Jobs | View::Competencies => "j/k move • / search • r refresh • Tab view • q quit",
    };
    let ttl = Duration::seconds(NOTIFICATION_TTL_SECS);
    let visible = app
        .last_notification()
        .filter(|note| note.is_visible(Utc::now(), ttl));
    let (text, style) = match visible {
        Some(note) => {
            let color = match note.level {
                NotificationLevel::Info => app.theme.info,
                NotificationLevel::Warning => app.theme.warning,
                NotificationLevel::Error => app.theme.error,
                NotificationLevel::Success => app.theme.success,
            };
            (
                format!("{}: {}", note.level.label(), note.message),
                Style::default().fg(color),
            )
        }
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

/// Left/right split used by every view.
pub(crate) fn two_column(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Filter/search strip on top, content below.
pub(crate) fn with_filter_strip(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

pub(crate) fn placeholder(f: &mut Frame<'_>, app: &App, title: &str, message: &str, area: Rect) {
    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(app.theme.text_dim))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(widget, area);
}
