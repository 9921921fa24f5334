//! Job catalog view with the selected job's competency profile.

use crate::state::{App, DetailState};
use crate::theme::proficiency_color;
use crate::views::{placeholder, two_column, with_filter_strip};
use crate::widgets::{DetailPanel, FilterBar, FilterOption, SearchBox};
use compass_core::{CompetencyProfile, Job};
use compass_org::LoadState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (strip, body) = with_filter_strip(area);
    render_strip(f, app, strip);

    let (list_area, detail_area) = two_column(body, 45);
    let jobs = &app.jobs;
    let visible = jobs.visible();
    match &jobs.jobs {
        LoadState::NotLoaded => placeholder(f, app, "Jobs", "Jobs not loaded yet.", list_area),
        LoadState::Loading { previous: None } => {
            placeholder(f, app, "Jobs", "Loading jobs...", list_area)
        }
        _ if visible.is_empty() => placeholder(f, app, "Jobs", "No jobs match.", list_area),
        _ => render_list(f, app, &visible, list_area),
    }

    match jobs.selected_job() {
        Some(job) => render_detail(f, app, job, detail_area),
        None => placeholder(f, app, "Job", "No job selected.", detail_area),
    }
}

fn render_strip(f: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(textarea) = &app.search {
        SearchBox {
            textarea,
            border_style: Style::default().fg(app.theme.border_focus),
        }
        .render(f, area);
        return;
    }
    let query = app.jobs.query.trim();
    let filters = [
        FilterOption {
            label: if query.is_empty() {
                "search: -".to_string()
            } else {
                format!("search: {}", query)
            },
            active: !query.is_empty(),
        },
        FilterOption {
            label: "active only".to_string(),
            active: app.jobs.active_only,
        },
    ];
    FilterBar {
        title: "Filter",
        filters: &filters,
        active_style: Style::default().fg(app.theme.accent),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, area);
}

fn render_list(f: &mut Frame<'_>, app: &App, jobs: &[&Job], area: Rect) {
    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let style = if job.is_active {
                Style::default().fg(app.theme.text)
            } else {
                Style::default().fg(app.theme.text_muted)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10} ", job.code), Style::default().fg(app.theme.primary)),
                Span::styled(job.title.clone(), style),
            ]))
        })
        .collect();

    let selected = app
        .jobs
        .selected
        .as_deref()
        .and_then(|code| jobs.iter().position(|job| job.code == code));
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("Jobs ({})", jobs.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(f: &mut Frame<'_>, app: &App, job: &Job, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    DetailPanel::new("Job", Style::default().fg(app.theme.primary))
        .field("Code", job.code.clone())
        .field("Title", job.title.clone())
        .optional("Division", job.division.as_deref())
        .optional("Department", job.department.as_deref())
        .optional("Location", job.location.as_deref())
        .optional("Grade", job.grade.as_deref())
        .field("Active", if job.is_active { "yes" } else { "no" })
        .render(f, chunks[0]);

    let mappings = match app.jobs.profiles.get(&job.code) {
        Some(DetailState::Loaded(mappings)) => mappings,
        Some(DetailState::Loading) => {
            placeholder(f, app, "Competency profile", "Loading...", chunks[1]);
            return;
        }
        Some(DetailState::Failed(_)) => {
            let message = "Failed to load. Press r to retry.";
            placeholder(f, app, "Competency profile", message, chunks[1]);
            return;
        }
        None => {
            placeholder(f, app, "Competency profile", "Not loaded.", chunks[1]);
            return;
        }
    };
    let dictionary = app
        .competencies
        .competencies
        .current()
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let profile = CompetencyProfile::for_job(&job.code, mappings, dictionary);
    if profile.is_empty() && profile.unresolved.is_empty() {
        placeholder(f, app, "Competency profile", "No competencies mapped.", chunks[1]);
        return;
    }

    let mut lines: Vec<Line> = profile
        .entries
        .iter()
        .map(|entry| {
            let marker = if entry.is_required { "*" } else { " " };
            Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(
                    format!("{:<13}", entry.required_level.to_string()),
                    Style::default().fg(proficiency_color(entry.required_level, &app.theme)),
                ),
                Span::raw(entry.competency.name.clone()),
            ])
        })
        .collect();
    if !profile.unresolved.is_empty() {
        let ids: Vec<String> = profile.unresolved.iter().map(|id| id.to_string()).collect();
        lines.push(Line::styled(
            format!("Unknown competency ids: {}", ids.join(", ")),
            Style::default().fg(app.theme.warning),
        ));
    }

    let required = profile.required().count();
    let mut panel = DetailPanel::new("Competency profile", Style::default().fg(app.theme.primary))
        .field(
            "Competencies",
            format!("{} ({} required)", profile.entries.len(), required),
        );
    panel.extra = lines;
    panel.render(f, chunks[1]);
}
