//! Org chart view: tree on the left, employee detail and plans on the right.

use crate::state::{App, DetailState};
use crate::theme::{employment_status_color, idp_priority_color, idp_status_color, progress_color};
use crate::views::{placeholder, two_column, with_filter_strip};
use crate::widgets::{
    DetailPanel, FilterBar, FilterOption, ProgressBar, SearchBox, TreeStyle, TreeWidget,
};
use chrono::Utc;
use compass_core::{Employee, EntityId, IdpSummary};
use compass_org::RenderRow;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (strip, body) = with_filter_strip(area);
    render_filter_strip(f, app, strip);

    let (tree_area, detail_area) = two_column(body, 60);
    let title = tree_title(app);
    match app.org.placeholder() {
        Some(message) => placeholder(f, app, &title, &message, tree_area),
        None => {
            let selected = app
                .org
                .selected
                .as_ref()
                .and_then(|sid| app.org.rows.iter().position(|row| &row.sid == sid));
            let theme = &app.theme;
            let tree = TreeWidget {
                title: &title,
                rows: &app.org.rows,
                selected,
                style: TreeStyle::new(
                    Style::default().fg(theme.border),
                    Style::default().fg(theme.primary),
                    Style::default().bg(theme.bg_highlight),
                ),
                label_color: |row: &RenderRow| employment_status_color(row.status, theme),
            };
            tree.render(f, tree_area);
        }
    }

    render_detail(f, app, detail_area);
}

fn tree_title(app: &App) -> String {
    let mut title = format!("Team of {}", app.org.root);
    if let Some(report) = &app.org.report {
        title.push_str(&format!(" ({})", report.forest.len()));
        if !report.cycles.is_empty() {
            title.push_str(&format!(" [{} cycle(s) hidden]", report.cycles.len()));
        }
    }
    if app.org.is_loading() {
        title.push_str(" loading...");
    }
    title
}

fn render_filter_strip(f: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(textarea) = &app.search {
        SearchBox {
            textarea,
            border_style: Style::default().fg(app.theme.border_focus),
        }
        .render(f, area);
        return;
    }

    let search = &app.org.filter.search;
    let mut filters = vec![FilterOption {
        label: if search.trim().is_empty() {
            "search: -".to_string()
        } else {
            format!("search: {}", search.trim())
        },
        active: !search.trim().is_empty(),
    }];
    filters.push(FilterOption {
        label: "All divisions".to_string(),
        active: app.org.filter.division.is_none(),
    });
    filters.extend(app.org.divisions.iter().map(|division| FilterOption {
        label: division.clone(),
        active: app.org.filter.division.as_deref() == Some(division.as_str()),
    }));
    FilterBar {
        title: "Filter",
        filters: &filters,
        active_style: Style::default().fg(app.theme.accent),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, area);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(area);

    let Some(employee) = app.selected_employee() else {
        placeholder(f, app, "Employee", "No employee selected.", chunks[0]);
        return;
    };
    employee_panel(app, employee).render(f, chunks[0]);
    render_plans(f, app, employee, chunks[1], chunks[2]);
}

fn employee_panel<'a>(app: &App, employee: &'a Employee) -> DetailPanel<'a> {
    let manager = employee
        .line_manager_sid
        .as_ref()
        .map(|sid| sid.to_string())
        .unwrap_or_else(|| "-".to_string());
    let reports = app
        .org
        .report
        .as_ref()
        .and_then(|report| report.forest.find(employee.sid.as_str()))
        .map(|node| node.descendant_count())
        .unwrap_or(0);
    DetailPanel::new("Employee", Style::default().fg(app.theme.primary))
        .field("Name", employee.full_name())
        .field("SID", employee.sid.to_string())
        .optional("Email", Some(employee.email.as_str()))
        .field("Title", employee.job_title.clone())
        .optional("Job code", employee.job_code.as_deref())
        .optional("Division", employee.division.as_deref())
        .optional("Department", employee.department.as_deref())
        .optional("Location", employee.location.as_deref())
        .optional("Grade", employee.grade.as_deref())
        .field("Status", employee.employment_status.to_string())
        .field("Manager", manager)
        .field("Reports (all levels)", reports.to_string())
}

fn render_plans(
    f: &mut Frame<'_>,
    app: &App,
    employee: &Employee,
    list_area: Rect,
    gauge_area: Rect,
) {
    let plans = match app.org.idps.get(&employee.sid) {
        Some(DetailState::Loaded(plans)) => plans,
        Some(DetailState::Loading) => {
            placeholder(f, app, "Development plans", "Loading...", list_area);
            return;
        }
        Some(DetailState::Failed(_)) => {
            let message = "Failed to load. Press r to retry.";
            placeholder(f, app, "Development plans", message, list_area);
            return;
        }
        None => {
            placeholder(f, app, "Development plans", "Not loaded.", list_area);
            return;
        }
    };
    if plans.is_empty() {
        placeholder(f, app, "Development plans", "No development plans.", list_area);
        return;
    }

    let today = Utc::now().date_naive();
    let theme = &app.theme;
    let competency_name = |id: EntityId| {
        app.competencies
            .competencies
            .current()
            .and_then(|all| all.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("competency #{}", id))
    };
    let extra: Vec<Line> = plans
        .iter()
        .map(|plan| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<12}", plan.status.to_string()),
                    Style::default().fg(idp_status_color(plan.status, theme)),
                ),
                Span::styled(
                    format!("{:<9}", plan.priority.to_string()),
                    Style::default().fg(idp_priority_color(plan.priority, theme)),
                ),
                Span::raw(format!("{:>3}% ", plan.progress_percentage.min(100))),
                Span::raw(competency_name(plan.competency_id)),
            ];
            if plan.is_overdue(today) {
                spans.push(Span::styled(" overdue", Style::default().fg(theme.error)));
            }
            Line::from(spans)
        })
        .collect();

    let summary = IdpSummary::from_plans(plans);
    let mut panel = DetailPanel::new("Development plans", Style::default().fg(theme.primary))
        .field(
            "Plans",
            format!(
                "{} planned, {} in progress, {} completed",
                summary.planned, summary.in_progress, summary.completed
            ),
        );
    panel.extra = extra;
    panel.render(f, list_area);

    ProgressBar {
        title: "Mean progress".to_string(),
        percent: summary.mean_progress,
        style: Style::default().fg(progress_color(summary.mean_progress, theme)),
    }
    .render(f, gauge_area);
}
