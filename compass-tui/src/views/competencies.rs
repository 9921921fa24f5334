//! Competency dictionary view with level descriptors and assessors.

use crate::state::App;
use crate::theme::proficiency_color;
use crate::views::{placeholder, two_column, with_filter_strip};
use crate::widgets::{DetailPanel, FilterBar, FilterOption, SearchBox};
use compass_core::{assessors_for, Competency, ProficiencyLevel};
use compass_org::LoadState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (strip, body) = with_filter_strip(area);
    render_strip(f, app, strip);

    let (list_area, detail_area) = two_column(body, 40);
    let view = &app.competencies;
    let visible = view.visible();
    match &view.competencies {
        LoadState::NotLoaded => placeholder(
            f,
            app,
            "Competencies",
            "Competencies not loaded yet.",
            list_area,
        ),
        LoadState::Loading { previous: None } => {
            placeholder(f, app, "Competencies", "Loading competencies...", list_area)
        }
        _ if visible.is_empty() => {
            placeholder(f, app, "Competencies", "No competencies match.", list_area)
        }
        _ => render_list(f, app, &visible, list_area),
    }

    match view.selected_competency() {
        Some(competency) => render_detail(f, app, competency, detail_area),
        None => placeholder(f, app, "Competency", "No competency selected.", detail_area),
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
    let query = app.competencies.query.trim();
    let filters = [FilterOption {
        label: if query.is_empty() {
            "search: -".to_string()
        } else {
            format!("search: {}", query)
        },
        active: !query.is_empty(),
    }];
    FilterBar {
        title: "Filter",
        filters: &filters,
        active_style: Style::default().fg(app.theme.accent),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, area);
}

fn render_list(f: &mut Frame<'_>, app: &App, competencies: &[&Competency], area: Rect) {
    let items: Vec<ListItem> = competencies
        .iter()
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14} ", c.competency_type.to_string()),
                    Style::default().fg(app.theme.text_dim),
                ),
                Span::styled(c.name.clone(), Style::default().fg(app.theme.text)),
            ]))
        })
        .collect();
    let selected = app
        .competencies
        .selected
        .and_then(|id| competencies.iter().position(|c| c.id == id));
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("Competencies ({})", competencies.len()))
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

fn render_detail(f: &mut Frame<'_>, app: &App, competency: &Competency, area: Rect) {
    let mut lines = Vec::new();
    for level in competency.sorted_levels() {
        lines.push(Line::from(Span::styled(
            format!("{} ({})", level.level, level.level.rank()),
            Style::default()
                .fg(proficiency_color(level.level, &app.theme))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::raw(level.description.clone()));
        for indicator in &level.indicators {
            lines.push(Line::raw(format!("  - {}", indicator)));
        }
    }

    if let Some(mappings) = app.competencies.assessors.current() {
        let assessors = assessors_for(mappings, competency.id, ProficiencyLevel::Basic);
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Assessors ({})", assessors.len()),
            Style::default().fg(app.theme.primary),
        ));
        for mapping in assessors {
            lines.push(Line::raw(format!(
                "  {} at {}",
                mapping.assessor_sid, mapping.competency_level
            )));
        }
    }

    let mut panel = DetailPanel::new("Competency", Style::default().fg(app.theme.primary))
        .field("Name", competency.name.clone())
        .field("Type", competency.competency_type.to_string())
        .optional("Family", competency.family.as_deref())
        .optional("Definition", competency.definition.as_deref());
    panel.extra = lines;
    panel.render(f, area);
}
