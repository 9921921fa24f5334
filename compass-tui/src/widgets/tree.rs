//! Org chart tree widget.

use compass_org::RenderRow;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TreeStyle {
    pub connector: Style,
    pub indicator: Style,
    pub selected: Style,
}

impl TreeStyle {
    pub fn new(connector: Style, indicator: Style, selected: Style) -> Self {
        Self {
            connector,
            indicator,
            selected,
        }
    }
}

/// Renders rows produced by `render_walk`. Connector glyphs come from
/// [`RenderRow::prefix`]; label color comes from `label_color`.
pub struct TreeWidget<'a, F>
where
    F: Fn(&RenderRow) -> Color,
{
    pub title: &'a str,
    pub rows: &'a [RenderRow],
    pub selected: Option<usize>,
    pub style: TreeStyle,
    pub label_color: F,
}

impl<'a, F> TreeWidget<'a, F>
where
    F: Fn(&RenderRow) -> Color,
{
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| {
                ListItem::new(Line::from(vec![
                    Span::styled(row.prefix(), self.style.connector),
                    Span::styled(row.indicator.glyph(), self.style.indicator),
                    Span::styled(
                        row.label.clone(),
                        Style::default().fg((self.label_color)(row)),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .highlight_style(self.style.selected.add_modifier(Modifier::BOLD));

        let mut state = ListState::default();
        state.select(self.selected);
        f.render_stateful_widget(list, area, &mut state);
    }
}
