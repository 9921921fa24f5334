//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    /// Extra lines rendered below the fields (lists, tables).
    pub extra: Vec<Line<'a>>,
    pub label_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn new(title: &'a str, label_style: Style) -> Self {
        Self {
            title,
            fields: Vec::new(),
            extra: Vec::new(),
            label_style,
        }
    }

    pub fn field(mut self, label: &'a str, value: impl Into<String>) -> Self {
        self.fields.push((label, value.into()));
        self
    }

    /// Add a field only when `value` is present.
    pub fn optional(self, label: &'a str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.field(label, v),
            _ => self,
        }
    }

    pub fn render(self, f: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = self
            .fields
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), self.label_style),
                    Span::raw(value),
                ])
            })
            .collect();
        if !self.extra.is_empty() {
            lines.push(Line::raw(""));
            lines.extend(self.extra);
        }

        let widget = Paragraph::new(Text::from(lines))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
