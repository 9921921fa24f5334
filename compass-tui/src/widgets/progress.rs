//! Progress gauge for development plans.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct ProgressBar {
    pub title: String,
    /// Percent complete; clamped to 0..=100.
    pub percent: f32,
    pub style: Style,
}

impl ProgressBar {
    pub fn ratio(&self) -> f64 {
        f64::from(self.percent.clamp(0.0, 100.0)) / 100.0
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(self.style)
            .label(format!("{:.0}%", self.percent.clamp(0.0, 100.0)))
            .ratio(self.ratio());
        f.render_widget(gauge, area);
    }
}
