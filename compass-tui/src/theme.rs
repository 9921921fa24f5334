//! Compass palette and status colors.

use compass_core::{EmploymentStatus, IdpPriority, IdpStatus, ProficiencyLevel};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct CompassTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl CompassTheme {
    pub fn compass() -> Self {
        Self {
            bg: Color::Rgb(12, 16, 24),
            bg_highlight: Color::Rgb(36, 44, 60),
            primary: Color::Rgb(94, 176, 239),
            primary_dim: Color::Rgb(52, 98, 133),
            accent: Color::Rgb(240, 180, 80),
            success: Color::Rgb(110, 200, 120),
            warning: Color::Rgb(240, 200, 80),
            error: Color::Rgb(230, 80, 80),
            info: Color::Rgb(94, 176, 239),
            text: Color::Rgb(230, 232, 236),
            text_dim: Color::Rgb(140, 146, 158),
            text_muted: Color::Rgb(80, 86, 98),
            border: Color::Rgb(64, 72, 88),
            border_focus: Color::Rgb(94, 176, 239),
        }
    }
}

impl Default for CompassTheme {
    fn default() -> Self {
        Self::compass()
    }
}

pub fn employment_status_color(status: EmploymentStatus, theme: &CompassTheme) -> Color {
    match status {
        EmploymentStatus::Active => theme.text,
        EmploymentStatus::OnLeave => theme.warning,
        EmploymentStatus::Suspended => theme.error,
        EmploymentStatus::Inactive | EmploymentStatus::Terminated => theme.text_muted,
    }
}

pub fn idp_status_color(status: IdpStatus, theme: &CompassTheme) -> Color {
    match status {
        IdpStatus::Planned => theme.text_dim,
        IdpStatus::InProgress => theme.primary,
        IdpStatus::Completed => theme.success,
    }
}

pub fn idp_priority_color(priority: IdpPriority, theme: &CompassTheme) -> Color {
    match priority {
        IdpPriority::Low => theme.text_dim,
        IdpPriority::Medium => theme.text,
        IdpPriority::High => theme.warning,
        IdpPriority::Critical => theme.error,
    }
}

pub fn proficiency_color(level: ProficiencyLevel, theme: &CompassTheme) -> Color {
    match level {
        ProficiencyLevel::Basic => theme.text_dim,
        ProficiencyLevel::Intermediate => theme.text,
        ProficiencyLevel::Advanced => theme.primary,
        ProficiencyLevel::Mastery => theme.accent,
    }
}

/// Development progress: low is a warning, done is a success.
pub fn progress_color(percent: f32, theme: &CompassTheme) -> Color {
    if percent >= 100.0 {
        theme.success
    } else if percent >= 40.0 {
        theme.primary
    } else {
        theme.warning
    }
}
