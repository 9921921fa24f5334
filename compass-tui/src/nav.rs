//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    OrgChart,
    Jobs,
    Competencies,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::OrgChart => "Org Chart",
            View::Jobs => "Jobs",
            View::Competencies => "Competencies",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::OrgChart, View::Jobs, View::Competencies]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
