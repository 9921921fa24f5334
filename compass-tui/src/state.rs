//! Application state and view state definitions.

use crate::config::TuiConfig;
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::theme::CompassTheme;
use compass_core::{
    search_competencies, search_jobs, AssessorMapping, Competency, DirectoryError, Employee,
    EntityId, IndividualDevelopmentPlan, Job, JobCompetencyMapping, Sid,
};
use compass_org::{
    analyze_hierarchy, build_tree, divisions, render_walk, EmployeeFilter, ExpansionState,
    HierarchyReport, LoadOutcome, LoadState, LoadTicket, RenderRow, TeamLoader,
};
use std::collections::HashMap;
use tui_textarea::TextArea;

pub struct App {
    pub config: TuiConfig,
    pub theme: CompassTheme,
    pub active_view: View,

    pub org: OrgViewState,
    pub jobs: JobsViewState,
    pub competencies: CompetencyViewState,

    pub notifications: Vec<Notification>,
    /// Open search box; `None` in normal mode.
    pub search: Option<TextArea<'static>>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        let root = config.root_sid.clone();
        Self {
            config,
            theme: CompassTheme::compass(),
            active_view: View::OrgChart,
            org: OrgViewState::new(root),
            jobs: JobsViewState::new(),
            competencies: CompetencyViewState::new(),
            notifications: Vec::new(),
            search: None,
        }
    }

    /// Restore saved UI state. Expansion and filter only carry over when they
    /// were saved for the configured root.
    pub fn restore(&mut self, persisted: PersistedState) {
        self.active_view = persisted.active_view;
        if persisted.root_sid != self.config.root_sid {
            tracing::info!(
                saved_root = %persisted.root_sid,
                root = %self.config.root_sid,
                "Saved state belongs to another root; ignoring expansion"
            );
            return;
        }
        self.org.expansion = persisted.expanded;
        self.org.filter = EmployeeFilter {
            search: persisted.filter_search,
            division: persisted.filter_division,
        };
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            root_sid: self.org.root.clone(),
            expanded: self.org.expansion.clone(),
            filter_search: self.org.filter.search.clone(),
            filter_division: self.org.filter.division.clone(),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    // ---------------------------------------------------------------------
    // Org chart loading
    // ---------------------------------------------------------------------

    /// Start a team fetch for the current root. The caller runs the fetch and
    /// hands the result to [`App::apply_team`] with the returned ticket.
    pub fn begin_team_load(&mut self) -> LoadTicket {
        let ticket = self.org.loader.begin(self.org.root.clone());
        self.org.rebuild();
        ticket
    }

    /// Reload the team and forget fetched plans, failed ones included.
    pub fn refresh_org(&mut self) -> LoadTicket {
        self.org.idps.clear();
        self.begin_team_load()
    }

    pub fn apply_team(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Employee>, DirectoryError>,
    ) -> LoadOutcome<DirectoryError> {
        let outcome = self.org.loader.complete(ticket, result);
        match &outcome {
            LoadOutcome::Applied => {
                self.org.committed_stack = self.org.drill_stack.clone();
                if let Some(team) = self.org.loader.current() {
                    // Prune against the unfiltered tree so a narrow search
                    // does not forget what was open.
                    let full = build_tree(team, ticket.root());
                    self.org.expansion.retain_present(&full);
                    self.org.divisions = divisions(team);
                }
                self.org.rebuild();
                if let Some(sid) = self.org.pending_selection.take() {
                    self.org.reveal(&sid);
                }
                self.report_hierarchy_problems();
            }
            LoadOutcome::Failed(err) => {
                self.org.root = self
                    .org
                    .loader
                    .loaded_root()
                    .cloned()
                    .unwrap_or_else(|| self.config.root_sid.clone());
                self.org.drill_stack = self.org.committed_stack.clone();
                self.org.rebuild();
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load team of {}: {}", ticket.root(), err),
                );
            }
            LoadOutcome::Stale => {}
        }
        outcome
    }

    fn report_hierarchy_problems(&mut self) {
        let Some(report) = &self.org.report else {
            return;
        };
        let message = if let Some(cycle) = report.cycles.first() {
            let chain: Vec<&str> = cycle.iter().map(Sid::as_str).collect();
            Some((
                NotificationLevel::Warning,
                format!(
                    "Manager cycle hidden: {} ({} cycle(s) total)",
                    chain.join(" -> "),
                    report.cycles.len()
                ),
            ))
        } else if let Some(chain) = &report.root_cycle {
            let chain: Vec<&str> = chain.iter().map(Sid::as_str).collect();
            Some((
                NotificationLevel::Warning,
                format!(
                    "{} reports into their own team: {} -> {}",
                    chain[0],
                    chain.join(" -> "),
                    chain[0]
                ),
            ))
        } else if !report.unassigned.is_empty() {
            Some((
                NotificationLevel::Info,
                format!(
                    "{} employee(s) have a manager outside this team",
                    report.unassigned.len()
                ),
            ))
        } else {
            None
        };
        if let Some((level, message)) = message {
            self.notify(level, message);
        }
    }

    // ---------------------------------------------------------------------
    // Org chart interaction
    // ---------------------------------------------------------------------

    pub fn toggle_expand(&mut self) {
        if self.active_view != View::OrgChart {
            return;
        }
        let Some(row) = self.org.selected_row() else {
            return;
        };
        if !row.has_children {
            return;
        }
        let sid = row.sid.clone();
        self.org.expansion.toggle(&sid);
        self.org.refresh_rows();
    }

    pub fn expand_all(&mut self) {
        if let Some(report) = &self.org.report {
            self.org.expansion.expand_all(&report.forest);
            self.org.refresh_rows();
        }
    }

    pub fn collapse_all(&mut self) {
        self.org.expansion.collapse_all();
        self.org.refresh_rows();
    }

    /// Step the division filter through `None -> first -> ... -> last -> None`.
    pub fn cycle_division(&mut self) {
        let next = match &self.org.filter.division {
            None => self.org.divisions.first().cloned(),
            Some(current) => self
                .org
                .divisions
                .iter()
                .position(|d| d == current)
                .and_then(|i| self.org.divisions.get(i + 1))
                .cloned(),
        };
        self.org.filter.division = next;
        self.org.rebuild();
    }

    /// Make the selected employee the root. Returns the ticket to fetch.
    pub fn drill_down(&mut self) -> Option<LoadTicket> {
        let target = self.org.selected.clone()?;
        if target == self.org.root {
            return None;
        }
        let previous = std::mem::replace(&mut self.org.root, target);
        self.org.drill_stack.push(previous);
        self.org.selected = None;
        Some(self.begin_team_load())
    }

    /// Return to the previous root, if any.
    pub fn drill_up(&mut self) -> Option<LoadTicket> {
        let parent = self.org.drill_stack.pop()?;
        let child = std::mem::replace(&mut self.org.root, parent);
        self.org.pending_selection = Some(child);
        Some(self.begin_team_load())
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        let sid = self.org.selected.as_ref()?;
        let report = self.org.report.as_ref()?;
        report.forest.find(sid.as_str()).map(|node| &node.employee)
    }

    /// Mark the selected employee's plans as loading. Returns the sid to
    /// fetch, or `None` when they are already loaded or in flight.
    pub fn begin_idp_load(&mut self) -> Option<Sid> {
        let sid = self.org.selected.clone()?;
        if self.org.idps.contains_key(&sid) {
            return None;
        }
        self.org.idps.insert(sid.clone(), DetailState::Loading);
        Some(sid)
    }

    pub fn apply_idps(
        &mut self,
        sid: Sid,
        result: Result<Vec<IndividualDevelopmentPlan>, DirectoryError>,
    ) {
        match result {
            Ok(plans) => {
                self.org.idps.insert(sid, DetailState::Loaded(plans));
            }
            Err(err) => {
                tracing::warn!(sid = %sid, error = %err, "Development plan load failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load development plans of {}: {}", sid, err),
                );
                self.org.idps.insert(sid, DetailState::Failed(err.to_string()));
            }
        }
    }

    // ---------------------------------------------------------------------
    // Catalog views
    // ---------------------------------------------------------------------

    pub fn begin_jobs_load(&mut self) {
        mark_loading(&mut self.jobs.jobs);
        self.jobs.profiles.clear();
    }

    pub fn begin_competencies_load(&mut self) {
        mark_loading(&mut self.competencies.competencies);
        mark_loading(&mut self.competencies.assessors);
    }

    pub fn apply_jobs(&mut self, result: Result<Vec<Job>, DirectoryError>) {
        match result {
            Ok(jobs) => {
                tracing::info!(count = jobs.len(), "Jobs loaded");
                self.jobs.jobs = LoadState::Loaded(jobs);
            }
            Err(err) => {
                keep_previous(&mut self.jobs.jobs);
                self.notify(NotificationLevel::Error, format!("Failed to load jobs: {}", err));
            }
        }
    }

    pub fn apply_competencies(&mut self, result: Result<Vec<Competency>, DirectoryError>) {
        match result {
            Ok(competencies) => {
                tracing::info!(count = competencies.len(), "Competencies loaded");
                self.competencies.competencies = LoadState::Loaded(competencies);
            }
            Err(err) => {
                keep_previous(&mut self.competencies.competencies);
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load competencies: {}", err),
                );
            }
        }
    }

    pub fn apply_assessors(&mut self, result: Result<Vec<AssessorMapping>, DirectoryError>) {
        match result {
            Ok(assessors) => {
                let duplicates = compass_core::duplicate_assessor_pairs(&assessors);
                if !duplicates.is_empty() {
                    tracing::warn!(count = duplicates.len(), "Duplicate assessor mappings");
                }
                self.competencies.assessors = LoadState::Loaded(assessors);
            }
            Err(err) => {
                keep_previous(&mut self.competencies.assessors);
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load assessors: {}", err),
                );
            }
        }
    }

    /// Mark the selected job's profile as loading. Returns the code to fetch.
    pub fn begin_profile_load(&mut self) -> Option<String> {
        let code = self.jobs.selected.clone()?;
        if self.jobs.profiles.contains_key(&code) {
            return None;
        }
        self.jobs.profiles.insert(code.clone(), DetailState::Loading);
        Some(code)
    }

    pub fn apply_profile(
        &mut self,
        job_code: String,
        result: Result<Vec<JobCompetencyMapping>, DirectoryError>,
    ) {
        match result {
            Ok(mappings) => {
                self.jobs.profiles.insert(job_code, DetailState::Loaded(mappings));
            }
            Err(err) => {
                tracing::warn!(job = %job_code, error = %err, "Competency profile load failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load profile of {}: {}", job_code, err),
                );
                self.jobs
                    .profiles
                    .insert(job_code, DetailState::Failed(err.to_string()));
            }
        }
    }

    // ---------------------------------------------------------------------
    // Selection and search
    // ---------------------------------------------------------------------

    pub fn select_next(&mut self) {
        match self.active_view {
            View::OrgChart => {
                let keys = self.org.row_keys();
                select_next_key(&keys, &mut self.org.selected);
            }
            View::Jobs => {
                let keys = self.jobs.visible_keys();
                select_next_key(&keys, &mut self.jobs.selected);
            }
            View::Competencies => {
                let keys = self.competencies.visible_keys();
                select_next_key(&keys, &mut self.competencies.selected);
            }
        }
    }

    pub fn select_previous(&mut self) {
        match self.active_view {
            View::OrgChart => {
                let keys = self.org.row_keys();
                select_prev_key(&keys, &mut self.org.selected);
            }
            View::Jobs => {
                let keys = self.jobs.visible_keys();
                select_prev_key(&keys, &mut self.jobs.selected);
            }
            View::Competencies => {
                let keys = self.competencies.visible_keys();
                select_prev_key(&keys, &mut self.competencies.selected);
            }
        }
    }

    /// Open the search box prefilled with the active view's query.
    pub fn open_search(&mut self) {
        let current = match self.active_view {
            View::OrgChart => self.org.filter.search.clone(),
            View::Jobs => self.jobs.query.clone(),
            View::Competencies => self.competencies.query.clone(),
        };
        let mut textarea = TextArea::new(vec![current]);
        textarea.move_cursor(tui_textarea::CursorMove::End);
        self.search = Some(textarea);
    }

    pub fn apply_search(&mut self) {
        let Some(textarea) = self.search.take() else {
            return;
        };
        let query = textarea.lines().join(" ").trim().to_string();
        match self.active_view {
            View::OrgChart => {
                self.org.filter.search = query;
                self.org.rebuild();
            }
            View::Jobs => {
                self.jobs.query = query;
                self.jobs.selected = None;
            }
            View::Competencies => {
                self.competencies.query = query;
                self.competencies.selected = None;
            }
        }
    }

    pub fn cancel_search(&mut self) {
        self.search = None;
    }
}

pub struct OrgViewState {
    /// Manager whose team is shown (or being fetched).
    pub root: Sid,
    /// Roots left behind by drilling down.
    pub drill_stack: Vec<Sid>,
    /// `drill_stack` as of the last applied load; restored on failure.
    committed_stack: Vec<Sid>,
    /// Selected once the pending load lands (the child we drilled up from).
    pending_selection: Option<Sid>,
    pub loader: TeamLoader<Vec<Employee>>,
    pub filter: EmployeeFilter,
    pub expansion: ExpansionState,
    /// Analysis of the filtered team; `None` until the first load lands.
    pub report: Option<HierarchyReport>,
    pub rows: Vec<RenderRow>,
    pub selected: Option<Sid>,
    /// Divisions present in the unfiltered team, first-seen order.
    pub divisions: Vec<String>,
    pub idps: HashMap<Sid, DetailState<Vec<IndividualDevelopmentPlan>>>,
}

impl OrgViewState {
    pub fn new(root: Sid) -> Self {
        Self {
            root,
            drill_stack: Vec::new(),
            committed_stack: Vec::new(),
            pending_selection: None,
            loader: TeamLoader::new(),
            filter: EmployeeFilter::new(),
            expansion: ExpansionState::new(),
            report: None,
            rows: Vec::new(),
            selected: None,
            divisions: Vec::new(),
            idps: HashMap::new(),
        }
    }

    /// Re-filter and re-analyze the current team, then re-walk.
    pub fn rebuild(&mut self) {
        let report = match (self.loader.current(), self.loader.loaded_root()) {
            (Some(team), Some(root)) => {
                let filtered = self.filter.apply(team);
                Some(analyze_hierarchy(&filtered, root))
            }
            _ => None,
        };
        self.report = report;
        self.refresh_rows();
    }

    /// Re-walk the current forest after an expansion change.
    pub fn refresh_rows(&mut self) {
        self.rows = match &self.report {
            Some(report) => render_walk(&report.forest, &self.expansion),
            None => Vec::new(),
        };
        let still_visible = self
            .selected
            .as_ref()
            .is_some_and(|sid| self.rows.iter().any(|row| &row.sid == sid));
        if !still_visible {
            self.selected = self.rows.first().map(|row| row.sid.clone());
        }
        tracing::debug!(rows = self.rows.len(), "Org chart rows rebuilt");
    }

    /// Expand the path down to `sid` and select it, if it is in the forest.
    pub fn reveal(&mut self, sid: &Sid) {
        let Some(report) = &self.report else {
            return;
        };
        if self.expansion.expand_path(&report.forest, sid.as_str()) {
            self.selected = Some(sid.clone());
            self.refresh_rows();
        }
    }

    fn row_keys(&self) -> Vec<Sid> {
        self.rows.iter().map(|row| row.sid.clone()).collect()
    }

    pub fn selected_row(&self) -> Option<&RenderRow> {
        let sid = self.selected.as_ref()?;
        self.rows.iter().find(|row| &row.sid == sid)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.state().is_loading()
    }

    /// Message shown instead of the tree, or `None` when there are rows.
    /// Keeps "not loaded", "loading" and "empty" apart.
    pub fn placeholder(&self) -> Option<String> {
        if !self.rows.is_empty() {
            return None;
        }
        let Some(team) = self.loader.current() else {
            return Some(if self.is_loading() {
                format!("Loading team of {}...", self.root)
            } else {
                "Team not loaded yet. Press r to load.".to_string()
            });
        };
        let root = self.loader.loaded_root().unwrap_or(&self.root);
        Some(if team.is_empty() {
            format!("No employees under {}.", root)
        } else if self.filter.is_active() {
            "No employees match the current filter.".to_string()
        } else {
            format!("No one reports directly to {}.", root)
        })
    }
}

pub struct JobsViewState {
    pub jobs: LoadState<Vec<Job>>,
    pub query: String,
    pub active_only: bool,
    pub selected: Option<String>,
    /// Competency mappings per job code.
    pub profiles: HashMap<String, DetailState<Vec<JobCompetencyMapping>>>,
}

impl JobsViewState {
    pub fn new() -> Self {
        Self {
            jobs: LoadState::NotLoaded,
            query: String::new(),
            active_only: true,
            selected: None,
            profiles: HashMap::new(),
        }
    }

    pub fn visible(&self) -> Vec<&Job> {
        match self.jobs.current() {
            Some(jobs) => search_jobs(jobs, &self.query, self.active_only),
            None => Vec::new(),
        }
    }

    fn visible_keys(&self) -> Vec<String> {
        self.visible().into_iter().map(|job| job.code.clone()).collect()
    }

    pub fn selected_job(&self) -> Option<&Job> {
        let code = self.selected.as_deref()?;
        self.jobs.current()?.iter().find(|job| job.code == code)
    }
}

impl Default for JobsViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CompetencyViewState {
    pub competencies: LoadState<Vec<Competency>>,
    pub assessors: LoadState<Vec<AssessorMapping>>,
    pub query: String,
    pub selected: Option<EntityId>,
}

impl CompetencyViewState {
    pub fn new() -> Self {
        Self {
            competencies: LoadState::NotLoaded,
            assessors: LoadState::NotLoaded,
            query: String::new(),
            selected: None,
        }
    }

    pub fn visible(&self) -> Vec<&Competency> {
        match self.competencies.current() {
            Some(all) => search_competencies(all, &self.query, None),
            None => Vec::new(),
        }
    }

    fn visible_keys(&self) -> Vec<EntityId> {
        self.visible().into_iter().map(|c| c.id).collect()
    }

    pub fn selected_competency(&self) -> Option<&Competency> {
        let id = self.selected?;
        self.competencies.current()?.iter().find(|c| c.id == id)
    }
}

impl Default for CompetencyViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Detail fetched once per selected item. A failure sticks until the view
/// is refreshed, so moving the cursor never re-fires a failing request.
#[derive(Debug, Clone)]
pub enum DetailState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> DetailState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DetailState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DetailState::Failed(_))
    }
}

fn mark_loading<T>(state: &mut LoadState<T>) {
    let previous = std::mem::take(state).into_current();
    *state = LoadState::Loading { previous };
}

/// After a failed fetch, fall back to whatever was shown before it.
fn keep_previous<T>(state: &mut LoadState<T>) {
    *state = match std::mem::take(state).into_current() {
        Some(previous) => LoadState::Loaded(previous),
        None => LoadState::NotLoaded,
    };
}

fn select_next_key<K: PartialEq + Clone>(keys: &[K], selected: &mut Option<K>) {
    if keys.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .as_ref()
        .and_then(|key| keys.iter().position(|k| k == key));
    let next = match index {
        Some(i) => (i + 1) % keys.len(),
        None => 0,
    };
    *selected = Some(keys[next].clone());
}

fn select_prev_key<K: PartialEq + Clone>(keys: &[K], selected: &mut Option<K>) {
    if keys.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .as_ref()
        .and_then(|key| keys.iter().position(|k| k == key))
        .unwrap_or(0);
    let prev = if index == 0 { keys.len() - 1 } else { index - 1 };
    *selected = Some(keys[prev].clone());
}
