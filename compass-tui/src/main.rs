//! COMPASS TUI entry point.

use compass_org::{EmployeeDirectory, LoadTicket};
use compass_tui::api_client::RestClient;
use compass_tui::config::TuiConfig;
use compass_tui::error::TuiError;
use compass_tui::events::TuiEvent;
use compass_tui::keys::{map_key, map_search_key, Action, SearchKey};
use compass_tui::logging;
use compass_tui::nav::View;
use compass_tui::persistence;
use compass_tui::state::App;
use compass_tui::views::render_view;
use compass_core::DirectoryError;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config)?;
    let api = RestClient::new(&config)?;
    let mut app = App::new(config);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable saved state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let ticket = app.begin_team_load();
    spawn_team_load(&api, ticket, &event_tx);
    app.begin_jobs_load();
    spawn_jobs_load(&api, &event_tx);
    app.begin_competencies_load();
    spawn_competencies_load(&api, &event_tx);

    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, &api, &event_tx, event) {
                    break;
                }
                spawn_selection_loads(&mut app, &api, &event_tx);
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.to_persisted()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("Shutting down");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    api: &RestClient,
    tx: &mpsc::Sender<TuiEvent>,
    event: TuiEvent,
) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(textarea) = app.search.as_mut() {
                match map_search_key(key) {
                    SearchKey::Apply => app.apply_search(),
                    SearchKey::Cancel => app.cancel_search(),
                    SearchKey::Edit => {
                        textarea.input(key);
                    }
                }
                return false;
            }
            if let Some(action) = map_key(key) {
                return handle_action(app, api, tx, action);
            }
        }
        TuiEvent::TeamLoaded { ticket, result } => {
            let outcome = app.apply_team(&ticket, result);
            tracing::debug!(ticket = %ticket, ?outcome, "Team response handled");
        }
        TuiEvent::IdpsLoaded { sid, result } => app.apply_idps(sid, result),
        TuiEvent::JobsLoaded(result) => app.apply_jobs(result),
        TuiEvent::CompetenciesLoaded(result) => app.apply_competencies(result),
        TuiEvent::AssessorsLoaded(result) => app.apply_assessors(result),
        TuiEvent::ProfileLoaded { job_code, result } => app.apply_profile(job_code, result),
        // The next draw picks up the new size.
        TuiEvent::Resize { .. } => {}
    }
    false
}

fn handle_action(
    app: &mut App,
    api: &RestClient,
    tx: &mpsc::Sender<TuiEvent>,
    action: Action,
) -> bool {
    match action {
        Action::Quit => return true,
        Action::NextView => app.active_view = app.active_view.next(),
        Action::PrevView => app.active_view = app.active_view.previous(),
        Action::SwitchView(index) => {
            if let Some(view) = View::from_index(index) {
                app.active_view = view;
            }
        }
        Action::MoveDown => app.select_next(),
        Action::MoveUp => app.select_previous(),
        Action::OpenSearch => app.open_search(),
        Action::Cancel => app.cancel_search(),
        Action::Refresh => refresh_view(app, api, tx),
        Action::ToggleExpand => app.toggle_expand(),
        Action::ExpandAll if app.active_view == View::OrgChart => app.expand_all(),
        Action::CollapseAll if app.active_view == View::OrgChart => app.collapse_all(),
        Action::CycleDivision if app.active_view == View::OrgChart => app.cycle_division(),
        Action::DrillDown if app.active_view == View::OrgChart => {
            if let Some(ticket) = app.drill_down() {
                spawn_team_load(api, ticket, tx);
            }
        }
        Action::DrillUp if app.active_view == View::OrgChart => {
            if let Some(ticket) = app.drill_up() {
                spawn_team_load(api, ticket, tx);
            }
        }
        Action::ExpandAll
        | Action::CollapseAll
        | Action::CycleDivision
        | Action::DrillDown
        | Action::DrillUp => {}
    }
    false
}

fn refresh_view(app: &mut App, api: &RestClient, tx: &mpsc::Sender<TuiEvent>) {
    match app.active_view {
        View::OrgChart => {
            let ticket = app.refresh_org();
            spawn_team_load(api, ticket, tx);
        }
        View::Jobs => {
            app.begin_jobs_load();
            spawn_jobs_load(api, tx);
        }
        View::Competencies => {
            app.begin_competencies_load();
            spawn_competencies_load(api, tx);
        }
    }
}

/// Fetch details for whatever is selected, if not already loaded.
fn spawn_selection_loads(app: &mut App, api: &RestClient, tx: &mpsc::Sender<TuiEvent>) {
    match app.active_view {
        View::OrgChart => {
            if let Some(sid) = app.begin_idp_load() {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = api.idps(&sid).await.map_err(DirectoryError::from);
                    let _ = tx.send(TuiEvent::IdpsLoaded { sid, result }).await;
                });
            }
        }
        View::Jobs => {
            if let Some(job_code) = app.begin_profile_load() {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = api
                        .job_competencies(&job_code)
                        .await
                        .map_err(DirectoryError::from);
                    let _ = tx.send(TuiEvent::ProfileLoaded { job_code, result }).await;
                });
            }
        }
        View::Competencies => {}
    }
}

fn spawn_team_load(api: &RestClient, ticket: LoadTicket, tx: &mpsc::Sender<TuiEvent>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = EmployeeDirectory::team(&api, ticket.root()).await;
        let _ = tx.send(TuiEvent::TeamLoaded { ticket, result }).await;
    });
}

fn spawn_jobs_load(api: &RestClient, tx: &mpsc::Sender<TuiEvent>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api.jobs().await.map_err(DirectoryError::from);
        let _ = tx.send(TuiEvent::JobsLoaded(result)).await;
    });
}

fn spawn_competencies_load(api: &RestClient, tx: &mpsc::Sender<TuiEvent>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let (competencies, assessors) = tokio::join!(api.competencies(), api.assessors());
        let _ = tx
            .send(TuiEvent::CompetenciesLoaded(
                competencies.map_err(DirectoryError::from),
            ))
            .await;
        let _ = tx
            .send(TuiEvent::AssessorsLoaded(assessors.map_err(DirectoryError::from)))
            .await;
    });
}
