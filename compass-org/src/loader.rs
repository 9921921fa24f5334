//! Last-write-wins loading of a team list.
//!
//! Every fetch gets a [`LoadTicket`]. A response is applied only if its
//! ticket is the latest one issued; anything older is dropped, so a slow
//! response for a previous root can never overwrite a newer one.

use compass_core::Sid;
use std::fmt;

/// Load lifecycle of a piece of remote data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    NotLoaded,
    /// A fetch is in flight; `previous` stays visible meanwhile.
    Loading { previous: Option<T> },
    /// Possibly empty.
    Loaded(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::NotLoaded
    }
}

impl<T> LoadState<T> {
    /// Data to display: the loaded value, or the previous one while loading.
    pub fn current(&self) -> Option<&T> {
        match self {
            LoadState::NotLoaded => None,
            LoadState::Loading { previous } => previous.as_ref(),
            LoadState::Loaded(value) => Some(value),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    /// Take the displayable value out, discarding the lifecycle.
    pub fn into_current(self) -> Option<T> {
        match self {
            LoadState::NotLoaded => None,
            LoadState::Loading { previous } => previous,
            LoadState::Loaded(value) => Some(value),
        }
    }
}

/// Receipt for one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
    root: Sid,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> &Sid {
        &self.root
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.generation, self.root)
    }
}

/// What [`TeamLoader::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<E> {
    Applied,
    /// A newer ticket was issued; the response was dropped.
    Stale,
    /// The fetch failed; the prior data was kept.
    Failed(E),
}

/// Tracks the latest request and the data it produced.
#[derive(Debug, Clone)]
pub struct TeamLoader<T> {
    state: LoadState<T>,
    latest: u64,
    /// Root the current data belongs to.
    loaded_root: Option<Sid>,
    /// Root of the latest ticket.
    requested_root: Option<Sid>,
}

impl<T> Default for TeamLoader<T> {
    fn default() -> Self {
        Self {
            state: LoadState::NotLoaded,
            latest: 0,
            loaded_root: None,
            requested_root: None,
        }
    }
}

impl<T> TeamLoader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a fetch under `root`. Supersedes every earlier ticket.
    pub fn begin(&mut self, root: Sid) -> LoadTicket {
        self.latest += 1;
        let previous = std::mem::take(&mut self.state).into_current();
        self.state = LoadState::Loading { previous };
        self.requested_root = Some(root.clone());
        let ticket = LoadTicket {
            generation: self.latest,
            root,
        };
        tracing::debug!(ticket = %ticket, "Team load started");
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Apply the result of the fetch behind `ticket`.
    pub fn complete<E: fmt::Display>(
        &mut self,
        ticket: &LoadTicket,
        result: Result<T, E>,
    ) -> LoadOutcome<E> {
        if !self.is_current(ticket) {
            tracing::warn!(
                ticket = %ticket,
                latest = self.latest,
                "Discarding stale team response"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(value) => {
                self.state = LoadState::Loaded(value);
                self.loaded_root = Some(ticket.root.clone());
                tracing::info!(ticket = %ticket, "Team loaded");
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(ticket = %ticket, error = %err, "Team load failed");
                self.state = match std::mem::take(&mut self.state).into_current() {
                    Some(previous) => LoadState::Loaded(previous),
                    None => LoadState::NotLoaded,
                };
                self.requested_root = self.loaded_root.clone();
                LoadOutcome::Failed(err)
            }
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn current(&self) -> Option<&T> {
        self.state.current()
    }

    pub fn loaded_root(&self) -> Option<&Sid> {
        self.loaded_root.as_ref()
    }

    pub fn requested_root(&self) -> Option<&Sid> {
        self.requested_root.as_ref()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> Sid {
        Sid::new(raw).unwrap()
    }

    #[test]
    fn test_starts_not_loaded() {
        let loader: TeamLoader<Vec<u8>> = TeamLoader::new();
        assert_eq!(loader.state(), &LoadState::NotLoaded);
        assert!(loader.current().is_none());
    }

    #[test]
    fn test_applies_latest() {
        let mut loader = TeamLoader::new();
        let ticket = loader.begin(sid("A"));
        assert!(loader.state().is_loading());
        let outcome = loader.complete(&ticket, Ok::<_, String>(vec![1, 2]));
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(loader.current(), Some(&vec![1, 2]));
        assert_eq!(loader.loaded_root(), Some(&sid("A")));
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut loader = TeamLoader::new();
        let first = loader.begin(sid("A"));
        let second = loader.begin(sid("B"));

        assert_eq!(
            loader.complete(&second, Ok::<_, String>(vec![2])),
            LoadOutcome::Applied
        );
        // The slow response for A arrives last and must not win.
        assert_eq!(
            loader.complete(&first, Ok::<_, String>(vec![1])),
            LoadOutcome::Stale
        );
        assert_eq!(loader.current(), Some(&vec![2]));
        assert_eq!(loader.loaded_root(), Some(&sid("B")));
    }

    #[test]
    fn test_stale_before_latest_also_discarded() {
        let mut loader = TeamLoader::new();
        let first = loader.begin(sid("A"));
        let second = loader.begin(sid("B"));
        assert_eq!(
            loader.complete(&first, Ok::<_, String>(vec![1])),
            LoadOutcome::Stale
        );
        assert!(loader.state().is_loading());
        loader.complete(&second, Ok::<_, String>(vec![2]));
        assert_eq!(loader.current(), Some(&vec![2]));
    }

    #[test]
    fn test_previous_visible_while_loading() {
        let mut loader = TeamLoader::new();
        let ticket = loader.begin(sid("A"));
        loader.complete(&ticket, Ok::<_, String>(vec![7]));
        loader.begin(sid("A"));
        assert!(loader.state().is_loading());
        assert_eq!(loader.current(), Some(&vec![7]));
    }

    #[test]
    fn test_failure_keeps_prior_state() {
        let mut loader = TeamLoader::new();
        let ticket = loader.begin(sid("A"));
        loader.complete(&ticket, Ok::<_, String>(vec![7]));

        let ticket = loader.begin(sid("B"));
        let outcome = loader.complete(&ticket, Err::<Vec<i32>, _>("down".to_string()));
        assert_eq!(outcome, LoadOutcome::Failed("down".to_string()));
        assert_eq!(loader.state(), &LoadState::Loaded(vec![7]));
        assert_eq!(loader.loaded_root(), Some(&sid("A")));
        assert_eq!(loader.requested_root(), Some(&sid("A")));
    }

    #[test]
    fn test_failure_without_data_is_not_loaded() {
        let mut loader: TeamLoader<Vec<i32>> = TeamLoader::new();
        let ticket = loader.begin(sid("A"));
        loader.complete(&ticket, Err::<Vec<i32>, _>("down"));
        assert_eq!(loader.state(), &LoadState::NotLoaded);
    }

    #[test]
    fn test_empty_result_is_loaded() {
        let mut loader = TeamLoader::new();
        let ticket = loader.begin(sid("A"));
        loader.complete(&ticket, Ok::<Vec<i32>, String>(Vec::new()));
        assert!(loader.state().is_loaded());
        assert_eq!(loader.current(), Some(&Vec::new()));
    }
}
