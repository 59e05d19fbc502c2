//! Load lifecycle
//!
//! Fetching the subtitle source is the host's job. The renderer hands out a
//! [`LoadRequest`] with a ticket, and the host answers with the fetched text
//! (or an error) under the same ticket. Swapping the source while a load is
//! in flight does not abort anything; the answer is discarded when it arrives
//! and loading starts over.

use log::{debug, warn};

use crate::utils::OverlayError;

/// Renderer load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Nothing loaded
    #[default]
    Uninitialized,
    /// Waiting for the source, or building subtitles from it
    Initializing,
    /// The source changed mid-load; the running load will be discarded
    CancelingInit,
    /// Subtitles are built and rendering
    Initialized,
    /// The last fetch failed
    Failed,
}

/// Identifies one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Fetch the host must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ticket to answer with
    pub ticket: LoadTicket,
    /// Source to fetch
    pub source: String,
}

/// What to do with an answered fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The ticket is not the one in flight
    Stale,
    /// The source changed meanwhile; start over
    Restart,
    /// Build subtitles from the result
    Proceed,
}

/// One unit of deferred load work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadTask {
    /// Read canvas size, speed and offsets from `[Script Info]`
    ApplyHeader,
    /// Measure line heights of every style
    BuildStyles,
    /// Prepare and split one event
    BuildSubtitle(usize),
    /// Start rendering
    Finish,
}

/// Load state machine
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LoadState,
    source: Option<String>,
    next_ticket: u64,
    in_flight: Option<LoadTicket>,
    last_error: Option<OverlayError>,
}

impl Lifecycle {
    /// Create an idle lifecycle without a source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Current source, if any
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Error of the last failed fetch
    #[must_use]
    pub const fn last_error(&self) -> Option<&OverlayError> {
        self.last_error.as_ref()
    }

    /// Whether the running load has been superseded
    #[must_use]
    pub fn is_canceling(&self) -> bool {
        self.state == LoadState::CancelingInit
    }

    fn enter(&mut self, state: LoadState) {
        if self.state != state {
            debug!("load state {:?} -> {state:?}", self.state);
            self.state = state;
        }
    }

    /// Replace the source
    ///
    /// A load in flight is marked for cancellation; loaded or failed
    /// subtitles are dropped back to [`LoadState::Uninitialized`].
    pub fn set_source(&mut self, source: String) {
        self.source = Some(source);
        match self.state {
            LoadState::Initializing => self.enter(LoadState::CancelingInit),
            LoadState::Initialized | LoadState::Failed => self.enter(LoadState::Uninitialized),
            LoadState::Uninitialized | LoadState::CancelingInit => {}
        }
    }

    /// Start a load
    ///
    /// Returns the fetch to perform, or `None` when there is no source or a
    /// load is already running (which is then canceled).
    pub fn begin(&mut self) -> Option<LoadRequest> {
        match self.state {
            LoadState::Initializing => {
                self.enter(LoadState::CancelingInit);
                return None;
            }
            LoadState::CancelingInit => return None,
            _ => {}
        }
        let source = self.source.clone()?;
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.last_error = None;
        self.enter(LoadState::Initializing);
        Some(LoadRequest { ticket, source })
    }

    /// Match an answered fetch against the one in flight
    pub fn complete(&mut self, ticket: LoadTicket) -> Completion {
        if self.in_flight != Some(ticket) {
            debug!("ignoring stale load {ticket:?}");
            return Completion::Stale;
        }
        self.in_flight = None;
        if self.is_canceling() {
            self.enter(LoadState::Uninitialized);
            return Completion::Restart;
        }
        Completion::Proceed
    }

    /// Record a failed fetch
    pub fn fail(&mut self, error: OverlayError) {
        warn!("subtitle load failed: {error}");
        self.last_error = Some(error);
        self.enter(LoadState::Failed);
    }

    /// Finish building
    ///
    /// Returns `false` when the load was canceled meanwhile, leaving the
    /// lifecycle [`LoadState::Uninitialized`] so the caller can start over.
    pub fn finish(&mut self) -> bool {
        if self.is_canceling() {
            self.enter(LoadState::Uninitialized);
            false
        } else {
            self.enter(LoadState::Initialized);
            true
        }
    }

    /// Drop everything back to [`LoadState::Uninitialized`]
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.enter(LoadState::Uninitialized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(source: &str) -> (Lifecycle, LoadRequest) {
        let mut lifecycle = Lifecycle::new();
        lifecycle.set_source(source.to_string());
        let request = lifecycle.begin().expect("request");
        (lifecycle, request)
    }

    #[test]
    fn no_source_no_request() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.begin().is_none());
        assert_eq!(lifecycle.state(), LoadState::Uninitialized);
    }

    #[test]
    fn load_completes() {
        let (mut lifecycle, request) = started("a.ass");
        assert_eq!(request.source, "a.ass");
        assert_eq!(lifecycle.state(), LoadState::Initializing);
        assert_eq!(lifecycle.complete(request.ticket), Completion::Proceed);
        assert!(lifecycle.finish());
        assert_eq!(lifecycle.state(), LoadState::Initialized);
    }

    #[test]
    fn swapping_source_mid_load_restarts() {
        let (mut lifecycle, request) = started("a.ass");
        lifecycle.set_source("b.ass".to_string());
        assert_eq!(lifecycle.state(), LoadState::CancelingInit);
        assert!(lifecycle.begin().is_none());

        assert_eq!(lifecycle.complete(request.ticket), Completion::Restart);
        assert_eq!(lifecycle.state(), LoadState::Uninitialized);
        let retry = lifecycle.begin().expect("retry");
        assert_eq!(retry.source, "b.ass");
        assert_ne!(retry.ticket, request.ticket);
    }

    #[test]
    fn init_twice_cancels() {
        let (mut lifecycle, _) = started("a.ass");
        assert!(lifecycle.begin().is_none());
        assert!(lifecycle.is_canceling());
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let (mut lifecycle, first) = started("a.ass");
        assert_eq!(lifecycle.complete(first.ticket), Completion::Proceed);
        assert!(lifecycle.finish());
        lifecycle.set_source("b.ass".to_string());
        let second = lifecycle.begin().expect("second");
        assert_eq!(lifecycle.complete(first.ticket), Completion::Stale);
        assert_eq!(lifecycle.complete(second.ticket), Completion::Proceed);
    }

    #[test]
    fn canceled_build_does_not_activate() {
        let (mut lifecycle, request) = started("a.ass");
        assert_eq!(lifecycle.complete(request.ticket), Completion::Proceed);
        lifecycle.set_source("b.ass".to_string());
        assert!(!lifecycle.finish());
        assert_eq!(lifecycle.state(), LoadState::Uninitialized);
    }

    #[test]
    fn failure_is_kept_until_retry() {
        let (mut lifecycle, request) = started("a.ass");
        assert_eq!(lifecycle.complete(request.ticket), Completion::Proceed);
        lifecycle.fail(OverlayError::Load("404".to_string()));
        assert_eq!(lifecycle.state(), LoadState::Failed);
        assert!(lifecycle.last_error().is_some());

        assert!(lifecycle.begin().is_some());
        assert_eq!(lifecycle.state(), LoadState::Initializing);
        assert!(lifecycle.last_error().is_none());
    }
}
