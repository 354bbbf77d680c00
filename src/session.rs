//! Decision session state machine.
//!
//! The controller owns the profile, the active tab and the [`SessionState`].
//! Requests run as spawned tasks and report back through an event channel;
//! every request carries a sequence number and only the most recently issued
//! one may commit its outcome.

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::decision_client::DecisionService;
use crate::errors::RequestError;
use crate::models::{DecisionResult, Profile, ProfileField};
use crate::tabs::ActiveTab;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Lifecycle of the current decision query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Ready(DecisionResult),
    Failed(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Ready(_) => "ready",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// Messages delivered to the controller from its background tasks.
#[derive(Debug)]
pub enum SessionEvent {
    /// A request finished.
    Completed {
        seq: u64,
        outcome: Result<DecisionResult, RequestError>,
    },
    /// A debounce timer elapsed.
    DebounceElapsed { generation: u64 },
}

pub struct SessionController<S: DecisionService> {
    session_id: Uuid,
    service: Arc<S>,
    profile: Profile,
    state: SessionState,
    tab: ActiveTab,
    has_baseline: bool,
    latest_seq: u64,
    in_flight: usize,
    debouncer: Debouncer,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<S: DecisionService> SessionController<S> {
    pub fn new(service: S, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session_id = Uuid::new_v4();
        tracing::info!("Decision session {} started", session_id);

        Self {
            session_id,
            service: Arc::new(service),
            profile: Profile::default(),
            state: SessionState::Idle,
            tab: ActiveTab::default(),
            has_baseline: false,
            latest_seq: 0,
            in_flight: 0,
            debouncer: Debouncer::new(debounce),
            events_tx,
            events_rx,
        }
    }

    pub fn from_config(service: S, config: &Config) -> Self {
        Self::new(service, config.debounce)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.tab
    }

    /// The committed result, if the session is `Ready`.
    pub fn result(&self) -> Option<&DecisionResult> {
        match &self.state {
            SessionState::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// The surfaced error, if the session is `Failed`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// True when nothing is running and no timer is pending.
    pub fn is_settled(&self) -> bool {
        self.in_flight == 0 && !self.debouncer.is_pending()
    }

    /// Whether edits to tracked fields currently schedule a re-simulation.
    pub fn simulation_armed(&self) -> bool {
        self.tab == ActiveTab::WhatIf && self.has_baseline
    }

    /// Applies a user edit to the profile.
    ///
    /// Returns `true` when the edit (re)started the debounce timer.
    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> bool {
        self.profile.set_field(field, raw);
        tracing::debug!("Profile field {} set to {:?}", field, raw);

        if field.is_simulation_tracked() && self.simulation_armed() {
            let tx = self.events_tx.clone();
            self.debouncer.arm(move |generation| {
                let _ = tx.send(SessionEvent::DebounceElapsed { generation });
            });
            return true;
        }
        false
    }

    pub fn set_tab(&mut self, tab: ActiveTab) {
        if self.tab != tab {
            tracing::debug!("Tab switched {} -> {}", self.tab, tab);
        }
        self.tab = tab;
    }

    /// Issues a request for the current profile right away.
    ///
    /// Cancels any pending debounce, moves to `Loading` and supersedes every
    /// request issued before. Returns the new request's sequence number.
    pub fn submit(&mut self) -> u64 {
        if self.debouncer.cancel() {
            tracing::debug!("Pending simulation superseded by explicit submit");
        }

        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.state = SessionState::Loading;
        self.in_flight += 1;

        let service = Arc::clone(&self.service);
        let profile = self.profile.clone();
        let tx = self.events_tx.clone();
        tracing::info!(
            "Session {} issuing request #{} ({} in flight)",
            self.session_id,
            seq,
            self.in_flight
        );

        tokio::spawn(async move {
            let outcome = service.submit(profile).await;
            let _ = tx.send(SessionEvent::Completed { seq, outcome });
        });

        seq
    }

    /// Waits for the next background event.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Applies a background event. Returns `true` when the session state changed.
    pub fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Completed { seq, outcome } => self.commit(seq, outcome),
            SessionEvent::DebounceElapsed { generation } => {
                if !self.debouncer.take_fired(generation) {
                    return false;
                }
                tracing::debug!("Simulation quiet period elapsed, re-querying");
                self.submit();
                true
            }
        }
    }

    /// Processes events until no request is in flight and no timer is pending.
    pub async fn settle(&mut self) {
        while !self.is_settled() {
            match self.events_rx.recv().await {
                Some(event) => {
                    self.handle(event);
                }
                None => break,
            }
        }
    }

    fn commit(&mut self, seq: u64, outcome: Result<DecisionResult, RequestError>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if seq != self.latest_seq {
            tracing::debug!(
                "Discarding stale response #{} (latest is #{})",
                seq,
                self.latest_seq
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Request #{} committed: {} at p={:.3}",
                    seq,
                    result.prediction,
                    result.probability
                );
                self.has_baseline = true;
                self.state = SessionState::Ready(result);
            }
            Err(err) => {
                tracing::warn!("Request #{} failed: {}", seq, err);
                self.state = SessionState::Failed(err.user_message());
            }
        }
        true
    }
}
