//! Keeps a child select control in step with its parent.
//!
//! Every parent change runs one sync: the child is cleared and disabled right
//! away, the lookup runs on a spawned task, and its result is applied only if
//! no newer sync has started in the meantime. A failed lookup leaves the
//! child disabled; there is no retry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use shared::domain::{SelectControl, SelectError, SelectionOption};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::lookup::LookupSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Loading { token: u64 },
    Populated { token: u64 },
    /// The lookup for `token` failed; the child stays disabled.
    Failed { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    Loading { token: u64, parent_value: String },
    Populated { token: u64, options: usize },
    LookupFailed { token: u64, error: String },
    StaleResolutionIgnored { token: u64, latest: u64 },
}

struct SelectorState {
    parent: SelectControl,
    child: SelectControl,
    phase: SyncPhase,
    latest_token: u64,
    started: bool,
}

pub struct DependentSelector {
    lookup: Arc<dyn LookupSource>,
    state: Mutex<SelectorState>,
    events: broadcast::Sender<SelectorEvent>,
}

impl DependentSelector {
    pub fn new(
        parent: SelectControl,
        child: SelectControl,
        lookup: Arc<dyn LookupSource>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            lookup,
            state: Mutex::new(SelectorState {
                parent,
                child,
                phase: SyncPhase::Idle,
                latest_token: 0,
                started: false,
            }),
            events,
        })
    }

    fn state(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn parent(&self) -> SelectControl {
        self.state().parent.clone()
    }

    pub fn child(&self) -> SelectControl {
        self.state().child.clone()
    }

    pub fn phase(&self) -> SyncPhase {
        self.state().phase
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SelectorEvent> {
        self.events.subscribe()
    }

    /// Initial load with whatever the parent holds by default. Only the first
    /// call does anything.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let parent_value = {
            let mut state = self.state();
            if state.started {
                return None;
            }
            state.started = true;
            state.parent.selected_value().unwrap_or_default().to_string()
        };
        Some(self.sync(&parent_value))
    }

    /// Parent change: records the new selection, then syncs the child.
    pub fn select_parent(self: &Arc<Self>, value: &str) -> Result<JoinHandle<()>, SelectError> {
        {
            let mut state = self.state();
            state.parent.select(value)?;
            state.started = true;
        }
        Ok(self.sync(value))
    }

    /// Clears and disables the child immediately, then resolves the lookup on
    /// a spawned task. Must be called from within a tokio runtime.
    pub fn sync(self: &Arc<Self>, parent_value: &str) -> JoinHandle<()> {
        let token = self.begin(parent_value);
        let selector = Arc::clone(self);
        let parent_value = parent_value.to_string();
        tokio::spawn(async move {
            let result = selector.lookup.fetch_options(&parent_value).await;
            selector.resolve(token, result);
        })
    }

    /// Synchronous half of a sync. Returns the token the resolution must
    /// present.
    pub fn begin(&self, parent_value: &str) -> u64 {
        let token = {
            let mut state = self.state();
            state.latest_token += 1;
            let token = state.latest_token;
            state.child.clear_options();
            state.child.set_disabled(true);
            state.phase = SyncPhase::Loading { token };
            token
        };
        debug!(token, parent_value, "child options cleared; lookup pending");
        let _ = self.events.send(SelectorEvent::Loading {
            token,
            parent_value: parent_value.to_string(),
        });
        token
    }

    /// Applies a lookup result. Returns `false` when `token` has been
    /// superseded and the result was dropped.
    pub fn resolve(&self, token: u64, result: Result<Vec<SelectionOption>>) -> bool {
        let mut state = self.state();
        if token != state.latest_token {
            let latest = state.latest_token;
            drop(state);
            debug!(token, latest, "ignoring stale lookup resolution");
            let _ = self
                .events
                .send(SelectorEvent::StaleResolutionIgnored { token, latest });
            return false;
        }

        match result {
            Ok(options) => {
                let count = options.len();
                state.child.replace_options(options);
                state.child.set_disabled(false);
                state.phase = SyncPhase::Populated { token };
                drop(state);
                info!(token, options = count, "child options populated");
                let _ = self.events.send(SelectorEvent::Populated {
                    token,
                    options: count,
                });
            }
            Err(error) => {
                state.phase = SyncPhase::Failed { token };
                drop(state);
                warn!(token, %error, "option lookup failed; child stays disabled");
                let _ = self.events.send(SelectorEvent::LookupFailed {
                    token,
                    error: error.to_string(),
                });
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;
