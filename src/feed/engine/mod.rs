//! Feed reconciliation engine.
//!
//! This module implements the **Functional Core** of the feed
//! synchronization logic. It acts as a pure state machine:
//! - **Input**: `EngineEvent` (snapshot results, push events, timer ticks).
//! - **Output**: `Vec<EngineCommand>` (fetches to be executed by the runtime).
//!
//! # Architecture guarantees
//! * **No Network**: this module never opens sockets or makes HTTP requests.
//! * **No Async**: all functions are synchronous and fast.
//! * **Deterministic**: the same initial state and event sequence always
//!   produce the same collection and commands.

pub mod state;
mod logic;
pub mod types;


pub use types::{EngineCommand, EngineEvent, FeedPhase, FeedView};

use state::{EngineState, Lifecycle};

/// The reconciliation "Brain".
///
/// `FeedEngine` owns the canonical ordered post collection and merges the
/// initial snapshot, scheduled re-fetches, targeted refreshes, and push
/// deltas into one consistent, duplicate-free, correctly ordered view.
#[derive(Debug)]
pub struct FeedEngine {
    state: EngineState,
}

impl FeedEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState {
                lifecycle: Lifecycle::Uninitialized,
                posts: Vec::new(),
                hobby_names: Default::default(),
                error: None,
                revision: 0,
            },
        }
    }

    /// The main event handler.
    ///
    /// Consumes an event and returns the commands the runtime must execute.
    /// Every handler checks the lifecycle first: results of operations still
    /// in flight at close time are never applied.
    pub fn handle_event(&mut self, event: EngineEvent) -> Vec<EngineCommand> {
        match event {
            EngineEvent::Activated => logic::on_activated(&mut self.state),
            EngineEvent::SnapshotLoaded(posts) => logic::on_snapshot_loaded(&mut self.state, posts),
            EngineEvent::SnapshotFailed(error) => logic::on_snapshot_failed(&mut self.state, &error),
            EngineEvent::HobbiesLoaded(hobbies) => {
                logic::on_hobbies_loaded(&mut self.state, hobbies)
            }
            EngineEvent::HobbiesFailed(error) => logic::on_hobbies_failed(&self.state, &error),
            EngineEvent::RefreshDue => logic::on_refresh_due(&mut self.state),
            EngineEvent::Push(push) => logic::on_push(&mut self.state, push),
            EngineEvent::PostRefreshed(post) => logic::on_post_refreshed(&mut self.state, post),
            EngineEvent::PostRefreshFailed { id, error } => {
                logic::on_post_refresh_failed(&self.state, id, &error)
            }
            EngineEvent::Deactivated => logic::on_deactivated(&mut self.state),
        }
    }

    /// Current presentation-facing projection of the engine state.
    ///
    /// After deactivation the view is empty; observers are expected to have
    /// been dropped by then.
    pub fn view(&self) -> FeedView {
        let phase = match self.state.lifecycle {
            Lifecycle::Ready => FeedPhase::Ready,
            Lifecycle::Error => FeedPhase::Error,
            Lifecycle::Uninitialized | Lifecycle::Loading | Lifecycle::Closed => FeedPhase::Loading,
        };
        FeedView {
            phase,
            posts: self.state.posts.clone(),
            error: self.state.error.clone(),
            hobby_names: self.state.hobby_names.clone(),
            revision: self.state.revision,
        }
    }

    /// Monotonic change counter; bumped on every externally visible change.
    pub fn revision(&self) -> u64 {
        self.state.revision
    }

    pub fn is_closed(&self) -> bool {
        self.state.lifecycle == Lifecycle::Closed
    }
}

impl Default for FeedEngine {
    fn default() -> Self {
        Self::new()
    }
}
