use std::collections::HashMap;

use crate::feed::types::{HobbyId, Post};

/// Engine lifecycle.
///
/// `Error` is reachable only from a failed initial snapshot. `Closed` is
/// terminal; a deactivated feed view requires a new engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Loading,
    Ready,
    Error,
    Closed,
}

#[derive(Debug)]
pub struct EngineState {
    pub lifecycle: Lifecycle,

    /// Canonical ordered collection. New pushed posts prepend, targeted
    /// refreshes replace in place, snapshots replace wholesale.
    pub posts: Vec<Post>,

    /// hobby id -> display name
    pub hobby_names: HashMap<HobbyId, String>,

    /// Blocking diagnostic, set only when the initial snapshot fails.
    pub error: Option<String>,

    /// Bumped on every externally visible change; drives change
    /// notification in the runtime.
    pub revision: u64,
}

impl EngineState {
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}
