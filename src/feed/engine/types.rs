use std::collections::HashMap;

use crate::feed::error::ApiError;
use crate::feed::push::envelope::PushEvent;
use crate::feed::types::{Hobby, HobbyId, Post, PostId};

#[derive(Debug, Clone)]
pub enum EngineEvent {
    Activated,
    SnapshotLoaded(Vec<Post>),
    SnapshotFailed(ApiError),
    HobbiesLoaded(Vec<Hobby>),
    HobbiesFailed(ApiError),
    /// Fixed-interval staleness backstop fired.
    RefreshDue,
    Push(PushEvent),
    PostRefreshed(Post),
    PostRefreshFailed { id: PostId, error: ApiError },
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchSnapshot,
    FetchHobbies,
    FetchPost(PostId),
}

/// Presentation-visible phase. Loading and Error are mutually exclusive
/// states, not combinable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Loading,
    Ready,
    Error,
}

/// Read-only snapshot of the feed exposed to the presentation layer.
#[derive(Debug, Clone)]
pub struct FeedView {
    pub phase: FeedPhase,
    pub posts: Vec<Post>,
    pub error: Option<String>,
    pub hobby_names: HashMap<HobbyId, String>,
    pub revision: u64,
}

impl FeedView {
    /// Resolved hobby display name for a post ("General" when untagged).
    pub fn hobby_name(&self, post: &Post) -> &str {
        match post.hobby_id {
            Some(id) => self
                .hobby_names
                .get(&id)
                .map(String::as_str)
                .unwrap_or("Unknown"),
            None => "General",
        }
    }

    /// The UI-visible "no posts" condition.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
