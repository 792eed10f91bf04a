use crate::feed::error::ApiError;
use crate::feed::push::envelope::PushEvent;
use crate::feed::types::{Hobby, Post, PostId};

/// Completed data API request, delivered through [`FeedApi::poll_response`].
#[derive(Debug)]
pub enum ApiResponse {
    Snapshot(Result<Vec<Post>, ApiError>),
    Hobbies(Result<Vec<Hobby>, ApiError>),
    Post {
        id: PostId,
        result: Result<Post, ApiError>,
    },
}

/// Minimal data API surface used by the feed runtime.
///
/// All requests are non-blocking; completions are polled. Requests may
/// overlap and completions arrive in completion order, not request order.
pub trait FeedApi {
    /// Request the full server-ordered feed snapshot.
    fn request_snapshot(&mut self);

    /// Request the hobby catalog (id → name lookup for display).
    fn request_hobbies(&mut self);

    /// Request a single post by id (targeted refresh).
    fn request_post(&mut self, id: PostId);

    /// Non-blocking poll: next completed request, if any.
    fn poll_response(&mut self) -> Option<ApiResponse>;
}

/// Push event source, exclusively owned by one feed view for its lifetime.
pub trait PushSource {
    /// Non-blocking poll: next decoded push event, if any.
    fn poll_event(&mut self) -> Option<PushEvent>;

    /// Releases the underlying connection deterministically. Idempotent.
    fn close(&mut self);
}
