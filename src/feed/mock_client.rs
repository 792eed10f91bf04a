//! Pure in-memory test doubles for the driver-facing IO seams.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::feed::api::{ApiResponse, FeedApi, PushSource};
use crate::feed::error::ApiError;
use crate::feed::push::envelope::PushEvent;
use crate::feed::types::{Hobby, Post, PostId};

/// Scripted data API.
///
/// Requests pop pre-seeded results straight into the completion queue; a
/// request with nothing seeded stays pending forever, which is how tests
/// hold the engine in `Loading`.
pub struct MockFeedApi {
    pub snapshot_results: VecDeque<Result<Vec<Post>, ApiError>>,
    pub hobbies_results: VecDeque<Result<Vec<Hobby>, ApiError>>,
    pub post_results: HashMap<PostId, VecDeque<Result<Post, ApiError>>>,

    /// Request log, shared so tests can assert after the orchestrator takes
    /// ownership of the mock.
    pub snapshot_requests: Arc<Mutex<usize>>,
    pub post_requests: Arc<Mutex<Vec<PostId>>>,

    completed: VecDeque<ApiResponse>,
}

impl MockFeedApi {
    pub fn new() -> Self {
        Self {
            snapshot_results: VecDeque::new(),
            hobbies_results: VecDeque::new(),
            post_results: HashMap::new(),
            snapshot_requests: Arc::new(Mutex::new(0)),
            post_requests: Arc::new(Mutex::new(Vec::new())),
            completed: VecDeque::new(),
        }
    }

    pub fn seed_snapshot(&mut self, result: Result<Vec<Post>, ApiError>) {
        self.snapshot_results.push_back(result);
    }

    pub fn seed_hobbies(&mut self, result: Result<Vec<Hobby>, ApiError>) {
        self.hobbies_results.push_back(result);
    }

    pub fn seed_post(&mut self, id: PostId, result: Result<Post, ApiError>) {
        self.post_results.entry(id).or_default().push_back(result);
    }
}

impl Default for MockFeedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedApi for MockFeedApi {
    fn request_snapshot(&mut self) {
        *self.snapshot_requests.lock().unwrap() += 1;
        if let Some(result) = self.snapshot_results.pop_front() {
            self.completed.push_back(ApiResponse::Snapshot(result));
        }
    }

    fn request_hobbies(&mut self) {
        if let Some(result) = self.hobbies_results.pop_front() {
            self.completed.push_back(ApiResponse::Hobbies(result));
        }
    }

    fn request_post(&mut self, id: PostId) {
        self.post_requests.lock().unwrap().push(id);
        if let Some(result) = self.post_results.get_mut(&id).and_then(|q| q.pop_front()) {
            self.completed.push_back(ApiResponse::Post { id, result });
        }
    }

    fn poll_response(&mut self) -> Option<ApiResponse> {
        self.completed.pop_front()
    }
}

/// Scripted push source backed by a plain event queue.
pub struct MockPushSource {
    pub events: VecDeque<PushEvent>,
    pub close_calls: Arc<Mutex<usize>>,
}

impl MockPushSource {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            close_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn push(&mut self, event: PushEvent) {
        self.events.push_back(event);
    }
}

impl Default for MockPushSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PushSource for MockPushSource {
    fn poll_event(&mut self) -> Option<PushEvent> {
        if *self.close_calls.lock().unwrap() > 0 {
            return None;
        }
        self.events.pop_front()
    }

    fn close(&mut self) {
        *self.close_calls.lock().unwrap() += 1;
    }
}
