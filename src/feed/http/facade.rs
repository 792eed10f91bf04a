//! Non-blocking facade bridging the async data client to the feed runtime.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::feed::api::{ApiResponse, FeedApi};
use crate::feed::http::client::DataApiClient;
use crate::feed::types::PostId;

#[derive(Debug, Clone, Copy)]
enum ApiRequest {
    Snapshot,
    Hobbies,
    Post(PostId),
}

// =====================================================================
// Shared State
// =====================================================================

struct SharedState {
    /// Requests queued by the orchestrator, not yet dispatched.
    pending: VecDeque<ApiRequest>,

    /// Completed requests ready to be consumed by the orchestrator.
    completed: VecDeque<ApiResponse>,
}

// =====================================================================
// Public facade
// =====================================================================

/// Runs [`DataApiClient`] on a background tokio runtime and exposes the
/// non-blocking request/poll surface consumed by the orchestrator.
///
/// Requests may overlap; completions are delivered in completion order.
/// Whatever completes last wins whatever it touches, which the engine's
/// whole-record replacement rules make safe.
pub struct HttpFeedApi {
    state: Arc<Mutex<SharedState>>,
}

impl HttpFeedApi {
    pub fn new(client: DataApiClient) -> Self {
        let state = Arc::new(Mutex::new(SharedState {
            pending: VecDeque::new(),
            completed: VecDeque::new(),
        }));

        let bg_state = state.clone();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("api runtime");
            rt.block_on(async move {
                let client = Arc::new(client);
                loop {
                    let batch: Vec<ApiRequest> = {
                        let mut s = bg_state.lock().unwrap();
                        s.pending.drain(..).collect()
                    };

                    for request in batch {
                        let client = client.clone();
                        let state = bg_state.clone();
                        tokio::spawn(async move {
                            let response = dispatch(&client, request).await;
                            state.lock().unwrap().completed.push_back(response);
                        });
                    }

                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            });
        });

        Self { state }
    }
}

async fn dispatch(client: &DataApiClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Snapshot => ApiResponse::Snapshot(client.fetch_feed_snapshot().await),
        ApiRequest::Hobbies => ApiResponse::Hobbies(client.fetch_hobbies().await),
        ApiRequest::Post(id) => ApiResponse::Post {
            id,
            result: client.fetch_post(id).await,
        },
    }
}

// =====================================================================
// FeedApi
// =====================================================================

impl FeedApi for HttpFeedApi {
    fn request_snapshot(&mut self) {
        log::debug!("[HTTP] request_snapshot queued");
        self.state
            .lock()
            .unwrap()
            .pending
            .push_back(ApiRequest::Snapshot);
    }

    fn request_hobbies(&mut self) {
        log::debug!("[HTTP] request_hobbies queued");
        self.state
            .lock()
            .unwrap()
            .pending
            .push_back(ApiRequest::Hobbies);
    }

    fn request_post(&mut self, id: PostId) {
        log::debug!("[HTTP] request_post({id}) queued");
        self.state
            .lock()
            .unwrap()
            .pending
            .push_back(ApiRequest::Post(id));
    }

    fn poll_response(&mut self) -> Option<ApiResponse> {
        self.state.lock().unwrap().completed.pop_front()
    }
}
