//! Feed synchronization under a hybrid pull+push model.
//!
//! A REST snapshot is reconciled with a stream of push events (new post,
//! new comment, new reaction, delete) into one consistent, duplicate-free,
//! correctly ordered collection. The [`engine`] module is the pure core;
//! [`runtime`] drives it against the [`http`] and [`push`] IO seams.

pub mod api;
pub mod engine;
pub mod error;
pub mod http;
pub mod mock_client;
pub mod push;
pub mod runtime;
pub mod types;

pub use api::{ApiResponse, FeedApi, PushSource};
pub use engine::{FeedEngine, FeedPhase, FeedView};
pub use error::ApiError;
pub use mock_client::{MockFeedApi, MockPushSource};
pub use push::{PushEvent, WsPushChannel};
pub use runtime::{FeedConfig, FeedHandle, FeedOrchestrator};
