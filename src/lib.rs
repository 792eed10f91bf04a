//! Client library for the HobbyMatch social feed.
//!
//! The interesting part lives in [`feed::engine`]: the reconciliation of an
//! initial REST snapshot with incremental push events into a single
//! observable collection. Everything else is typed plumbing around the data
//! service and the push channel.

pub mod feed;
pub mod session;

pub use feed::engine::{FeedEngine, FeedPhase, FeedView};
pub use feed::error::ApiError;
pub use feed::http::{DataApiClient, HttpFeedApi, ImageUpload};
pub use feed::push::{PushEvent, WsPushChannel};
pub use feed::runtime::{FeedConfig, FeedHandle, FeedOrchestrator};
pub use session::{AuthToken, Session};
