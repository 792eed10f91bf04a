pub mod orchestrator;

#[cfg(test)]
mod tests;

pub use orchestrator::{FeedConfig, FeedHandle, FeedOrchestrator, SubscriptionId};
