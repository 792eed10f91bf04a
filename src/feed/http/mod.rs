pub mod client;
pub mod facade;

pub use client::{DataApiClient, ImageUpload};
pub use facade::HttpFeedApi;
