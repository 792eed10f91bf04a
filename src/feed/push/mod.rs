pub mod channel;
pub mod envelope;

pub use channel::WsPushChannel;
pub use envelope::PushEvent;
