//! Concrete position providers.

mod feed;
mod fixed;
mod unsupported;

pub use feed::{FeedProvider, PositionFeed};
pub use fixed::FixedProvider;
pub use unsupported::UnsupportedProvider;
