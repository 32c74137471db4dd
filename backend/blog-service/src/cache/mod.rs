//! Redis-backed caching for the global post feed.

pub mod feed_cache;

pub use feed_cache::FeedCache;
