// Application layer - Use cases and the polling worker
pub mod feed_source;
pub mod highlight_resolver;
pub mod poller;
