mod requests_logging;
pub use requests_logging::{log_requests, RequestsLoggingLevel};

#[cfg(feature = "slowdown")]
pub mod random_slowdown;
