pub mod client;
pub mod error;
pub mod rate_limit;

pub use client::{FetchClient, FetchConfig};
pub use error::FetchError;
pub use rate_limit::RateLimiter;
