//! Infrastructure shared by every domain: transport, configuration, time
//! and test support.

pub mod adapters;
pub mod api_client;
pub mod config;
pub mod repository;
pub mod routes;
pub mod services;
pub mod time;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used items
pub use adapters::ApiClientAdapter;
pub use api_client::ApiClient;
pub use config::Config;
pub use time::{TimeProvider, TokioTimeProvider};
