//! Best-stories aggregation over the Hacker News API.
//!
//! [`service::HackerNewsService`] fetches the current ranking, resolves the
//! top ids concurrently through a TTL cache and returns them sorted by score.
//! [`api`] exposes that as an HTTP endpoint.

pub mod api;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod hn_client;
pub mod logging;
pub mod models;
pub mod service;
pub mod shutdown;

pub use cache::ItemCache;
pub use cancel::CancelToken;
pub use error::{Result, StoriesError};
pub use fetcher::ItemFetcher;
pub use hn_client::{HackerNewsApi, HackerNewsClient};
pub use models::{ItemId, ItemRecord, StoryDto};
pub use service::{HackerNewsService, PartialFailurePolicy};
