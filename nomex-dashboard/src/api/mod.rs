mod client;
mod error;
mod store;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use store::FeedApi;
