//! Custom extractors for Axum handlers.
//!
//! Rejections render through [`AppError`](crate::errors::AppError), so every
//! extractor failure has the same JSON shape as a handler failure.

pub mod query_params;
pub mod uuid_path;
pub mod validated_json;

pub use query_params::QueryParams;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
