//! Categories Domain
//!
//! Hierarchical product categories stored in MongoDB: each category may
//! reference a parent, names and slugs are unique, and the parent graph is
//! kept acyclic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, `{success, data}` envelope
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Uniqueness, parent and cycle checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, slug and tree helpers
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{
//!     handlers,
//!     mongodb::MongoCategoryRepository,
//!     service::CategoryService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoCategoryRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = CategoryService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod slug;
pub mod tree;

// Re-export commonly used types
pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use models::{
    Category, CategoryDetail, CategoryFilter, CategoryQuery, CategoryWithParent, CreateCategory,
    ParentSummary, TreeNode, UpdateCategory,
};
pub use mongodb::MongoCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
pub use slug::derive_slug;
pub use tree::build_tree;
