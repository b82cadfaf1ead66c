//! Categories API routes

use axum::Router;
use domain_categories::{handlers, CategoryService, MongoCategoryRepository};

use crate::state::AppState;

/// Create categories router
pub fn router(state: &AppState) -> Router {
    let repository = MongoCategoryRepository::new(&state.db);
    let service = CategoryService::new(repository);
    handlers::router(service)
}

/// Initialize category indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoCategoryRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
