use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{normalize_name, Category, CategoryFilter};

/// Repository trait for Category persistence
///
/// Implementations enforce name uniqueness (trimmed, case-insensitive) and
/// slug uniqueness, reporting violations as `DuplicateName`/`DuplicateSlug`.
/// Every multi-record read is ordered by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Persist a new category
    async fn insert(&self, category: Category) -> CategoryResult<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    /// Get a category by slug
    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>>;

    /// Check whether another category already uses `name`, ignoring `exclude`
    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> CategoryResult<bool>;

    /// Categories matching `filter`
    async fn find_many(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>>;

    /// Categories whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> CategoryResult<Vec<Category>>;

    /// Every active category, for tree assembly
    async fn list_active(&self) -> CategoryResult<Vec<Category>>;

    /// Number of categories whose parent is `id`
    async fn count_children(&self, id: Uuid) -> CategoryResult<u64>;

    /// Overwrite an existing category
    async fn replace(&self, category: Category) -> CategoryResult<Category>;

    /// Delete a category by ID; `false` if it did not exist
    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        categories: &HashMap<Uuid, Category>,
        candidate: &Category,
    ) -> CategoryResult<()> {
        let key = normalize_name(&candidate.name);
        let others = categories.values().filter(|c| c.id != candidate.id);

        for other in others {
            if normalize_name(&other.name) == key {
                return Err(CategoryError::DuplicateName(candidate.name.clone()));
            }
            if other.slug == candidate.slug {
                return Err(CategoryError::DuplicateSlug(candidate.slug.clone()));
            }
        }
        Ok(())
    }

    fn sorted(mut categories: Vec<Category>) -> Vec<Category> {
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        Self::check_unique(&categories, &category)?;
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> CategoryResult<bool> {
        let key = normalize_name(name);
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .any(|c| Some(c.id) != exclude && normalize_name(&c.name) == key))
    }

    async fn find_many(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>> {
        let categories = self.categories.read().await;
        Ok(Self::sorted(
            categories
                .values()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> CategoryResult<Vec<Category>> {
        let categories = self.categories.read().await;
        Ok(Self::sorted(
            ids.iter().filter_map(|id| categories.get(id).cloned()).collect(),
        ))
    }

    async fn list_active(&self) -> CategoryResult<Vec<Category>> {
        self.find_many(CategoryFilter::active()).await
    }

    async fn count_children(&self, id: Uuid) -> CategoryResult<u64> {
        let categories = self.categories.read().await;
        Ok(categories.values().filter(|c| c.parent == Some(id)).count() as u64)
    }

    async fn replace(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if !categories.contains_key(&category.id) {
            return Err(CategoryError::NotFound(category.id.to_string()));
        }
        Self::check_unique(&categories, &category)?;
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let mut categories = self.categories.write().await;
        let removed = categories.remove(&id).is_some();
        if removed {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateCategory;

    fn category(name: &str) -> Category {
        Category::new(CreateCategory {
            name: name.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_insert_rejects_case_insensitive_duplicate_name() {
        let repo = InMemoryCategoryRepository::new();
        repo.insert(category("Shoes")).await.unwrap();

        let result = repo.insert(category("  SHOES ")).await;

        assert!(matches!(result, Err(CategoryError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let repo = InMemoryCategoryRepository::new();
        repo.insert(category("Home & Garden")).await.unwrap();

        let result = repo.insert(category("Home Garden")).await;

        assert!(matches!(result, Err(CategoryError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_exists_by_name_honours_exclude() {
        let repo = InMemoryCategoryRepository::new();
        let shoes = repo.insert(category("Shoes")).await.unwrap();

        assert!(repo.exists_by_name("shoes", None).await.unwrap());
        assert!(!repo.exists_by_name("shoes", Some(shoes.id)).await.unwrap());
        assert!(!repo.exists_by_name("boots", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_many_sorts_by_name() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Toys", "Books", "Garden"] {
            repo.insert(category(name)).await.unwrap();
        }

        let all = repo.find_many(CategoryFilter::default()).await.unwrap();

        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Garden", "Toys"]);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let repo = InMemoryCategoryRepository::new();

        let result = repo.replace(category("Ghost")).await;

        assert!(matches!(result, Err(CategoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let repo = InMemoryCategoryRepository::new();
        let shoes = repo.insert(category("Shoes")).await.unwrap();

        assert!(repo.delete(shoes.id).await.unwrap());
        assert!(!repo.delete(shoes.id).await.unwrap());
        assert!(repo.get_by_id(shoes.id).await.unwrap().is_none());
    }
}
