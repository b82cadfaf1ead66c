//! Category Service - hierarchy rules on top of a CategoryRepository

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{
    Category, CategoryDetail, CategoryFilter, CategoryQuery, CategoryWithParent, CreateCategory,
    ParentSummary, TreeNode, UpdateCategory,
};
use crate::repository::CategoryRepository;
use crate::slug::derive_slug;
use crate::tree::build_tree;

/// Category service providing the hierarchy operations
///
/// Enforces name/slug uniqueness, parent existence and acyclicity before
/// anything reaches the repository.
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new category
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let category = Category::new(input);
        if category.slug.is_empty() {
            return Err(CategoryError::Validation(
                "Category name must contain at least one letter or digit".to_string(),
            ));
        }

        if self
            .repository
            .exists_by_name(&category.name, None)
            .await?
        {
            return Err(CategoryError::DuplicateName(category.name));
        }

        if let Some(parent_id) = category.parent {
            if self.repository.get_by_id(parent_id).await?.is_none() {
                return Err(CategoryError::ParentNotFound(parent_id));
            }
        }

        if self.repository.get_by_slug(&category.slug).await?.is_some() {
            return Err(CategoryError::DuplicateSlug(category.slug));
        }

        let category = self.repository.insert(category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// List categories with their parent resolved, ordered by name
    #[instrument(skip(self))]
    pub async fn list(&self, query: CategoryQuery) -> CategoryResult<Vec<CategoryWithParent>> {
        let filter = CategoryFilter::try_from(query)?;
        let categories = self.repository.find_many(filter).await?;
        self.resolve_parents(categories).await
    }

    /// Nested tree of active categories
    #[instrument(skip(self))]
    pub async fn get_tree(&self) -> CategoryResult<Vec<TreeNode>> {
        let active = self.repository.list_active().await?;
        Ok(build_tree(active))
    }

    /// Look up by id first, then by slug
    #[instrument(skip(self))]
    pub async fn get_by_identifier_or_slug(&self, identifier: &str) -> CategoryResult<CategoryDetail> {
        let by_id = match Uuid::parse_str(identifier) {
            Ok(id) => self.repository.get_by_id(id).await?,
            Err(_) => None,
        };

        let category = match by_id {
            Some(category) => category,
            None => self
                .repository
                .get_by_slug(identifier)
                .await?
                .ok_or_else(|| CategoryError::NotFound(identifier.to_string()))?,
        };

        let parent = match category.parent {
            Some(parent_id) => self
                .repository
                .get_by_id(parent_id)
                .await?
                .as_ref()
                .map(ParentSummary::from),
            None => None,
        };

        let subcategories = self
            .repository
            .find_many(CategoryFilter::children_of(category.id))
            .await?;

        Ok(CategoryDetail {
            category: CategoryWithParent::new(category, parent),
            subcategories,
        })
    }

    /// Update a category; omitted fields are left as they are
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let mut category = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;

        if let Some(new_parent) = input.parent {
            if new_parent != category.parent {
                if let Some(parent_id) = new_parent {
                    self.check_reparent(id, parent_id).await?;
                }
            }
        }

        if let Some(ref name) = input.name {
            let name = name.trim();
            if name != category.name {
                self.check_rename(id, name).await?;
            }
        }

        category.apply_update(input);
        let category = self.repository.replace(category).await?;

        tracing::info!(slug = %category.slug, parent = ?category.parent, "Category updated");
        Ok(category)
    }

    /// Delete a category that has no children
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: Uuid) -> CategoryResult<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(CategoryError::NotFound(id.to_string()));
        }

        let children = self.repository.count_children(id).await?;
        if children > 0 {
            tracing::warn!(children, "Refusing to delete category with subcategories");
            return Err(CategoryError::HasChildren(children));
        }

        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id.to_string()));
        }

        tracing::info!("Category deleted");
        Ok(())
    }

    /// `parent_id` must exist, differ from `id`, and not sit below `id`.
    async fn check_reparent(&self, id: Uuid, parent_id: Uuid) -> CategoryResult<()> {
        if parent_id == id {
            tracing::warn!("Rejected self-parenting");
            return Err(CategoryError::SelfParent);
        }

        let parent = self
            .repository
            .get_by_id(parent_id)
            .await?
            .ok_or(CategoryError::ParentNotFound(parent_id))?;

        // Walk up from the proposed parent. Reaching `id` means the move would
        // close a cycle; a repeated node means the stored data already has one.
        let mut visited = HashSet::from([parent_id]);
        let mut current = parent.parent;
        while let Some(ancestor_id) = current {
            if ancestor_id == id {
                tracing::warn!(%parent_id, "Rejected move under a descendant");
                return Err(CategoryError::CircularReference);
            }
            if !visited.insert(ancestor_id) {
                tracing::warn!(%ancestor_id, "Existing parent chain loops");
                return Err(CategoryError::CircularReference);
            }
            current = self
                .repository
                .get_by_id(ancestor_id)
                .await?
                .and_then(|ancestor| ancestor.parent);
        }

        Ok(())
    }

    /// A new `name` must be unique among other categories and yield a free slug.
    async fn check_rename(&self, id: Uuid, name: &str) -> CategoryResult<()> {
        if self.repository.exists_by_name(name, Some(id)).await? {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }

        let slug = derive_slug(name);
        if slug.is_empty() {
            return Err(CategoryError::Validation(
                "Category name must contain at least one letter or digit".to_string(),
            ));
        }
        if let Some(existing) = self.repository.get_by_slug(&slug).await? {
            if existing.id != id {
                return Err(CategoryError::DuplicateSlug(slug));
            }
        }
        Ok(())
    }

    /// Attach `{id, name, slug}` of each category's parent, fetched in one query
    async fn resolve_parents(
        &self,
        categories: Vec<Category>,
    ) -> CategoryResult<Vec<CategoryWithParent>> {
        let parent_ids: Vec<Uuid> = categories
            .iter()
            .filter_map(|c| c.parent)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let parents: HashMap<Uuid, ParentSummary> = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            self.repository
                .find_by_ids(parent_ids)
                .await?
                .iter()
                .map(|p| (p.id, ParentSummary::from(p)))
                .collect()
        };

        Ok(categories
            .into_iter()
            .map(|c| {
                let parent = c.parent.and_then(|id| parents.get(&id).cloned());
                CategoryWithParent::new(c, parent)
            })
            .collect())
    }
}
