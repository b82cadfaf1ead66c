//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{Collation, CollationStrength, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{duplicate_key_message, CategoryError, CategoryResult};
use crate::models::{Category, CategoryFilter};
use crate::repository::CategoryRepository;

const NAME_INDEX: &str = "idx_name_unique";
const SLUG_INDEX: &str = "idx_slug_unique";

/// MongoDB implementation of the CategoryRepository
pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Category>("categories");
        Self { collection }
    }

    /// Create a new MongoCategoryRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Category>(collection_name);
        Self { collection }
    }

    /// Case-insensitive comparison used for name uniqueness
    fn name_collation() -> Collation {
        Collation::builder()
            .locale("en".to_string())
            .strength(CollationStrength::Secondary)
            .build()
    }

    /// Create the uniqueness and lookup indexes
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let indexes = vec![
            // Names are stored trimmed, so a case-insensitive unique index
            // enforces the normalised-name rule
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .collation(Self::name_collation())
                        .name(NAME_INDEX.to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(SLUG_INDEX.to_string())
                        .build(),
                )
                .build(),
            // Children lookups and list filtering
            IndexModel::builder()
                .keys(doc! { "parent": 1, "name": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_parent_name".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "isActive": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_is_active".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Category> {
        &self.collection
    }

    fn id_bson(id: &Uuid) -> CategoryResult<Bson> {
        to_bson(id).map_err(|e| CategoryError::Internal(format!("Failed to encode id: {}", e)))
    }

    /// Build a MongoDB filter document from CategoryFilter
    fn build_filter(filter: &CategoryFilter) -> CategoryResult<Document> {
        let mut doc = doc! {};

        match filter.parent {
            None => {}
            Some(None) => {
                doc.insert("parent", Bson::Null);
            }
            Some(Some(id)) => {
                doc.insert("parent", Self::id_bson(&id)?);
            }
        }

        if let Some(active) = filter.is_active {
            doc.insert("isActive", active);
        }

        Ok(doc)
    }

    async fn find_sorted(&self, filter: Document) -> CategoryResult<Vec<Category>> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "name": 1 })
            .await?;
        let categories: Vec<Category> = cursor.try_collect().await?;
        Ok(categories)
    }

    /// Map a unique index violation to the matching domain error
    fn map_write_error(err: mongodb::error::Error, category: &Category) -> CategoryError {
        match duplicate_key_message(&err) {
            Some(msg) => Self::duplicate_error(msg, category),
            None => err.into(),
        }
    }

    /// Pick the clashing field from an E11000 message, which names the index
    fn duplicate_error(message: &str, category: &Category) -> CategoryError {
        if message.contains(SLUG_INDEX) {
            CategoryError::DuplicateSlug(category.slug.clone())
        } else {
            CategoryError::DuplicateName(category.name.clone())
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(category_id = %category.id, category_name = %category.name))]
    async fn insert(&self, category: Category) -> CategoryResult<Category> {
        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| Self::map_write_error(e, &category))?;

        tracing::info!("Category inserted");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let filter = doc! { "_id": Self::id_bson(&id)? };
        let category = self.collection.find_one(filter).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>> {
        let filter = doc! { "slug": slug };
        let category = self.collection.find_one(filter).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> CategoryResult<bool> {
        let mut filter = doc! { "name": name.trim() };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": Self::id_bson(&id)? });
        }

        let count = self
            .collection
            .count_documents(filter)
            .collation(Self::name_collation())
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>> {
        let mongo_filter = Self::build_filter(&filter)?;
        self.find_sorted(mongo_filter).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> CategoryResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids
            .iter()
            .map(Self::id_bson)
            .collect::<CategoryResult<Vec<_>>>()?;
        self.find_sorted(doc! { "_id": { "$in": ids } }).await
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> CategoryResult<Vec<Category>> {
        let filter = Self::build_filter(&CategoryFilter::active())?;
        let cursor = self.collection.find(filter).await?;
        let categories: Vec<Category> = cursor.try_collect().await?;
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn count_children(&self, id: Uuid) -> CategoryResult<u64> {
        let filter = doc! { "parent": Self::id_bson(&id)? };
        let count = self.collection.count_documents(filter).await?;
        Ok(count)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn replace(&self, category: Category) -> CategoryResult<Category> {
        let filter = doc! { "_id": Self::id_bson(&category.id)? };
        let result = self
            .collection
            .replace_one(filter, &category)
            .await
            .map_err(|e| Self::map_write_error(e, &category))?;

        if result.matched_count == 0 {
            return Err(CategoryError::NotFound(category.id.to_string()));
        }

        tracing::info!("Category replaced");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let filter = doc! { "_id": Self::id_bson(&id)? };
        let result = self.collection.delete_one(filter).await?;

        if result.deleted_count > 0 {
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoCategoryRepository::build_filter(&CategoryFilter::default()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_roots_matches_null_parent() {
        let filter = CategoryFilter {
            parent: Some(None),
            is_active: None,
        };
        let doc = MongoCategoryRepository::build_filter(&filter).unwrap();
        assert_eq!(doc.get("parent"), Some(&Bson::Null));
    }

    #[test]
    fn test_build_filter_children_and_active() {
        let id = Uuid::now_v7();
        let filter = CategoryFilter {
            parent: Some(Some(id)),
            is_active: Some(false),
        };
        let doc = MongoCategoryRepository::build_filter(&filter).unwrap();
        assert_eq!(doc.get("parent"), Some(&to_bson(&id).unwrap()));
        assert!(!doc.get_bool("isActive").unwrap());
    }

    #[test]
    fn test_parent_field_encodes_like_id() {
        let parent = Uuid::now_v7();
        let category = Category::new(crate::models::CreateCategory {
            name: "Boots".into(),
            parent: Some(parent),
            ..Default::default()
        });

        let stored = mongodb::bson::to_document(&category).unwrap();

        assert_eq!(stored.get("parent"), Some(&to_bson(&parent).unwrap()));
        assert!(stored.contains_key("_id"));
        assert!(stored.contains_key("isActive"));
    }

    #[test]
    fn test_duplicate_key_on_slug_index_is_duplicate_slug() {
        let category = Category::new(crate::models::CreateCategory {
            name: "Men's Shoes".into(),
            ..Default::default()
        });
        let message = "E11000 duplicate key error collection: catalog.categories \
            index: idx_slug_unique dup key: { slug: \"mens-shoes\" }";

        let err = MongoCategoryRepository::duplicate_error(message, &category);

        assert!(matches!(err, CategoryError::DuplicateSlug(ref slug) if slug == "mens-shoes"));
        assert_eq!(err.to_string(), "Category with slug 'mens-shoes' already exists");
    }

    #[test]
    fn test_duplicate_key_on_name_index_is_duplicate_name() {
        let category = Category::new(crate::models::CreateCategory {
            name: "Shoes".into(),
            ..Default::default()
        });
        let message = "E11000 duplicate key error collection: catalog.categories \
            index: idx_name_unique collation: { locale: \"en\", strength: 2 } \
            dup key: { name: \"SHOES\" }";

        let err = MongoCategoryRepository::duplicate_error(message, &category);

        assert!(matches!(err, CategoryError::DuplicateName(ref name) if name == "Shoes"));
    }

    /// Requires a running MongoDB (`MONGODB_URL`, default localhost)
    #[tokio::test]
    #[ignore]
    async fn test_unique_name_index_is_case_insensitive() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&url).await.unwrap();
        let db = client.database("catalog_test");
        let repo = MongoCategoryRepository::with_collection(
            &db,
            &format!("categories_{}", Uuid::now_v7().simple()),
        );
        repo.init_indexes().await.unwrap();

        let shoes = Category::new(crate::models::CreateCategory {
            name: "Shoes".into(),
            ..Default::default()
        });
        repo.insert(shoes.clone()).await.unwrap();

        assert!(repo.exists_by_name(" SHOES ", None).await.unwrap());
        assert!(!repo.exists_by_name("shoes", Some(shoes.id)).await.unwrap());

        let clash = Category::new(crate::models::CreateCategory {
            name: "SHOES".into(),
            ..Default::default()
        });
        // Both unique indexes clash here; the server reports whichever it checks first
        let result = repo.insert(clash).await;
        assert!(matches!(
            result,
            Err(CategoryError::DuplicateName(_) | CategoryError::DuplicateSlug(_))
        ));

        let found = repo.get_by_id(shoes.id).await.unwrap().unwrap();
        assert_eq!(found.slug, "shoes");

        repo.collection().drop().await.unwrap();
    }
}
