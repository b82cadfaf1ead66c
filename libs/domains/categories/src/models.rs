use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{CategoryError, CategoryResult};
use crate::slug::derive_slug;

/// Maximum length of a category name, counted after trimming
pub const MAX_NAME_LEN: usize = 50;

/// Literal `parent` query value selecting root categories
pub const ROOT_MARKER: &str = "null";

/// Category entity - a node of the catalog hierarchy stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Display name, stored trimmed
    pub name: String,
    /// URL-safe identifier derived from the name
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Parent category; `null` for roots
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(max = 100, message = "Meta title cannot exceed 100 characters"))]
    #[serde(default)]
    pub meta_title: Option<String>,
    #[validate(length(max = 200, message = "Meta description cannot exceed 200 characters"))]
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// DTO for updating a category. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// Omitted: unchanged. `null`: make root. An id: move under that category.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent: Option<Option<Uuid>>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(max = 100, message = "Meta title cannot exceed 100 characters"))]
    pub meta_title: Option<String>,
    #[validate(length(max = 200, message = "Meta description cannot exceed 200 characters"))]
    pub meta_description: Option<String>,
}

/// Query string accepted by the list endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct CategoryQuery {
    /// Parent category id, or `null` for root categories only
    pub parent: Option<String>,
    /// Filter by activity flag
    pub active: Option<bool>,
}

/// Store-level filter for [`find_many`](crate::repository::CategoryRepository::find_many)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// `None`: any parent. `Some(None)`: roots only. `Some(Some(id))`: children of `id`.
    pub parent: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

impl CategoryFilter {
    pub fn children_of(id: Uuid) -> Self {
        Self {
            parent: Some(Some(id)),
            is_active: None,
        }
    }

    pub fn active() -> Self {
        Self {
            parent: None,
            is_active: Some(true),
        }
    }

    /// In-memory equivalent of the store query
    pub fn matches(&self, category: &Category) -> bool {
        if let Some(parent) = self.parent {
            if category.parent != parent {
                return false;
            }
        }
        if let Some(active) = self.is_active {
            if category.is_active != active {
                return false;
            }
        }
        true
    }
}

impl TryFrom<CategoryQuery> for CategoryFilter {
    type Error = CategoryError;

    fn try_from(query: CategoryQuery) -> CategoryResult<Self> {
        let parent = match query.parent.as_deref() {
            None => None,
            Some(ROOT_MARKER) => Some(None),
            Some(raw) => Some(Some(Uuid::parse_str(raw).map_err(|_| {
                CategoryError::Validation(format!(
                    "parent must be a category id or '{}', got '{}'",
                    ROOT_MARKER, raw
                ))
            })?)),
        };

        Ok(Self {
            parent,
            is_active: query.active,
        })
    }
}

/// Parent reference resolved for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParentSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for ParentSummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Category with its `parent` reference resolved to a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithParent {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// `null` for roots, or when the referenced parent no longer exists
    pub parent: Option<ParentSummary>,
    pub image: Option<String>,
    pub is_active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryWithParent {
    pub fn new(category: Category, parent: Option<ParentSummary>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            parent,
            image: category.image,
            is_active: category.is_active,
            meta_title: category.meta_title,
            meta_description: category.meta_description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Single-category view: resolved parent plus direct children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: CategoryWithParent,
    /// Direct children in every activity state, ordered by name
    pub subcategories: Vec<Category>,
}

/// Display node of the active category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TreeNode {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    #[schema(no_recursion)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            image: category.image,
            children: Vec::new(),
        }
    }
}

fn default_active() -> bool {
    true
}

/// Deserialize a present-but-null field as `Some(None)`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Category name is required")));
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Category name cannot exceed 50 characters")));
    }
    Ok(())
}

/// Key used for name uniqueness: trimmed and case-folded
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl Category {
    /// Create a new root-or-child category from CreateCategory DTO
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        let name = input.name.trim().to_string();
        Self {
            id: Uuid::now_v7(),
            slug: derive_slug(&name),
            name,
            description: trimmed(input.description),
            parent: input.parent,
            image: input.image,
            is_active: true,
            meta_title: trimmed(input.meta_title),
            meta_description: trimmed(input.meta_description),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateCategory DTO.
    ///
    /// Recomputes the slug only when the name actually changes. Hierarchy
    /// checks on `parent` are the caller's job.
    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name != self.name {
                self.slug = derive_slug(&name);
                self.name = name;
            }
        }
        if let Some(description) = update.description {
            self.description = Some(description.trim().to_string());
        }
        if let Some(parent) = update.parent {
            self.parent = parent;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(meta_title) = update.meta_title {
            self.meta_title = Some(meta_title.trim().to_string());
        }
        if let Some(meta_description) = update.meta_description {
            self.meta_description = Some(meta_description.trim().to_string());
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(name: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_trims_name_and_derives_slug() {
        let category = Category::new(create("  Men's Shoes!! "));

        assert_eq!(category.name, "Men's Shoes!!");
        assert_eq!(category.slug, "mens-shoes");
        assert!(category.is_active);
        assert!(category.parent.is_none());
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn test_serializes_camel_case_with_mongo_id() {
        let category = Category::new(create("Shoes"));
        let value = serde_json::to_value(&category).unwrap();

        assert!(value.get("_id").is_some());
        assert_eq!(value["isActive"], json!(true));
        assert_eq!(value["parent"], json!(null));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("is_active").is_none());
    }

    #[test]
    fn test_name_validation_counts_trimmed_chars() {
        assert!(create("Shoes").validate().is_ok());
        assert!(create("   ").validate().is_err());
        assert!(create(&"x".repeat(MAX_NAME_LEN)).validate().is_ok());
        assert!(create(&"x".repeat(MAX_NAME_LEN + 1)).validate().is_err());
        assert!(create(&format!("  {}  ", "x".repeat(MAX_NAME_LEN)))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_optional_field_limits() {
        let input = CreateCategory {
            meta_title: Some("t".repeat(101)),
            ..create("Shoes")
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("meta_title"));
    }

    #[test]
    fn test_update_parent_is_tri_state() {
        let omitted: UpdateCategory = serde_json::from_value(json!({"name": "X"})).unwrap();
        assert_eq!(omitted.parent, None);

        let null: UpdateCategory = serde_json::from_value(json!({"parent": null})).unwrap();
        assert_eq!(null.parent, Some(None));

        let id = Uuid::now_v7();
        let set: UpdateCategory = serde_json::from_value(json!({"parent": id})).unwrap();
        assert_eq!(set.parent, Some(Some(id)));
    }

    #[test]
    fn test_apply_update_keeps_omitted_fields() {
        let mut category = Category::new(CreateCategory {
            description: Some("All shoes".into()),
            ..create("Shoes")
        });
        let before = category.clone();

        category.apply_update(UpdateCategory {
            is_active: Some(false),
            ..Default::default()
        });

        assert!(!category.is_active);
        assert_eq!(category.name, before.name);
        assert_eq!(category.slug, before.slug);
        assert_eq!(category.description, before.description);
        assert!(category.updated_at >= before.updated_at);
    }

    #[test]
    fn test_apply_update_recomputes_slug_on_rename() {
        let mut category = Category::new(create("Shoes"));

        category.apply_update(UpdateCategory {
            name: Some(" Running Shoes ".into()),
            ..Default::default()
        });

        assert_eq!(category.name, "Running Shoes");
        assert_eq!(category.slug, "running-shoes");
    }

    #[test]
    fn test_apply_update_null_parent_makes_root() {
        let mut category = Category::new(CreateCategory {
            parent: Some(Uuid::now_v7()),
            ..create("Boots")
        });

        category.apply_update(UpdateCategory {
            parent: Some(None),
            ..Default::default()
        });

        assert!(category.parent.is_none());
    }

    #[test]
    fn test_filter_from_query() {
        let roots = CategoryFilter::try_from(CategoryQuery {
            parent: Some("null".into()),
            active: Some(true),
        })
        .unwrap();
        assert_eq!(roots.parent, Some(None));
        assert_eq!(roots.is_active, Some(true));

        let id = Uuid::now_v7();
        let children = CategoryFilter::try_from(CategoryQuery {
            parent: Some(id.to_string()),
            active: None,
        })
        .unwrap();
        assert_eq!(children, CategoryFilter::children_of(id));

        let bad = CategoryFilter::try_from(CategoryQuery {
            parent: Some("shoes".into()),
            active: None,
        });
        assert!(matches!(bad, Err(CategoryError::Validation(_))));
    }

    #[test]
    fn test_filter_matches() {
        let parent = Category::new(create("Shoes"));
        let child = Category::new(CreateCategory {
            parent: Some(parent.id),
            ..create("Boots")
        });

        assert!(CategoryFilter::default().matches(&child));
        assert!(CategoryFilter::children_of(parent.id).matches(&child));
        assert!(!CategoryFilter::children_of(parent.id).matches(&parent));
        assert!(CategoryFilter {
            parent: Some(None),
            is_active: None
        }
        .matches(&parent));
    }

    #[test]
    fn test_detail_flattens_category() {
        let category = Category::new(create("Shoes"));
        let detail = CategoryDetail {
            category: CategoryWithParent::new(category, None),
            subcategories: vec![],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["name"], "Shoes");
        assert_eq!(value["subcategories"], json!([]));
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  SHOES "), normalize_name("shoes"));
    }
}
