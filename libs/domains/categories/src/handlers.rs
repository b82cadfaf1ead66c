//! HTTP handlers for Categories API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestRuleResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    ApiResponse, QueryParams, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{
    Category, CategoryDetail, CategoryQuery, CategoryWithParent, CreateCategory, ParentSummary,
    TreeNode, UpdateCategory,
};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category_tree,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(
            Category, CreateCategory, UpdateCategory, CategoryQuery,
            CategoryWithParent, CategoryDetail, ParentSummary, TreeNode
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            BadRequestRuleResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category hierarchy management")
    )
)]
pub struct ApiDoc;

/// Create the categories router with all HTTP endpoints
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/tree", get(get_category_tree))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// List categories with their parent resolved
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Categories ordered by name", body = ApiResponse<Vec<CategoryWithParent>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    QueryParams(query): QueryParams<CategoryQuery>,
) -> CategoryResult<Json<ApiResponse<Vec<CategoryWithParent>>>> {
    let categories = service.list(query).await?;
    Ok(Json(ApiResponse::list(categories)))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, response = BadRequestRuleResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// Nested tree of active categories
#[utoipa::path(
    get,
    path = "/tree",
    tag = "Categories",
    responses(
        (status = 200, description = "Root categories with nested children", body = ApiResponse<Vec<TreeNode>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_tree<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<ApiResponse<Vec<TreeNode>>>> {
    let tree = service.get_tree().await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// Get a category by ID or slug
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ID or slug")
    ),
    responses(
        (status = 200, description = "Category with parent and subcategories", body = ApiResponse<CategoryDetail>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    Path(identifier): Path<String>,
) -> CategoryResult<Json<ApiResponse<CategoryDetail>>> {
    let detail = service.get_by_identifier_or_slug(&identifier).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 400, response = BadRequestRuleResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<ApiResponse<Category>>> {
    let category = service.update(id, input).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// Delete a category without subcategories
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted; `data` is null"),
        (status = 400, response = BadRequestRuleResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
) -> CategoryResult<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(
        ApiResponse::ok(()).with_message("Category deleted successfully"),
    ))
}
