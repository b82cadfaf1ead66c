//! Query string extractor with JSON rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Like [`Query`], but a malformed query string is rejected as
/// `QUERY_EXTRACTION` in the standard error body.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::QueryParams;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Filter {
///     active: Option<bool>,
/// }
///
/// async fn list(QueryParams(filter): QueryParams<Filter>) -> String {
///     format!("{:?}", filter.active)
/// }
///
/// let app = Router::new().route("/categories", get(list));
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|e| AppError::from(e).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, Bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Filter {
        active: Option<bool>,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            get(|QueryParams(f): QueryParams<Filter>| async move { format!("{:?}", f.active) }),
        )
    }

    async fn get_uri(uri: &str) -> (StatusCode, Bytes) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, response.into_body().collect().await.unwrap().to_bytes())
    }

    #[tokio::test]
    async fn test_well_formed_query_passes() {
        let (status, body) = get_uri("/?active=false").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Some(false)");
    }

    #[tokio::test]
    async fn test_malformed_query_renders_json_error() {
        let (status, body) = get_uri("/?active=yes").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "QUERY_EXTRACTION");
        assert_eq!(body["code"], 1006);
        assert!(body["message"].as_str().unwrap().contains("active"));
    }
}
