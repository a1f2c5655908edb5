use crate::{api::BrandingContext, metadata::PageMetadata};
use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetadataQuery {
    /// Page path the metadata is for, defaults to `/`
    path: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/metadata",
    params(MetadataQuery),
    responses (
        (status = 200, description = "Page metadata for the requesting tenant", body = PageMetadata),
    ),
    tag = "branding"
)]
// axum handler for metadata
pub async fn metadata(
    Extension(branding): Extension<Arc<BrandingContext>>,
    headers: HeaderMap,
    Query(query): Query<MetadataQuery>,
) -> Json<PageMetadata> {
    let record = branding.resolve(&headers).await;
    let path = query.path.as_deref().unwrap_or("/");
    Json(PageMetadata::new(&record, path))
}
