use crate::{
    branding::{host_without_port, resolve_branding_for_host, BrandingClient, BrandingRecord},
    cli::globals::GlobalArgs,
    guard::route_guard,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::HOST, HeaderMap, HeaderName, HeaderValue, Request},
    middleware,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer,
    services::{ServeDir, ServeFile},
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;

use handlers::{
    favicon::{self, FALLBACK_FAVICON},
    health, metadata, page,
};

#[derive(OpenApi)]
#[openapi(
    paths(favicon::favicon, metadata::metadata, health::health),
    components(schemas(crate::metadata::PageMetadata, health::Health)),
    tags(
        (name = "branding", description = "Tenant branding"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Branding lookups shared by the handlers.
#[derive(Debug)]
pub struct BrandingContext {
    client: BrandingClient,
    default_tenant: String,
}

impl BrandingContext {
    #[must_use]
    pub fn new(client: BrandingClient, default_tenant: String) -> Self {
        Self {
            client,
            default_tenant,
        }
    }

    /// Resolve branding for the host the request was addressed to.
    pub async fn resolve(&self, headers: &HeaderMap) -> BrandingRecord {
        let hostname = request_hostname(headers);
        resolve_branding_for_host(&self.client, &hostname, &self.default_tenant).await
    }
}

fn request_hostname(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "localhost".to_string(), host_without_port)
}

/// Build the application router: pages behind the route guard, API routes,
/// static assets, health and the OpenAPI docs.
///
/// # Errors
/// Returns an error if the backend base URL is invalid.
pub fn router(globals: &GlobalArgs) -> Result<Router> {
    let client = BrandingClient::new(&globals.api_base_url)
        .with_context(|| format!("Invalid API base URL: {}", globals.api_base_url))?;
    let branding = Arc::new(BrandingContext::new(
        client,
        globals.default_tenant.clone(),
    ));
    let guard = Arc::new(globals.guard.clone());

    Ok(Router::new()
        .route("/api/favicon", get(favicon::favicon))
        .route("/api/metadata", get(metadata::metadata))
        .route("/health", get(health::health))
        .route_service(
            FALLBACK_FAVICON,
            ServeFile::new(globals.static_dir.join("favicon.ico")),
        )
        .nest_service("/images", ServeDir::new(globals.static_dir.join("images")))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .fallback(page::page)
        .layer(middleware::from_fn_with_state(guard, route_guard))
        .layer(Extension(branding)))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, globals: &GlobalArgs) -> Result<()> {
    let app = router(globals)?.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_from_host_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_hostname(&headers), "localhost");

        headers.insert(HOST, HeaderValue::from_static("Admin.Example.com:8443"));
        assert_eq!(request_hostname(&headers), "admin.example.com");
    }

    #[test]
    fn openapi_lists_branding_routes() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/api/favicon"));
        assert!(doc.paths.paths.contains_key("/api/metadata"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
