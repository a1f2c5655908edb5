use crate::{api::BrandingContext, guard::guard_applies, metadata::PageMetadata};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Page shell for every route the guard lets through. The portal frontend
/// mounts into `#root`; the head carries the tenant's metadata.
///
/// Asset and API prefixes the guard skips are never pages, so unmatched
/// requests there get a plain 404 without a branding lookup.
pub async fn page(
    Extension(branding): Extension<Arc<BrandingContext>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if !guard_applies(uri.path()) {
        debug!("No asset or API route for {}", uri.path());
        return StatusCode::NOT_FOUND.into_response();
    }

    let record = branding.resolve(&headers).await;
    let metadata = PageMetadata::new(&record, uri.path());
    Html(render_shell(&metadata)).into_response()
}

#[must_use]
pub fn render_shell(metadata: &PageMetadata) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<meta name=\"description\" content=\"{description}\">\n",
            "<link rel=\"icon\" href=\"/api/favicon\">\n",
            "<link rel=\"apple-touch-icon\" href=\"{icon}\">\n",
            "</head>\n",
            "<body><div id=\"root\"></div></body>\n",
            "</html>\n"
        ),
        title = escape_html(&metadata.title),
        description = escape_html(&metadata.description),
        icon = escape_html(&metadata.icon),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_escapes_tenant_values() {
        let html = render_shell(&PageMetadata {
            title: "Deals <b>& more</b>".to_string(),
            description: "\"quoted\"".to_string(),
            icon: "https://cdn.example.com/a.png".to_string(),
        });
        assert!(html.contains("<title>Deals &lt;b&gt;&amp; more&lt;/b&gt;</title>"));
        assert!(html.contains("content=\"&quot;quoted&quot;\""));
        assert!(html.contains("href=\"https://cdn.example.com/a.png\""));
    }
}
