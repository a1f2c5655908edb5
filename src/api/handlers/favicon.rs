use crate::api::BrandingContext;
use axum::{
    extract::Extension,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};
use base64ct::{Base64, Encoding};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

pub const FALLBACK_FAVICON: &str = "/favicon.ico";
pub const FAVICON_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("data URI is not an image: {0}")]
    NotImage(String),
    #[error("invalid base64 payload: {0}")]
    Decode(String),
    #[error("empty image payload")]
    Empty,
}

/// Split a `data:image/<type>;base64,<payload>` URI into MIME type and bytes.
///
/// # Errors
/// Returns an error for anything that is not a non-empty base64 image.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotDataUri)?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|param| param.trim().eq_ignore_ascii_case("base64")) {
        return Err(DataUriError::NotBase64);
    }
    if !mime.starts_with("image/") {
        return Err(DataUriError::NotImage(mime));
    }

    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = Base64::decode_vec(&payload).map_err(|e| DataUriError::Decode(e.to_string()))?;
    if bytes.is_empty() {
        return Err(DataUriError::Empty);
    }

    Ok((mime, bytes))
}

/// Favicon response for a resolved logo reference.
#[must_use]
pub fn favicon_response(logo: &str) -> Response {
    if logo.starts_with("data:") {
        match decode_data_uri(logo) {
            Ok((mime, bytes)) => match HeaderValue::from_str(&mime) {
                Ok(content_type) => {
                    let mut headers = HeaderMap::new();
                    headers.insert(CONTENT_TYPE, content_type);
                    headers.insert(
                        CACHE_CONTROL,
                        HeaderValue::from_static(FAVICON_CACHE_CONTROL),
                    );
                    return (StatusCode::OK, headers, bytes).into_response();
                }
                Err(err) => error!("Invalid favicon content type {mime}: {err}"),
            },
            Err(err) => error!("Failed to decode favicon data URI: {err}"),
        }
    } else if logo.starts_with("http://") || logo.starts_with("https://") {
        // Redirect panics on values that are not valid header text.
        if HeaderValue::from_str(logo).is_ok() {
            return Redirect::temporary(logo).into_response();
        }
        error!("Logo URL is not a valid Location header: {logo}");
    }

    debug!("Serving fallback favicon");
    Redirect::temporary(FALLBACK_FAVICON).into_response()
}

#[utoipa::path(
    get,
    path = "/api/favicon",
    responses (
        (status = 200, description = "Tenant favicon decoded from an inline data URI", content_type = "image/*"),
        (status = 307, description = "Redirect to the tenant logo URL or the fallback favicon"),
    ),
    tag = "branding"
)]
// axum handler for favicon
pub async fn favicon(
    Extension(branding): Extension<Arc<BrandingContext>>,
    headers: HeaderMap,
) -> Response {
    let record = branding.resolve(&headers).await;
    favicon_response(&record.logo_url)
}
