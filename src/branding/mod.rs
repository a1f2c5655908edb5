//! Tenant branding: hostname → tenant key → `ui-settings` lookup → record.
//!
//! Internals return [`BrandingError`]; only the public entry points
//! ([`resolve_branding_for_host`], [`store::CachedBrandingResolver::resolve`])
//! swallow errors, log them, and hand back [`BrandingRecord::default`].

pub mod client;
pub mod document;
pub mod fields;
pub mod store;

pub use client::{resolve_branding_for_host, BrandingClient, BrandingSource};
pub use store::{CachedBrandingResolver, MemoryBrandingStore};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_BRAND_NAME: &str = "Wholesaler Portal";
pub const DEFAULT_LOGO_URL: &str = "/images/default-logo.png";
pub const DEFAULT_LOOKUP_KEY: &str = "travelportal.com";

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

static REGISTRABLE_DOMAIN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[^.]+\.[^.]+$").ok());

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandingRecord {
    pub name: String,
    pub logo_url: String,
    pub nav_logo_url: String,
}

impl Default for BrandingRecord {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRAND_NAME.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            nav_logo_url: DEFAULT_LOGO_URL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BrandingError {
    #[error("branding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("branding service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid branding response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("branding service reported failure")]
    Unsuccessful,
    #[error("branding response has no data")]
    MissingData,
    #[error("invalid branding endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// Tenant key for a hostname, using [`DEFAULT_LOOKUP_KEY`] for loopback hosts.
#[must_use]
pub fn derive_lookup_key(hostname: &str) -> String {
    derive_lookup_key_or(hostname, DEFAULT_LOOKUP_KEY)
}

/// Tenant key for a hostname: loopback hosts map to `default_key`, everything
/// else to its right-most `label.tld`, or the hostname itself when it has no dot.
#[must_use]
pub fn derive_lookup_key_or(hostname: &str, default_key: &str) -> String {
    if LOOPBACK_HOSTS.contains(&hostname) {
        return default_key.to_string();
    }

    REGISTRABLE_DOMAIN
        .as_ref()
        .and_then(|re| re.find(hostname))
        .map_or_else(|| hostname.to_string(), |m| m.as_str().to_string())
}

/// Hostname from a `Host` header value: port dropped, lowercased.
#[must_use]
pub fn host_without_port(host: &str) -> String {
    let host = host.trim();
    let hostname = if let Some(rest) = host.strip_prefix('[') {
        // [::1]:8080
        rest.split_once(']').map_or(rest, |(addr, _)| addr)
    } else {
        host.split(':').next().unwrap_or(host)
    };
    hostname.to_ascii_lowercase()
}
