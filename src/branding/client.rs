use super::{derive_lookup_key_or, fields::BrandingEnvelope, BrandingError, BrandingRecord};
use crate::APP_USER_AGENT;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use std::future::Future;
use tracing::{debug, error, instrument};
use url::Url;

pub const BY_DOMAIN_PATH: &str = "ui-settings/by-domain";

/// Somewhere branding can be fetched from by tenant key.
pub trait BrandingSource: Send + Sync {
    fn fetch(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<BrandingRecord, BrandingError>> + Send;
}

/// HTTP client for the backend `ui-settings` service.
#[derive(Clone, Debug)]
pub struct BrandingClient {
    client: Client,
    endpoint: Url,
}

impl BrandingClient {
    /// # Errors
    /// Returns an error if the base URL is not a valid absolute URL or the
    /// HTTP client cannot be built.
    pub fn new(api_base_url: &str) -> Result<Self, BrandingError> {
        let endpoint = Url::parse(&format!(
            "{}/{BY_DOMAIN_PATH}",
            api_base_url.trim_end_matches('/')
        ))?;

        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl BrandingSource for BrandingClient {
    #[instrument(skip(self))]
    async fn fetch(&self, key: &str) -> Result<BrandingRecord, BrandingError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("domain", key);

        // Always fresh: this feeds page metadata.
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrandingError::Status(status));
        }

        let body = response.bytes().await?;
        let envelope: BrandingEnvelope = serde_json::from_slice(&body)?;

        debug!("branding fetched for {}", key);

        envelope.into_record()
    }
}

/// Server-side resolution for a request hostname. Never fails: any error is
/// logged and replaced by [`BrandingRecord::default`].
pub async fn resolve_branding_for_host<S: BrandingSource>(
    source: &S,
    hostname: &str,
    default_key: &str,
) -> BrandingRecord {
    let key = derive_lookup_key_or(hostname, default_key);

    match source.fetch(&key).await {
        Ok(record) => record,
        Err(err) => {
            error!("Failed to resolve branding for {hostname} ({key}): {err}");
            BrandingRecord::default()
        }
    }
}
