use crate::{api, cli::globals::GlobalArgs, guard::GuardConfig};
use anyhow::{anyhow, Context, Result};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_base_url: String,
    pub default_tenant: String,
    pub auth_cookie: String,
    pub workspace_root: String,
    pub static_dir: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let api_base_url = validate_base_url(&args.api_base_url)?;

    let guard = GuardConfig::new()
        .with_cookie_name(args.auth_cookie)
        .with_workspace_root(&args.workspace_root);

    let globals =
        GlobalArgs::new(api_base_url, args.default_tenant, guard).with_static_dir(&args.static_dir);

    debug!("Global args: {:?}", globals);

    api::new(args.port, &globals).await
}

/// The backend base URL must be an absolute `http(s)` URL.
///
/// # Errors
/// Returns an error for unparsable URLs or other schemes.
pub fn validate_base_url(value: &str) -> Result<String> {
    let url = Url::parse(value).with_context(|| format!("Invalid API base URL: {value}"))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Unsupported API base URL scheme: {scheme}")),
    }

    if url.host_str().is_none() {
        return Err(anyhow!("API base URL must include a host: {value}"));
    }

    Ok(value.trim_end_matches('/').to_string())
}
