use super::{auth_present, GuardConfig, GuardDecision};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

// API routes, build assets, the favicon and static images skip the guard.
static EXCLUDED: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^/(?:api|_next/static|_next/image|favicon\.ico|images)").ok());

/// Whether the guard runs for this path.
#[must_use]
pub fn guard_applies(path: &str) -> bool {
    EXCLUDED
        .as_ref()
        .map_or(true, |excluded| !excluded.is_match(path))
}

/// axum middleware enforcing the guard decision table before the page handler.
pub async fn route_guard(
    State(config): State<Arc<GuardConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    if !guard_applies(uri.path()) {
        return next.run(request).await;
    }

    let authenticated = auth_present(request.headers(), config.cookie_name());

    match config.decide(uri.path(), uri.query(), authenticated) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!(
                path = uri.path(),
                authenticated, "route guard redirect to {}", location
            );
            Redirect::temporary(&location).into_response()
        }
    }
}
