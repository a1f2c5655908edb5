//! Route guard: cookie-presence redirects between public pages and the workspace.
//!
//! The guard is a pure function of the request path, query and auth cookie. It
//! does not look inside the cookie; validating the token is left to the backend
//! API on every data call.

mod cookie;
pub mod middleware;

pub use cookie::{auth_present, cookie_value};
pub use middleware::{guard_applies, route_guard};

use url::form_urlencoded;

pub const AUTH_COOKIE_NAME: &str = "authToken";
pub const HOME_PATH: &str = "/";
pub const WORKSPACE_ROOT: &str = "/wholesaler";
pub const NEXT_PARAM: &str = "next";

/// Pages reachable without a session. `/` only ever matches exactly.
pub const PUBLIC_ROUTES: [&str; 6] = [
    HOME_PATH,
    "/auth",
    "/wholesaler-login",
    "/verify-login",
    "/registration",
    "/reset-password",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteClassification {
    Public,
    Protected,
    Neither,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(String),
}

/// Route tables and cookie name the guard runs with.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    cookie_name: String,
    workspace_root: String,
    public_routes: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cookie_name: AUTH_COOKIE_NAME.to_string(),
            workspace_root: WORKSPACE_ROOT.to_string(),
            public_routes: PUBLIC_ROUTES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    /// The workspace root is stored normalized so `"/wholesaler/"` and
    /// `"/wholesaler"` behave the same.
    #[must_use]
    pub fn with_workspace_root(mut self, workspace_root: &str) -> Self {
        self.workspace_root = normalize_path(workspace_root).to_string();
        self
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn workspace_root(&self) -> &str {
        &self.workspace_root
    }

    #[must_use]
    pub fn public_routes(&self) -> &[String] {
        &self.public_routes
    }

    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes
            .iter()
            .any(|route| matches_route(path, route))
    }

    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        matches_route(path, &self.workspace_root)
    }

    /// Classify an already normalized path.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClassification {
        if self.is_public(path) {
            RouteClassification::Public
        } else if self.is_protected(path) {
            RouteClassification::Protected
        } else {
            RouteClassification::Neither
        }
    }

    /// Apply the redirect rules to one request.
    ///
    /// `path` and `query` are taken verbatim from the request; the original
    /// path (not the normalized one) is what ends up in the `next` parameter.
    #[must_use]
    pub fn decide(&self, path: &str, query: Option<&str>, authenticated: bool) -> GuardDecision {
        let normalized = normalize_path(path);

        if authenticated {
            if self.is_public(normalized) && normalized != self.workspace_root {
                return GuardDecision::Redirect(self.workspace_root.clone());
            }
        } else if self.is_protected(normalized) {
            let resume = match query {
                Some(query) if !query.is_empty() => format!("{path}?{query}"),
                _ => path.to_string(),
            };
            let encoded = form_urlencoded::Serializer::new(String::new())
                .append_pair(NEXT_PARAM, &resume)
                .finish();
            return GuardDecision::Redirect(format!("{HOME_PATH}?{encoded}"));
        }

        GuardDecision::Pass
    }
}

/// Keep `/` literally and drop the trailing slash from anything else.
///
/// Runs of trailing slashes collapse together so the result is stable when
/// normalized again.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() {
        return HOME_PATH;
    }
    trimmed
}

fn matches_route(path: &str, route: &str) -> bool {
    if path == route {
        return true;
    }
    if route == HOME_PATH {
        return false;
    }
    path.strip_prefix(route)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_next(location: &str) -> Option<String> {
        let (_, query) = location.split_once('?')?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == NEXT_PARAM)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn normalize_keeps_root_and_strips_trailing_slashes() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/wholesaler/"), "/wholesaler");
        assert_eq!(normalize_path("/wholesaler"), "/wholesaler");
        assert_eq!(normalize_path("/a//"), "/a");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for path in ["/", "/wholesaler/", "/a//", "", "/auth", "//", "/x/y/"] {
            let once = normalize_path(path);
            let twice = normalize_path(once);
            assert_eq!(once, twice, "normalize({path:?}) not idempotent");
        }
    }

    #[test]
    fn root_only_matches_exactly() {
        let config = GuardConfig::default();
        assert!(config.is_public("/"));
        assert!(!config.is_public("/anything"));
        assert_eq!(config.classify("/anything"), RouteClassification::Neither);
    }

    #[test]
    fn segment_descendants_match_but_lookalikes_do_not() {
        let config = GuardConfig::default();
        assert!(config.is_public("/auth/callback"));
        assert!(!config.is_public("/authority"));
        assert!(config.is_protected("/wholesaler/agencies"));
        assert!(!config.is_protected("/wholesalers"));
        assert_eq!(
            config.classify("/wholesaler/agencies/42"),
            RouteClassification::Protected
        );
        assert_eq!(config.classify("/registration"), RouteClassification::Public);
    }

    #[test]
    fn authenticated_user_leaves_public_pages() {
        let config = GuardConfig::default();
        assert_eq!(
            config.decide("/auth", None, true),
            GuardDecision::Redirect("/wholesaler".to_string())
        );
        assert_eq!(
            config.decide("/", None, true),
            GuardDecision::Redirect("/wholesaler".to_string())
        );
        assert_eq!(
            config.decide("/reset-password/", None, true),
            GuardDecision::Redirect("/wholesaler".to_string())
        );
    }

    #[test]
    fn authenticated_user_stays_in_workspace() {
        let config = GuardConfig::default();
        assert_eq!(config.decide("/wholesaler", None, true), GuardDecision::Pass);
        assert_eq!(config.decide("/wholesaler/", None, true), GuardDecision::Pass);
        assert_eq!(
            config.decide("/wholesaler/bookings", None, true),
            GuardDecision::Pass
        );
    }

    #[test]
    fn anonymous_user_is_sent_home_with_next() {
        let config = GuardConfig::default();
        let GuardDecision::Redirect(location) =
            config.decide("/wholesaler/agencies", None, false)
        else {
            panic!("expected redirect");
        };
        assert!(location.starts_with("/?"));
        assert_eq!(
            decode_next(&location).as_deref(),
            Some("/wholesaler/agencies")
        );
    }

    #[test]
    fn next_keeps_original_path_and_query() {
        let config = GuardConfig::default();
        let GuardDecision::Redirect(location) =
            config.decide("/wholesaler/visas/", Some("page=2&q=a b"), false)
        else {
            panic!("expected redirect");
        };
        assert_eq!(
            decode_next(&location).as_deref(),
            Some("/wholesaler/visas/?page=2&q=a b")
        );
    }

    #[test]
    fn anonymous_user_passes_public_and_unknown_pages() {
        let config = GuardConfig::default();
        assert_eq!(config.decide("/registration", None, false), GuardDecision::Pass);
        assert_eq!(config.decide("/", None, false), GuardDecision::Pass);
        assert_eq!(config.decide("/about", None, false), GuardDecision::Pass);
    }

    #[test]
    fn custom_workspace_root_is_normalized() {
        let config = GuardConfig::new()
            .with_workspace_root("/agency/")
            .with_cookie_name("session");
        assert_eq!(config.workspace_root(), "/agency");
        assert_eq!(config.cookie_name(), "session");
        assert_eq!(
            config.decide("/auth", None, true),
            GuardDecision::Redirect("/agency".to_string())
        );
        assert_eq!(config.decide("/wholesaler", None, false), GuardDecision::Pass);
    }
}
