//! # Portal Gate (tenant edge for the wholesaler portal)
//!
//! `portal-gate` sits in front of the wholesaler/agency booking portal pages and
//! owns the two pieces of request-time logic the pages depend on.
//!
//! ## Route Guard
//!
//! Every page request passes through the guard before anything renders. The
//! guard only looks at the request path and whether the `authToken` cookie is
//! present; it never validates the token. Authenticated users are bounced from
//! public pages (login, registration, password reset) into the workspace, and
//! anonymous users are bounced from the workspace to the home page with a
//! `next` parameter so they can resume after login.
//!
//! ## Tenant Branding
//!
//! The request hostname selects the tenant. Its branding (name, logo, navigation
//! logo) is fetched from the backend `ui-settings` service and feeds:
//!
//! - the favicon route (`/api/favicon`),
//! - server-side page metadata (`<title>`, description, icon),
//! - the client-side cache and navigation observer in [`branding::store`] and
//!   [`branding::document`].
//!
//! Branding is cosmetic: every entry point degrades to a default record instead
//! of failing the request.

pub mod api;
pub mod branding;
pub mod cli;
pub mod guard;
pub mod metadata;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
