//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{
    ARG_API_BASE_URL, ARG_AUTH_COOKIE, ARG_DEFAULT_TENANT, ARG_PORT, ARG_STATIC_DIR,
    ARG_WORKSPACE_ROOT,
};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let string_arg = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .cloned()
            .with_context(|| format!("missing required argument: --{name}"))
    };

    Ok(Action::Server(Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        api_base_url: string_arg(ARG_API_BASE_URL)?,
        default_tenant: string_arg(ARG_DEFAULT_TENANT)?,
        auth_cookie: string_arg(ARG_AUTH_COOKIE)?,
        workspace_root: string_arg(ARG_WORKSPACE_ROOT)?,
        static_dir: string_arg(ARG_STATIC_DIR)?,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_flags() {
        temp_env::with_vars(
            [
                ("PORTAL_GATE_PORT", None::<&str>),
                ("PORTAL_GATE_DEFAULT_TENANT", None),
                ("PORTAL_GATE_AUTH_COOKIE", None),
                ("PORTAL_GATE_WORKSPACE_ROOT", None),
                ("PORTAL_GATE_STATIC_DIR", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec![
                    "portal-gate",
                    "--port",
                    "9000",
                    "--api-base-url",
                    "https://api.example.com",
                    "--workspace-root",
                    "/agency",
                    "--static-dir",
                    "/srv/portal",
                ]);

                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 9000);
                assert_eq!(args.api_base_url, "https://api.example.com");
                assert_eq!(args.workspace_root, "/agency");
                assert_eq!(args.auth_cookie, crate::guard::AUTH_COOKIE_NAME);
                assert_eq!(args.static_dir, "/srv/portal");
            },
        );
    }
}
