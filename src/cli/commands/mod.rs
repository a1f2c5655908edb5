use crate::{
    branding::DEFAULT_LOOKUP_KEY,
    cli::globals::DEFAULT_STATIC_DIR,
    guard::{AUTH_COOKIE_NAME, WORKSPACE_ROOT},
};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_DEFAULT_TENANT: &str = "default-tenant";
pub const ARG_AUTH_COOKIE: &str = "auth-cookie";
pub const ARG_WORKSPACE_ROOT: &str = "workspace-root";
pub const ARG_STATIC_DIR: &str = "static-dir";
pub const ARG_VERBOSITY: &str = "verbosity";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its index (`0`..=`5`).
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        LOG_LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(level))
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| "invalid log level".to_string())
    })
}

/// Route prefixes must be absolute paths.
#[must_use]
pub fn validator_route() -> ValueParser {
    ValueParser::from(move |route: &str| -> std::result::Result<String, String> {
        if route.starts_with('/') && route.len() > 1 {
            Ok(route.to_string())
        } else {
            Err("route must start with '/' and not be the root".to_string())
        }
    })
}

/// Cookie names are RFC 6265 tokens.
#[must_use]
pub fn validator_cookie_name() -> ValueParser {
    ValueParser::from(move |name: &str| -> std::result::Result<String, String> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c));
        if valid {
            Ok(name.to_string())
        } else {
            Err("invalid cookie name".to_string())
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("portal-gate")
        .about("Route guard and tenant branding for the wholesaler portal")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORTAL_GATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("Backend API base URL, example: https://api.example.com")
                .env("PORTAL_GATE_API_BASE_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DEFAULT_TENANT)
                .long("default-tenant")
                .help("Tenant domain used for localhost requests")
                .default_value(DEFAULT_LOOKUP_KEY)
                .env("PORTAL_GATE_DEFAULT_TENANT"),
        )
        .arg(
            Arg::new(ARG_AUTH_COOKIE)
                .long("auth-cookie")
                .help("Name of the cookie that marks a signed-in user")
                .default_value(AUTH_COOKIE_NAME)
                .env("PORTAL_GATE_AUTH_COOKIE")
                .value_parser(validator_cookie_name()),
        )
        .arg(
            Arg::new(ARG_WORKSPACE_ROOT)
                .long("workspace-root")
                .help("Protected workspace prefix, also the landing page after login")
                .default_value(WORKSPACE_ROOT)
                .env("PORTAL_GATE_WORKSPACE_ROOT")
                .value_parser(validator_route()),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long("static-dir")
                .help("Directory served for /favicon.ico and /images")
                .default_value(DEFAULT_STATIC_DIR)
                .env("PORTAL_GATE_STATIC_DIR"),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORTAL_GATE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
