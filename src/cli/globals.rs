use crate::guard::GuardConfig;
use std::path::{Path, PathBuf};

/// Directory holding `favicon.ico` and `images/`.
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_base_url: String,
    pub default_tenant: String,
    pub guard: GuardConfig,
    pub static_dir: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_base_url: String, default_tenant: String, guard: GuardConfig) -> Self {
        Self {
            api_base_url,
            default_tenant,
            guard,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    #[must_use]
    pub fn with_static_dir(mut self, static_dir: impl AsRef<Path>) -> Self {
        self.static_dir = static_dir.as_ref().to_path_buf();
        self
    }
}
