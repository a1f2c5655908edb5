//! Read-through branding cache for browser-side callers.
//!
//! The cache keeps the same three entries the portal frontend keeps in local
//! storage (name, logo, navigation logo). Entries are reused until a caller
//! forces a refresh, or until `max_age` passes when one is configured.

use super::{
    derive_lookup_key_or, BrandingRecord, BrandingSource, DEFAULT_BRAND_NAME, DEFAULT_LOGO_URL,
    DEFAULT_LOOKUP_KEY,
};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
    time::{Duration, SystemTime},
};
use tracing::{debug, warn};

pub const STORAGE_KEY_NAME: &str = "brandName";
pub const STORAGE_KEY_LOGO: &str = "brandLogo";
pub const STORAGE_KEY_NAV_LOGO: &str = "brandNavLogo";

/// Snapshot of whatever the store holds; any entry may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachedBranding {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub nav_logo_url: Option<String>,
    pub stored_at: Option<SystemTime>,
}

impl CachedBranding {
    /// A usable record only when both name and logo are cached.
    #[must_use]
    pub fn complete(&self) -> Option<BrandingRecord> {
        let name = self.name.clone()?;
        let logo_url = self.logo_url.clone()?;
        let nav_logo_url = self.nav_logo_url.clone().unwrap_or_else(|| logo_url.clone());
        Some(BrandingRecord {
            name,
            logo_url,
            nav_logo_url,
        })
    }

    /// Whatever is cached, with defaults filling the gaps. `None` when empty.
    #[must_use]
    pub fn partial(&self) -> Option<BrandingRecord> {
        if self.name.is_none() && self.logo_url.is_none() && self.nav_logo_url.is_none() {
            return None;
        }
        let logo_url = self
            .logo_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGO_URL.to_string());
        Some(BrandingRecord {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_BRAND_NAME.to_string()),
            nav_logo_url: self.nav_logo_url.clone().unwrap_or_else(|| logo_url.clone()),
            logo_url,
        })
    }
}

pub trait BrandingStore: Send + Sync {
    fn get(&self) -> CachedBranding;
    fn set(&self, record: &BrandingRecord, now: SystemTime);
    fn invalidate(&self);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<&'static str, String>,
    stored_at: Option<SystemTime>,
}

/// In-process stand-in for browser local storage.
#[derive(Debug, Default)]
pub struct MemoryBrandingStore {
    entries: RwLock<Entries>,
}

impl MemoryBrandingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single storage entry, leaving the others untouched.
    #[cfg(test)]
    pub(crate) fn put(&self, key: &'static str, value: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.values.insert(key, value.into());
    }
}

impl BrandingStore for MemoryBrandingStore {
    fn get(&self) -> CachedBranding {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        CachedBranding {
            name: entries.values.get(STORAGE_KEY_NAME).cloned(),
            logo_url: entries.values.get(STORAGE_KEY_LOGO).cloned(),
            nav_logo_url: entries.values.get(STORAGE_KEY_NAV_LOGO).cloned(),
            stored_at: entries.stored_at,
        }
    }

    fn set(&self, record: &BrandingRecord, now: SystemTime) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.values.insert(STORAGE_KEY_NAME, record.name.clone());
        entries.values.insert(STORAGE_KEY_LOGO, record.logo_url.clone());
        entries
            .values
            .insert(STORAGE_KEY_NAV_LOGO, record.nav_logo_url.clone());
        entries.stored_at = Some(now);
    }

    fn invalidate(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.values.clear();
        entries.stored_at = None;
    }
}

pub struct CachedBrandingResolver<S, St, C = SystemClock> {
    source: S,
    store: St,
    clock: C,
    default_key: String,
    max_age: Option<Duration>,
}

impl<S, St> CachedBrandingResolver<S, St, SystemClock>
where
    S: BrandingSource,
    St: BrandingStore,
{
    pub fn new(source: S, store: St) -> Self {
        Self::with_clock(source, store, SystemClock)
    }
}

impl<S, St, C> CachedBrandingResolver<S, St, C>
where
    S: BrandingSource,
    St: BrandingStore,
    C: Clock,
{
    pub fn with_clock(source: S, store: St, clock: C) -> Self {
        Self {
            source,
            store,
            clock,
            default_key: DEFAULT_LOOKUP_KEY.to_string(),
            max_age: None,
        }
    }

    #[must_use]
    pub fn with_default_key(mut self, default_key: impl Into<String>) -> Self {
        self.default_key = default_key.into();
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Drop the cached entries so the next resolve goes to the network.
    pub fn invalidate(&self) {
        self.store.invalidate();
    }

    fn fresh(&self, cached: &CachedBranding) -> bool {
        let (Some(max_age), Some(stored_at)) = (self.max_age, cached.stored_at) else {
            return true;
        };
        self.clock
            .now()
            .duration_since(stored_at)
            .map_or(true, |age| age <= max_age)
    }

    /// Resolve branding for the page at `location` (the browser hostname).
    ///
    /// `None` means there is no browser, so the default record comes back
    /// without touching the network. Never fails: fetch errors fall back to
    /// whatever is cached, then to the default record.
    pub async fn resolve(&self, location: Option<&str>, force_refresh: bool) -> BrandingRecord {
        let Some(hostname) = location else {
            return BrandingRecord::default();
        };

        if !force_refresh {
            let cached = self.store.get();
            if self.fresh(&cached) {
                if let Some(record) = cached.complete() {
                    debug!("branding cache hit");
                    return record;
                }
            }
        }

        let key = derive_lookup_key_or(hostname, &self.default_key);
        match self.source.fetch(&key).await {
            Ok(record) => {
                self.store.set(&record, self.clock.now());
                record
            }
            Err(err) => {
                warn!("Branding fetch for {key} failed, using cached values: {err}");
                self.store.get().partial().unwrap_or_default()
            }
        }
    }
}
