//! Applies tenant branding to the open document whenever the path changes.

use super::{store::BrandingStore, BrandingSource, CachedBrandingResolver};
use crate::{branding::store::Clock, metadata::PageMetadata};
use tracing::debug;

/// The `<head>` elements the observer manages. Either tag may be missing
/// until the observer creates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlHead {
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl HtmlHead {
    pub fn set_description(&mut self, content: &str) {
        if self.description.is_none() {
            debug!("creating <meta name=\"description\">");
        }
        self.description = Some(content.to_string());
    }

    pub fn set_icon(&mut self, href: &str) {
        if self.icon.is_none() {
            debug!("creating <link rel=\"icon\">");
        }
        self.icon = Some(href.to_string());
    }
}

pub trait Document {
    fn set_title(&mut self, title: &str);
    fn head_mut(&mut self) -> Option<&mut HtmlHead>;
}

/// Plain in-memory document, used by server-rendered shells and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageDocument {
    pub title: String,
    pub head: Option<HtmlHead>,
}

impl PageDocument {
    #[must_use]
    pub fn with_head() -> Self {
        Self {
            title: String::new(),
            head: Some(HtmlHead::default()),
        }
    }
}

impl Document for PageDocument {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn head_mut(&mut self) -> Option<&mut HtmlHead> {
        self.head.as_mut()
    }
}

/// Write metadata into a document, skipping the head when there is none.
pub fn apply_metadata<D: Document + ?Sized>(document: &mut D, metadata: &PageMetadata) {
    document.set_title(&metadata.title);
    if let Some(head) = document.head_mut() {
        head.set_description(&metadata.description);
        head.set_icon(&metadata.icon);
    }
}

/// Re-resolves branding when the path changes and patches the document.
pub struct NavigationObserver<S, St, C> {
    resolver: CachedBrandingResolver<S, St, C>,
    hostname: Option<String>,
    last_path: Option<String>,
}

impl<S, St, C> NavigationObserver<S, St, C>
where
    S: BrandingSource,
    St: BrandingStore,
    C: Clock,
{
    /// `hostname` is the page location; `None` outside a browser.
    pub fn new(resolver: CachedBrandingResolver<S, St, C>, hostname: Option<String>) -> Self {
        Self {
            resolver,
            hostname,
            last_path: None,
        }
    }

    pub fn resolver(&self) -> &CachedBrandingResolver<S, St, C> {
        &self.resolver
    }

    /// Handle a navigation. Returns the applied metadata, or `None` when the
    /// path did not change.
    pub async fn on_navigate<D: Document + ?Sized>(
        &mut self,
        path: &str,
        document: Option<&mut D>,
    ) -> Option<PageMetadata> {
        if self.last_path.as_deref() == Some(path) {
            return None;
        }
        self.last_path = Some(path.to_string());
        Some(self.apply(path, document, false).await)
    }

    /// Force a network refresh of branding for the current path.
    pub async fn refresh<D: Document + ?Sized>(
        &mut self,
        document: Option<&mut D>,
    ) -> PageMetadata {
        let path = self.last_path.clone().unwrap_or_else(|| "/".to_string());
        self.apply(&path, document, true).await
    }

    async fn apply<D: Document + ?Sized>(
        &self,
        path: &str,
        document: Option<&mut D>,
        force_refresh: bool,
    ) -> PageMetadata {
        let branding = self
            .resolver
            .resolve(self.hostname.as_deref(), force_refresh)
            .await;
        let metadata = PageMetadata::new(&branding, path);

        if let Some(document) = document {
            apply_metadata(document, &metadata);
        }

        metadata
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::branding::{
        store::tests::{tenant_record, FakeSource},
        BrandingRecord, MemoryBrandingStore, DEFAULT_BRAND_NAME,
    };

    fn observer(
        source: FakeSource,
        hostname: Option<&str>,
    ) -> NavigationObserver<FakeSource, MemoryBrandingStore, crate::branding::store::SystemClock>
    {
        NavigationObserver::new(
            CachedBrandingResolver::new(source, MemoryBrandingStore::new()),
            hostname.map(ToString::to_string),
        )
    }

    #[tokio::test]
    async fn navigation_patches_title_and_creates_head_tags() {
        let mut observer = observer(FakeSource::ok(tenant_record()), Some("admin.example.com"));
        let mut document = PageDocument::with_head();

        let metadata = observer
            .on_navigate("/wholesaler/visas", Some(&mut document))
            .await
            .unwrap();

        assert_eq!(document.title, "Wholesaler / Visas | Blue Lagoon Travel");
        let head = document.head.as_ref().unwrap();
        assert_eq!(head.description.as_deref(), Some(metadata.description.as_str()));
        assert_eq!(head.icon.as_deref(), Some("https://cdn.example.com/blue.png"));
    }

    #[tokio::test]
    async fn same_path_is_ignored_and_cache_is_reused() {
        let mut observer = observer(FakeSource::ok(tenant_record()), Some("admin.example.com"));
        let mut document = PageDocument::with_head();

        observer.on_navigate("/a", Some(&mut document)).await;
        assert!(observer.on_navigate("/a", Some(&mut document)).await.is_none());
        observer.on_navigate("/b", Some(&mut document)).await;

        assert_eq!(document.title, "B | Blue Lagoon Travel");
        assert_eq!(observer.resolver().store().get().complete(), Some(tenant_record()));
    }

    #[tokio::test]
    async fn missing_head_only_sets_title() {
        let mut observer = observer(FakeSource::ok(tenant_record()), Some("example.com"));
        let mut document = PageDocument::default();

        observer.on_navigate("/", Some(&mut document)).await;

        assert_eq!(document.title, "Home | Blue Lagoon Travel");
        assert!(document.head.is_none());
    }

    #[tokio::test]
    async fn no_document_and_no_browser_still_yield_metadata() {
        let mut observer = observer(FakeSource::ok(tenant_record()), None);
        let metadata = observer
            .on_navigate::<PageDocument>("/registration", None)
            .await
            .unwrap();
        assert_eq!(metadata.title, format!("Registration | {DEFAULT_BRAND_NAME}"));
    }

    #[tokio::test]
    async fn refresh_forces_fetch() {
        let mut observer = observer(FakeSource::ok(tenant_record()), Some("example.com"));
        let mut document = PageDocument::with_head();
        observer.on_navigate("/x", Some(&mut document)).await;
        observer.resolver().store().set(&BrandingRecord::default(), std::time::SystemTime::now());

        observer.refresh(Some(&mut document)).await;
        assert_eq!(document.title, "X | Blue Lagoon Travel");
    }
}
