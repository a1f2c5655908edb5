//! Page metadata (`<title>`, description, icon) from tenant branding and the URL path.

use crate::branding::BrandingRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HOME_TITLE: &str = "Home";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl PageMetadata {
    #[must_use]
    pub fn new(branding: &BrandingRecord, path: &str) -> Self {
        let page = format_path_to_title(path);
        Self {
            title: format!("{page} | {}", branding.name),
            description: format!("{} - {page}", branding.name),
            icon: branding.logo_url.clone(),
        }
    }
}

/// `"/hotel/123"` → `"Hotel / 123"`, `"/markup-plans"` → `"Markup Plans"`, `"/"` → `"Home"`.
#[must_use]
pub fn format_path_to_title(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .split(['-', '_'])
                .filter(|word| !word.is_empty())
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        HOME_TITLE.to_string()
    } else {
        segments.join(" / ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_from_paths() {
        assert_eq!(format_path_to_title("/hotel/123"), "Hotel / 123");
        assert_eq!(format_path_to_title("/"), "Home");
        assert_eq!(format_path_to_title(""), "Home");
        assert_eq!(
            format_path_to_title("/wholesaler/markup-plans/"),
            "Wholesaler / Markup Plans"
        );
        assert_eq!(
            format_path_to_title("/wholesaler/support_tickets"),
            "Wholesaler / Support Tickets"
        );
    }

    #[test]
    fn metadata_combines_brand_and_page() {
        let branding = BrandingRecord {
            name: "Blue Lagoon".to_string(),
            logo_url: "https://cdn.example.com/blue.png".to_string(),
            nav_logo_url: "https://cdn.example.com/blue.png".to_string(),
        };
        let metadata = PageMetadata::new(&branding, "/wholesaler/agents");
        assert_eq!(metadata.title, "Wholesaler / Agents | Blue Lagoon");
        assert_eq!(metadata.description, "Blue Lagoon - Wholesaler / Agents");
        assert_eq!(metadata.icon, "https://cdn.example.com/blue.png");
    }
}
