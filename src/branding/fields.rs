//! `ui-settings/by-domain` response envelope and the per-field fallback chains.

use super::{BrandingError, BrandingRecord, DEFAULT_BRAND_NAME, DEFAULT_LOGO_URL};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct BrandingEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<BrandingData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingData {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub brand_settings: Option<BrandSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSettings {
    pub meta_name: Option<String>,
    pub brand_name: Option<String>,
    pub brand_logo: Option<String>,
    pub nav_logo: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrandingField {
    Name,
    Logo,
    NavLogo,
}

impl BrandingField {
    /// Candidate values in priority order. `NavLogo` ends with the resolved
    /// logo so it always lands on the same image as `Logo` when unset.
    fn sources<'a>(self, data: &'a BrandingData) -> Vec<Option<&'a str>> {
        let settings = data.brand_settings.as_ref();
        match self {
            Self::Name => vec![
                settings.and_then(|s| s.meta_name.as_deref()),
                settings.and_then(|s| s.brand_name.as_deref()),
                data.name.as_deref(),
            ],
            Self::Logo => vec![
                settings.and_then(|s| s.brand_logo.as_deref()),
                data.logo.as_deref(),
            ],
            Self::NavLogo => {
                let mut sources = vec![settings.and_then(|s| s.nav_logo.as_deref())];
                sources.extend(Self::Logo.sources(data));
                sources
            }
        }
    }

    const fn fallback(self) -> &'static str {
        match self {
            Self::Name => DEFAULT_BRAND_NAME,
            Self::Logo | Self::NavLogo => DEFAULT_LOGO_URL,
        }
    }

    /// First non-blank source, or the hardcoded default for the field.
    #[must_use]
    pub fn resolve(self, data: &BrandingData) -> String {
        first_present(&self.sources(data))
            .map_or_else(|| self.fallback().to_string(), str::to_string)
    }
}

fn first_present<'a>(sources: &[Option<&'a str>]) -> Option<&'a str> {
    sources
        .iter()
        .flatten()
        .copied()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

impl BrandingData {
    #[must_use]
    pub fn into_record(self) -> BrandingRecord {
        BrandingRecord {
            name: BrandingField::Name.resolve(&self),
            logo_url: BrandingField::Logo.resolve(&self),
            nav_logo_url: BrandingField::NavLogo.resolve(&self),
        }
    }
}

impl BrandingEnvelope {
    /// # Errors
    /// Returns an error when the service reports failure or sends no `data`.
    pub fn into_record(self) -> Result<BrandingRecord, BrandingError> {
        if !self.success {
            return Err(BrandingError::Unsuccessful);
        }
        self.data
            .map(BrandingData::into_record)
            .ok_or(BrandingError::MissingData)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> BrandingEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn brand_settings_win() {
        let record = envelope(json!({
            "success": true,
            "data": {
                "name": "Generic",
                "logo": "https://cdn.example.com/generic.png",
                "brandSettings": {
                    "metaName": "Meta Travel",
                    "brandName": "Brand Travel",
                    "brandLogo": "https://cdn.example.com/brand.png",
                    "navLogo": "https://cdn.example.com/nav.png"
                }
            }
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.name, "Meta Travel");
        assert_eq!(record.logo_url, "https://cdn.example.com/brand.png");
        assert_eq!(record.nav_logo_url, "https://cdn.example.com/nav.png");
    }

    #[test]
    fn brand_name_used_without_meta_name() {
        let record = envelope(json!({
            "success": true,
            "data": { "brandSettings": { "brandName": "Brand Travel", "metaName": "  " } }
        }))
        .into_record()
        .unwrap();
        assert_eq!(record.name, "Brand Travel");
    }

    #[test]
    fn missing_brand_settings_falls_back_to_data() {
        let record = envelope(json!({
            "success": true,
            "data": { "name": "Sunrise Tours", "logo": "https://cdn.example.com/sun.png" }
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.name, "Sunrise Tours");
        assert_eq!(record.logo_url, "https://cdn.example.com/sun.png");
        assert_eq!(record.nav_logo_url, "https://cdn.example.com/sun.png");
    }

    #[test]
    fn empty_data_falls_back_to_defaults() {
        let record = envelope(json!({ "success": true, "data": {} }))
            .into_record()
            .unwrap();
        assert_eq!(record, BrandingRecord::default());
    }

    #[test]
    fn unsuccessful_envelope_is_an_error() {
        let result = envelope(json!({ "success": false, "data": { "name": "x" } })).into_record();
        assert!(matches!(result, Err(BrandingError::Unsuccessful)));

        let result = envelope(json!({ "success": true })).into_record();
        assert!(matches!(result, Err(BrandingError::MissingData)));
    }
}
