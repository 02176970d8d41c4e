//! Folio record schema: one scanned page image of a project.

use crate::clock::Clock;
use crate::model::base::{normalize_keywords, Tracking};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Source image format of a folio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
}

/// Structural page classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    FrontCover,
    BackCover,
    Title,
    TableOfContents,
    Index,
    Content,
    Blank,
    Other,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioSize {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl FolioSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Dimensions of the derived preview images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivatives {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<FolioSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<FolioSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<FolioSize>,
}

/// Folio record: one page image plus its derived previews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folio {
    #[serde(flatten)]
    pub tracking: Tracking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<BTreeSet<String>>,
    /// Stable folio identifier; generated as a v4 UUID for new folios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FolioSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivatives: Option<Derivatives>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
}

impl Folio {
    /// Creates a folio with a generated stable identifier.
    pub fn new(
        clock: &dyn Clock,
        user: impl Into<String>,
        name: impl Into<String>,
        format: ImageFormat,
        size: FolioSize,
        derivatives: Derivatives,
    ) -> Self {
        Self {
            tracking: Tracking::new(clock, user),
            keywords: None,
            id: Some(Uuid::new_v4().to_string()),
            name: Some(name.into()),
            format: Some(format),
            size: Some(size),
            derivatives: Some(derivatives),
            page_type: None,
        }
    }

    pub fn set_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize_keywords(keywords);
    }
}

#[cfg(test)]
mod tests {
    use super::{Derivatives, Folio, FolioSize, ImageFormat, PageType};
    use crate::clock::FixedClock;

    #[test]
    fn new_folio_generates_unique_ids() {
        let clock = FixedClock(1000);
        let size = FolioSize::new(2480, 3508);
        let first = Folio::new(&clock, "scribe", "page-1", ImageFormat::Tiff, size, Derivatives::default());
        let second = Folio::new(&clock, "scribe", "page-2", ImageFormat::Tiff, size, Derivatives::default());

        assert!(first.id.is_some());
        assert_ne!(first.id, second.id);
        assert_eq!(first.tracking.date, Some(1000));
    }

    #[test]
    fn page_type_uses_kebab_case_labels() {
        let label = serde_json::to_string(&PageType::TableOfContents).expect("encode");
        assert_eq!(label, "\"table-of-contents\"");
        let back: PageType = serde_json::from_str("\"front-cover\"").expect("decode");
        assert_eq!(back, PageType::FrontCover);
    }
}
