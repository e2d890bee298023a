/// Photo gallery filtering
///
/// The gallery lists photos from a photo-search API and keeps only
/// horizontal images whose aspect ratio suits a landscape social post.
/// This module holds the response types and the filtering and paging
/// rules; fetching is left to the caller.

use serde::Deserialize;

/// Photos requested per page
pub const PER_PAGE: u32 = 12;

/// Fallback caption for photos without any description
pub const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileImage {
    #[serde(default)]
    pub medium: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photographer {
    pub name: String,
    #[serde(default)]
    pub profile_image: Option<ProfileImage>,
}

/// One photo as returned by the API (unknown fields are ignored)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub urls: PhotoUrls,
    pub user: Photographer,
}

impl Photo {
    /// Width over height; None for a zero height
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// Description, else alt text, else a fixed fallback
    pub fn caption(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.alt_description.as_deref().filter(|d| !d.is_empty()))
            .unwrap_or(NO_DESCRIPTION)
    }

    /// File name offered when downloading the full-size image
    pub fn download_name(&self) -> String {
        format!("instagram-horizontal-{}.jpg", self.id)
    }
}

/// Search endpoint response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPage {
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
    pub results: Vec<Photo>,
}

/// Inclusive aspect-ratio window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectFilter {
    pub min: f64,
    pub max: f64,
}

impl Default for AspectFilter {
    fn default() -> Self {
        Self { min: 1.3, max: 2.5 }
    }
}

impl AspectFilter {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, width: u32, height: u32) -> bool {
        if height == 0 {
            return false;
        }
        let ratio = width as f64 / height as f64;
        ratio >= self.min && ratio <= self.max
    }

    /// Photos from `photos` inside the window, in their original order
    pub fn filter_page(&self, photos: Vec<Photo>) -> Vec<Photo> {
        photos
            .into_iter()
            .filter(|p| self.accepts(p.width, p.height))
            .collect()
    }
}

/// Whether a popular-photos page suggests more pages follow
pub fn has_more_popular(returned: usize, per_page: u32) -> bool {
    returned >= per_page as usize
}

/// Whether a search has results beyond `page` (1-based)
pub fn has_more_search(page: u32, per_page: u32, total: u64) -> bool {
    (page as u64) * (per_page as u64) < total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn photo(id: &str, width: u32, height: u32) -> Photo {
        Photo {
            id: id.to_string(),
            width,
            height,
            description: None,
            alt_description: None,
            urls: PhotoUrls {
                regular: format!("https://images.example/{}?w=1080", id),
                full: format!("https://images.example/{}", id),
            },
            user: Photographer {
                name: "Ana".to_string(),
                profile_image: None,
            },
        }
    }

    #[test]
    fn test_accepts_bounds_inclusive() {
        let filter = AspectFilter::default();
        assert!(filter.accepts(1300, 1000));
        assert!(filter.accepts(2500, 1000));
        assert!(filter.accepts(1920, 1080));

        assert!(!filter.accepts(1299, 1000));
        assert!(!filter.accepts(2501, 1000));
        assert!(!filter.accepts(1080, 1350));
        assert!(!filter.accepts(1000, 0));
    }

    #[test]
    fn test_filter_page_keeps_order() {
        let photos = vec![
            photo("wide", 3000, 2000),
            photo("portrait", 2000, 3000),
            photo("pano", 6000, 1000),
            photo("hd", 1920, 1080),
        ];

        let kept: Vec<String> = AspectFilter::default()
            .filter_page(photos)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(kept, vec!["wide", "hd"]);
    }

    #[test]
    fn test_parse_search_response() {
        let json = r##"{
            "total": 133,
            "total_pages": 12,
            "results": [{
                "id": "Dwu85P9SOIk",
                "created_at": "2016-05-03T11:00:28-04:00",
                "width": 2448,
                "height": 1632,
                "color": "#6E633A",
                "description": null,
                "alt_description": "canal in Venice",
                "urls": {"raw": "r", "full": "f", "regular": "g", "small": "s"},
                "user": {"name": "Luca", "profile_image": {"small": "a", "medium": "b"}}
            }]
        }"##;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 133);
        assert_eq!(page.results.len(), 1);

        let p = &page.results[0];
        assert_eq!(p.caption(), "canal in Venice");
        assert_eq!(p.urls.full, "f");
        assert_eq!(p.user.profile_image.as_ref().unwrap().medium.as_deref(), Some("b"));
        assert_eq!(p.aspect_ratio(), Some(1.5));
    }

    #[test]
    fn test_caption_fallbacks() {
        let mut p = photo("x", 1, 1);
        assert_eq!(p.caption(), NO_DESCRIPTION);

        p.alt_description = Some("alt".to_string());
        assert_eq!(p.caption(), "alt");

        p.description = Some("desc".to_string());
        assert_eq!(p.caption(), "desc");

        p.description = Some(String::new());
        assert_eq!(p.caption(), "alt");
    }

    #[test]
    fn test_download_name() {
        assert_eq!(photo("abc", 1, 1).download_name(), "instagram-horizontal-abc.jpg");
    }

    #[test]
    fn test_paging_rules() {
        assert!(has_more_popular(12, PER_PAGE));
        assert!(!has_more_popular(11, PER_PAGE));

        assert!(has_more_search(1, PER_PAGE, 13));
        assert!(!has_more_search(1, PER_PAGE, 12));
        assert!(!has_more_search(2, PER_PAGE, 20));
    }

    proptest! {
        #[test]
        fn prop_filtered_photos_are_in_window(
            dims in proptest::collection::vec((0u32..5000, 0u32..5000), 0..30)
        ) {
            let filter = AspectFilter::default();
            let photos: Vec<Photo> = dims
                .iter()
                .enumerate()
                .map(|(i, (w, h))| photo(&i.to_string(), *w, *h))
                .collect();

            for p in filter.filter_page(photos) {
                let ratio = p.aspect_ratio().unwrap();
                prop_assert!((1.3..=2.5).contains(&ratio));
            }
        }
    }
}
