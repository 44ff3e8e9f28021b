use serde::{Deserialize, Serialize};

/// The image-variant object ComicVine attaches to issues and volumes.
///
/// Every field is a URL to the same cover art at a different size. The API's
/// JSON names differ from its documentation in two places (`thumb_url`,
/// `screen_large_url`); the serde renames below paper over that.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub icon_url: Option<String>,
    #[serde(rename = "thumb_url")]
    pub thumbnail_url: Option<String>,
    pub tiny_url: Option<String>,
    pub small_url: Option<String>,
    pub medium_url: Option<String>,
    pub screen_url: Option<String>,
    pub super_url: Option<String>,
    #[serde(rename = "screen_large_url")]
    pub large_screen_url: Option<String>,
    pub original_url: Option<String>,
}

impl ImageSet {
    /// Picks the best single thumbnail URL: first non-null of
    /// medium, super, screen, small, original, thumbnail, tiny, icon.
    ///
    /// The order is deliberate (medium-ish sizes first, extremes last) and
    /// consumers rely on it being stable.
    pub fn best_url(&self) -> Option<&str> {
        [
            &self.medium_url,
            &self.super_url,
            &self.screen_url,
            &self.small_url,
            &self.original_url,
            &self.thumbnail_url,
            &self.tiny_url,
            &self.icon_url,
        ]
        .into_iter()
        .find_map(|u| u.as_deref())
    }
}
