use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Every selector the extractor relies on, in one place.
///
/// The defaults target the Linktree profile layout. Markers are test-id
/// attributes and fixed container ids, which the remote page can change
/// without notice; a JSON file with any subset of these keys overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Page title node.
    pub title: String,
    /// Link-type buttons.
    pub link_button: String,
    /// Label text inside a link button.
    pub link_label: String,
    /// Social icon anchors.
    pub social_icon: String,
    /// Element inside a social icon carrying the icon name.
    pub icon_label: String,
    /// Attribute of `icon_label` holding the icon name.
    pub icon_label_attr: String,
    /// Profile name container.
    pub profile_title: String,
    /// Profile image element.
    pub profile_image: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            title: "head > title".to_string(),
            link_button: "a[data-testid='LinkButton']".to_string(),
            link_label: "div > p".to_string(),
            social_icon: "a[data-testid='SocialIcon']".to_string(),
            icon_label: "title".to_string(),
            icon_label_attr: "title".to_string(),
            profile_title: "div[id='profile-title']".to_string(),
            profile_image: "img[data-testid='ProfileImage']".to_string(),
        }
    }
}

impl ExtractionRules {
    /// Load rule overrides from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read rules file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            AppError::ConfigError(format!("Invalid JSON in rules file {}: {e}", path.display()))
        })
    }
}
