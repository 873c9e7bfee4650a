use std::ops::Deref;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Ordered label → target mapping. Re-inserting a label replaces its target
/// but keeps the position of the first occurrence.
pub type LinkMap = IndexMap<String, String>;

/// Profile data extracted from a single profile page.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub links: LinkMap,
    #[serde(rename = "iconLinks", default)]
    pub icon_links: LinkMap,
    pub title: String,
    #[serde(rename = "profileName")]
    pub profile_name: String,
    /// Empty when the page has no profile image.
    #[serde(rename = "profileImageURL", default)]
    pub profile_image_url: String,
}

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of the profile image, if one was found.
    pub fn image_url(&self) -> Option<&str> {
        if self.profile_image_url.is_empty() {
            None
        } else {
            Some(&self.profile_image_url)
        }
    }
}

/// A record whose mandatory fields are known to be non-empty.
///
/// Read-only: the inner record is reachable only through `Deref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedProfile(ProfileRecord);

impl ValidatedProfile {
    pub fn into_inner(self) -> ProfileRecord {
        self.0
    }
}

impl Deref for ValidatedProfile {
    type Target = ProfileRecord;

    fn deref(&self) -> &ProfileRecord {
        &self.0
    }
}

/// Check that `title` and `profileName` are present.
///
/// Links, icon links and the image are optional facets of a profile page;
/// a record without any of them is still valid.
pub fn validate(record: ProfileRecord) -> Result<ValidatedProfile, AppError> {
    let mut missing = Vec::new();
    if record.title.is_empty() {
        missing.push("title");
    }
    if record.profile_name.is_empty() {
        missing.push("profileName");
    }

    if missing.is_empty() {
        Ok(ValidatedProfile(record))
    } else {
        Err(AppError::ValidationError { missing })
    }
}
