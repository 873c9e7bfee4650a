use std::path::{Path, PathBuf};

use url::Url;

use crate::error::AppError;

/// Default profile host.
pub const DEFAULT_BASE_URL: &str = "https://linktr.ee";

/// Builds profile page URLs from identifiers.
#[derive(Debug, Clone)]
pub struct ProfileUrl {
    base: String,
}

impl ProfileUrl {
    pub fn new(base: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(base)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL {base:?}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::ConfigError(format!(
                    "Base URL scheme '{scheme}' is not supported (only http/https)"
                )));
            }
        }
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// `<base>/<identifier>`.
    pub fn resolve(&self, identifier: &str) -> Result<String, AppError> {
        check_identifier(identifier)?;
        Ok(format!("{}/{}", self.base, identifier))
    }
}

impl Default for ProfileUrl {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Reject identifiers that cannot double as a URL path segment and a file name.
pub fn check_identifier(identifier: &str) -> Result<(), AppError> {
    let bad = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains(['/', '\\'])
        || identifier.chars().any(char::is_control);
    if bad {
        Err(AppError::InvalidIdentifier(identifier.to_string()))
    } else {
        Ok(())
    }
}

/// Where output files land.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<profileName>.json`. The profile name comes from remote markup,
    /// so it must stay a plain file name inside `dir`.
    pub fn json_path(&self, profile_name: &str) -> Result<PathBuf, AppError> {
        check_identifier(profile_name)?;
        Ok(self.dir.join(format!("{profile_name}.json")))
    }

    /// `<dir>/<identifier>.jpg`. Keyed on the requested identifier, not the
    /// extracted profile name.
    pub fn image_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}.jpg"))
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
