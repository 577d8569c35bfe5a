//! Cache generation naming and install manifest configuration.

use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Version tag of the cache generation shipped with this build.
pub const DEFAULT_CACHE_NAME: &str = "notes-app-v1";

/// Static assets pre-cached at install time.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/css/style.css",
    "/js/app.js",
    "/js/auth.js",
    "/js/components.js",
    "/manifest.json",
    "/image/icon.png",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered list of asset paths committed into a generation at install time.
pub struct CacheManifest(Vec<String>);

impl CacheManifest {
    /// Builds a manifest from asset paths, dropping duplicates while keeping first-seen order.
    pub fn new<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for asset in assets {
            let asset = asset.into();
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }
        Self(unique)
    }

    /// Returns the asset paths in install order.
    pub fn assets(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of assets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Offline cache configuration for one deployed version.
pub struct CacheConfig {
    /// Version tag naming the current cache generation.
    pub cache_name: String,
    /// Assets committed at install time.
    pub manifest: CacheManifest,
    /// Origin (`https://host[:port]`) used to resolve root-relative manifest paths. When `None`,
    /// paths are used verbatim as request keys.
    pub origin: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            manifest: CacheManifest::default(),
            origin: None,
        }
    }
}

impl CacheConfig {
    /// Parses a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] for malformed JSON or an unusable configuration.
    pub fn from_json(raw: &str) -> Result<Self, CacheError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| CacheError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy resolving root-relative manifest paths against `origin`.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Checks that the configuration names a generation.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] when the cache name is blank.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.cache_name.trim().is_empty() {
            return Err(CacheError::Config("cache_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolves a manifest path to the URL used as request and cache key.
    pub fn resolve(&self, path: &str) -> String {
        match self.origin.as_deref() {
            Some(origin) if path.starts_with('/') => {
                format!("{}{path}", origin.trim_end_matches('/'))
            }
            _ => path.to_string(),
        }
    }
}
