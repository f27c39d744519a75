//! HTML fragment sources for the shared navbar and footer.
//!
//! Uses `tokio::fs` for on-disk site roots and `reqwest` 0.13 for fragments
//! served over HTTP.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::config::PartialsConfig;

/// Errors that can occur when fetching a fragment.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Reading the fragment from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The path tries to leave the site root.
    #[error("fragment path escapes the site root: {0}")]
    InvalidPath(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Fragment URL could not be built.
    #[error("invalid fragment URL: {0}")]
    Url(#[from] url::ParseError),

    /// No fragment registered under this path.
    #[error("no fragment at {0}")]
    NotFound(String),
}

/// Something that can fetch an HTML fragment by site-relative path.
pub trait FragmentSource: Send + Sync {
    /// Fetch the fragment at `path` (e.g. `assets/partials/navbar.html`).
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FragmentError>> + Send;
}

// =============================================================================
// Directory
// =============================================================================

/// Reads fragments from a site root on disk.
#[derive(Debug, Clone)]
pub struct DirFragmentSource {
    root: PathBuf,
}

impl DirFragmentSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FragmentError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FragmentError::InvalidPath(path.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

impl FragmentSource for DirFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, FragmentError> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| FragmentError::Io {
                path: full.display().to_string(),
                source,
            })
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Fetches fragments relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpFragmentSource {
    /// Create a source rooted at `base`. A missing trailing slash is added
    /// so relative paths resolve under it.
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// The URL a fragment path resolves to.
    ///
    /// # Errors
    ///
    /// Returns `FragmentError::Url` if the path cannot be joined.
    pub fn url_for(&self, path: &str) -> Result<Url, FragmentError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, FragmentError> {
        let url = self.url_for(path)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FragmentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Fragments held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct StaticFragmentSource {
    fragments: Arc<HashMap<String, String>>,
}

impl StaticFragmentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.fragments).insert(path.into(), html.into());
        self
    }
}

impl FragmentSource for StaticFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, FragmentError> {
        self.fragments
            .get(path)
            .cloned()
            .ok_or_else(|| FragmentError::NotFound(path.to_owned()))
    }
}

// =============================================================================
// From config
// =============================================================================

/// The fragment source selected by [`PartialsConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredFragmentSource {
    Dir(DirFragmentSource),
    Http(HttpFragmentSource),
}

impl ConfiguredFragmentSource {
    /// HTTP when a base URL is configured, otherwise the directory.
    #[must_use]
    pub fn from_config(config: &PartialsConfig) -> Self {
        match &config.base_url {
            Some(base) => Self::Http(HttpFragmentSource::new(base.clone())),
            None => Self::Dir(DirFragmentSource::new(&config.dir)),
        }
    }
}

impl FragmentSource for ConfiguredFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, FragmentError> {
        match self {
            Self::Dir(source) => source.fetch(path).await,
            Self::Http(source) => source.fetch(path).await,
        }
    }
}
