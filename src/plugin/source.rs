//! Plugin Settings Sources
//!
//! Resolves the `--plugins` URL to a reader. Each supported URL scheme is
//! backed by a [`SettingsSource`]; the [`SchemeRegistry`] is the allow-list
//! consulted before anything is opened.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use log::debug;
use url::{ParseError, Url};
use crate::plugin::error::{PluginError, PluginResult};

/// Opens settings payloads for one URL scheme
pub trait SettingsSource: Send + Sync {
    /// Lowercase scheme this source handles, without `://`
    fn scheme(&self) -> &str;

    /// Open a reader over the payload the URL points at
    fn open(&self, url: &Url) -> PluginResult<Box<dyn Read>>;
}

/// Reads settings from the local filesystem (`file://`)
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl SettingsSource for FileSource {
    fn scheme(&self) -> &str {
        "file"
    }

    fn open(&self, url: &Url) -> PluginResult<Box<dyn Read>> {
        let path = file_url_path(url)?;
        debug!("Opening plugin settings file: {}", path.display());
        let file = File::open(&path)
            .map_err(|e| PluginError::io_failure(format!("open {}: {}", path.display(), e)))?;
        Ok(Box::new(file))
    }
}

/// Map a `file://` URL to a path by joining its host and path.
///
/// `file:///etc/node/plugins.json` is absolute; `file://conf/plugins.json`
/// yields the relative path `conf/plugins.json`.
pub fn file_url_path(url: &Url) -> PluginResult<PathBuf> {
    // Re-rooting on an empty host lets `to_file_path` do the percent-decoding.
    let local = Url::parse(&format!("file://{}", url.path()))
        .map_err(|e| PluginError::invalid_url(e.to_string()))?;
    let path = local
        .to_file_path()
        .map_err(|_| PluginError::invalid_url(format!("{} is not a valid file path", url)))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => {
            let relative = path.strip_prefix("/").unwrap_or(&path);
            Ok(PathBuf::from(host).join(relative))
        }
        _ => Ok(path),
    }
}

/// Allow-list of settings sources keyed by scheme
pub struct SchemeRegistry {
    sources: HashMap<String, Box<dyn SettingsSource>>,
}

impl SchemeRegistry {
    /// Create a registry that supports no schemes
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Create a registry with the built-in `file` source
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FileSource));
        registry
    }

    /// Register a source, replacing any source already bound to its scheme
    pub fn register(&mut self, source: Box<dyn SettingsSource>) {
        let scheme = source.scheme().to_ascii_lowercase();
        if self.sources.insert(scheme.clone(), source).is_some() {
            debug!("Replaced settings source for scheme: {}", scheme);
        }
    }

    /// Remove a scheme from the allow-list
    pub fn unregister(&mut self, scheme: &str) -> bool {
        self.sources.remove(&scheme.to_ascii_lowercase()).is_some()
    }

    pub fn is_supported(&self, scheme: &str) -> bool {
        self.sources.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Supported schemes in sorted order
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.sources.keys().cloned().collect();
        schemes.sort();
        schemes
    }

    /// Parse the raw flag value and check its scheme against the allow-list.
    ///
    /// A value without a scheme is treated as having the empty scheme, which
    /// is never supported.
    pub fn resolve(&self, raw: &str) -> PluginResult<Url> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => {
                return Err(PluginError::unsupported_scheme(""));
            }
            Err(e) => return Err(PluginError::invalid_url(e.to_string())),
        };

        if !self.is_supported(url.scheme()) {
            return Err(PluginError::unsupported_scheme(url.scheme()));
        }
        Ok(url)
    }

    /// Resolve the raw flag value and open its payload
    pub fn open(&self, raw: &str) -> PluginResult<(Url, Box<dyn Read>)> {
        let url = self.resolve(raw)?;
        let source = self
            .sources
            .get(url.scheme())
            .ok_or_else(|| PluginError::unsupported_scheme(url.scheme()))?;
        let reader = source.open(&url)?;
        Ok((url, reader))
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
