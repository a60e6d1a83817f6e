//! Output adapters.
//!
//! Packaging only: every adapter wraps the serialized SVG of an artwork and
//! never alters it.
//!
//! - [`ArtworkBlob`]: bytes plus filename and mime type for download flows.
//! - [`DisplayReference`]: an ephemeral `blob:` handle registered in a
//!   [`ReferenceRegistry`], revoked when the handle is dropped.
//! - [`data_url`]: a self-contained `data:` URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::hashing::sha256_hex;
use crate::scene::GeneratedArtwork;
use crate::text::{download_filename, DEFAULT_DOWNLOAD_FILENAME};

pub const SVG_MIME: &str = "image/svg+xml";

const REFERENCE_SCHEME: &str = "blob:quoteart/";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloadable artwork file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkBlob {
    filename: String,
    bytes: Vec<u8>,
}

impl ArtworkBlob {
    pub fn new(artwork: &GeneratedArtwork, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bytes: artwork.to_svg().into_bytes(),
        }
    }

    /// Blob named after the author, e.g. `quote-nft-walt-disney.svg`.
    pub fn for_author(artwork: &GeneratedArtwork, author: &str) -> Self {
        Self::new(artwork, download_filename(author))
    }

    pub fn with_default_name(artwork: &GeneratedArtwork) -> Self {
        Self::new(artwork, DEFAULT_DOWNLOAD_FILENAME)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime(&self) -> &'static str {
        SVG_MIME
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_hash(&self) -> String {
        sha256_hex(&self.bytes)
    }

    /// Write the blob into `dir` under its filename and return the path.
    ///
    /// The filename must be a bare name; separators and `..` are refused so a
    /// label can never steer the write outside `dir`.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let name = Path::new(&self.filename);
        let bare = name.file_name().map(|f| f == name.as_os_str()).unwrap_or(false);
        if self.filename.is_empty() || !bare || self.filename == ".." {
            return Err(ExportError::InvalidFilename(self.filename.clone()));
        }

        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=artwork_saved module=export bytes={} path={}",
            self.bytes.len(),
            path.display()
        );
        Ok(path)
    }
}

/// `data:image/svg+xml;base64,...` for inline embedding.
pub fn data_url(svg: &str) -> String {
    format!("data:{};base64,{}", SVG_MIME, STANDARD.encode(svg.as_bytes()))
}

/// Store of live ephemeral references.
///
/// Stands in for the host's object-URL table: each entry keeps its bytes
/// alive until revoked. Shared between threads by reference.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    live: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the artwork's SVG and hand back a scoped reference.
    pub fn create(&self, artwork: &GeneratedArtwork) -> DisplayReference<'_> {
        let url = format!("{}{}", REFERENCE_SCHEME, Uuid::new_v4());
        let bytes: Arc<[u8]> = Arc::from(artwork.to_svg().into_bytes());
        self.live.lock().insert(url.clone(), bytes);
        debug!("event=reference_created module=export url={}", url);
        DisplayReference {
            registry: self,
            url,
            released: false,
        }
    }

    /// Bytes behind a live reference.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.live.lock().get(url).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    fn revoke(&self, url: &str) -> bool {
        let removed = self.live.lock().remove(url).is_some();
        if removed {
            debug!("event=reference_revoked module=export url={}", url);
        }
        removed
    }
}

/// Ephemeral handle to rendered output. Revoked on drop.
#[derive(Debug)]
pub struct DisplayReference<'a> {
    registry: &'a ReferenceRegistry,
    url: String,
    released: bool,
}

impl DisplayReference<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Release now rather than at end of scope.
    pub fn release(mut self) {
        self.revoke();
    }

    fn revoke(&mut self) {
        if !self.released {
            self.registry.revoke(&self.url);
            self.released = true;
        }
    }
}

impl Drop for DisplayReference<'_> {
    fn drop(&mut self) {
        self.revoke();
    }
}

/// Generate, register, and hand the reference URL to `f`; the reference is
/// revoked when `f` returns, on every path.
pub fn with_display_reference<R>(
    registry: &ReferenceRegistry,
    quote: &str,
    author: &str,
    f: impl FnOnce(&str) -> R,
) -> R {
    let artwork = GeneratedArtwork::generate(quote, author);
    let reference = registry.create(&artwork);
    f(reference.url())
}
