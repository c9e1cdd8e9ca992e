use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::error::{PinwallError, PinwallResult};

pub const PLACEHOLDER_SIZE: u32 = 100;
pub const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 0, 255];

/// Blocking byte fetch for http(s) image sources. A trait seam so the
/// resolver can be exercised in tests without touching the network.
pub trait RemoteFetch {
    fn fetch(&self, url: &str) -> PinwallResult<Vec<u8>>;
}

pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteFetch for HttpFetch {
    fn fetch(&self, url: &str) -> PinwallResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| PinwallError::http(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PinwallError::http(format!("GET {url}: status {status}")));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| PinwallError::http(format!("GET {url}: read body: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// The substitution outcome of a lenient resolve. `substituted` carries the
/// failure reason when the placeholder was used instead of the real source.
pub struct Resolved {
    pub image: RgbaImage,
    pub substituted: Option<String>,
}

pub struct SourceResolver {
    fetcher: Box<dyn RemoteFetch>,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(HttpFetch::new()))
    }

    pub fn with_fetcher(fetcher: Box<dyn RemoteFetch>) -> Self {
        Self { fetcher }
    }

    /// Resolve an element's `src` to a decoded RGBA raster.
    ///
    /// Ordered strategies, first success wins:
    /// 1. local candidates under `base_dir` (see [`local_candidates`]);
    /// 2. blocking fetch when `src` is an http(s) URL;
    /// 3. `src` opened directly as a local path.
    pub fn resolve(&self, src: &str, base_dir: Option<&Path>) -> PinwallResult<RgbaImage> {
        if let Some(base) = base_dir {
            for candidate in local_candidates(src, base) {
                if candidate.is_file() {
                    let img = image::open(&candidate)
                        .with_context(|| format!("decode '{}'", candidate.display()))?;
                    return Ok(img.to_rgba8());
                }
            }
        }

        if is_http_url(src) {
            let bytes = self.fetcher.fetch(src)?;
            let img = image::load_from_memory(&bytes)
                .with_context(|| format!("decode fetched image '{src}'"))?;
            return Ok(img.to_rgba8());
        }

        let img = image::open(Path::new(src)).with_context(|| format!("open image '{src}'"))?;
        Ok(img.to_rgba8())
    }

    /// Lenient resolve: any failure is logged and masked by the fixed red
    /// placeholder so one broken reference never aborts a whole render.
    pub fn resolve_or_placeholder(&self, src: &str, base_dir: Option<&Path>) -> Resolved {
        match self.resolve(src, base_dir) {
            Ok(image) => Resolved {
                image,
                substituted: None,
            },
            Err(err) => {
                tracing::warn!(src, error = %err, "image resolution failed, substituting placeholder");
                Resolved {
                    image: placeholder(),
                    substituted: Some(err.to_string()),
                }
            }
        }
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed fallback raster: fully opaque red, 100x100.
pub fn placeholder() -> RgbaImage {
    RgbaImage::from_pixel(
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        image::Rgba(PLACEHOLDER_RGBA),
    )
}

/// Local lookup candidates for `src` under `base`, in probe order.
///
/// Stored references routinely disagree with the actual folder layout, so in
/// addition to `src` as given we try its basename under `images/` and under
/// the base itself. When `src` is a URL the same two basename probes are
/// repeated with the URL's path component (query and fragment stripped).
pub fn local_candidates(src: &str, base: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![base.join(src)];

    if let Some(name) = basename(src) {
        candidates.push(base.join("images").join(name));
        candidates.push(base.join(name));
    }

    if is_http_url(src) {
        if let Some(name) = url::Url::parse(src).ok().and_then(|u| {
            basename(u.path()).map(str::to_owned)
        }) {
            candidates.push(base.join("images").join(&name));
            candidates.push(base.join(&name));
        }
    }

    candidates
}

fn basename(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|s| !s.is_empty())
}

fn is_http_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}
