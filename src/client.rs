//! Document loaders: local folder exports and the remote board API.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::{
    error::{PinwallError, PinwallResult},
    model::Moodboard,
};

pub const DEFAULT_API_BASE: &str = "https://draggen.io/api/ext";

/// Load a moodboard from a local export folder.
///
/// The folder must contain a `.json` export; the first one in
/// directory-listing order is taken, no recursion. The folder becomes the
/// board's `base_path` so image lookups prefer local files.
pub fn load_local(folder: &Path) -> PinwallResult<Moodboard> {
    if !folder.is_dir() {
        return Err(PinwallError::not_found(format!(
            "folder not found: {}",
            folder.display()
        )));
    }

    let entries =
        std::fs::read_dir(folder).with_context(|| format!("list '{}'", folder.display()))?;
    let mut json_path = None;
    for entry in entries {
        let path = entry
            .with_context(|| format!("list '{}'", folder.display()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") && path.is_file() {
            json_path = Some(path);
            break;
        }
    }
    let json_path = json_path.ok_or_else(|| {
        PinwallError::not_found(format!("no .json file found in {}", folder.display()))
    })?;

    let file =
        File::open(&json_path).with_context(|| format!("open '{}'", json_path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PinwallError::parse(format!("parse '{}': {e}", json_path.display())))?;

    Moodboard::from_value(&value, Some(folder))
}

/// Blocking client for the remote board API.
pub struct BoardClient {
    api_key: Option<String>,
    api_base: String,
    http: reqwest::blocking::Client,
}

impl BoardClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_owned(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn api_key(&self) -> PinwallResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PinwallError::config("API key required for remote access"))
    }

    fn get_json(&self, url: &str) -> PinwallResult<Value> {
        let key = self.api_key()?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| PinwallError::http(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PinwallError::not_found(format!("GET {url}: 404")));
        }
        if !status.is_success() {
            return Err(PinwallError::http(format!("GET {url}: status {status}")));
        }
        resp.json()
            .map_err(|e| PinwallError::parse(format!("GET {url}: invalid JSON body: {e}")))
    }

    /// Fetch one board by id. The response body is normalized with no
    /// `base_path`, so every image reference resolves over the network.
    pub fn load_remote(&self, board_id: &str) -> PinwallResult<Moodboard> {
        let url = format!("{}/boards/{}", self.api_base, board_id);
        tracing::debug!(%url, "fetching remote moodboard");
        let value = self.get_json(&url)?;
        Moodboard::from_value(&value, None)
    }

    /// List boards available to this API key. Returns the `boards` array of
    /// the response, empty when absent.
    pub fn list_boards(&self) -> PinwallResult<Vec<Value>> {
        let value = self.get_json(&format!("{}/boards", self.api_base))?;
        Ok(value
            .get("boards")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
