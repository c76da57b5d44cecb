/// Captured-page log kept in chrome.storage.local

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::host::KeyValueStore;
use crate::tab_data::PageContent;

/// Storage key holding the whole list
pub const CAPTURED_PAGES_KEY: &str = "capturedPages";

/// One captured page, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPage {
    pub url: String,
    pub title: String,
    pub text: String,
    /// ISO-8601, stamped by the background worker
    pub timestamp: String,
}

impl CapturedPage {
    /// Stamp page content, truncating the text to `text_limit` characters
    pub fn new(content: PageContent, timestamp: String, text_limit: usize) -> Self {
        let text = match content.text.char_indices().nth(text_limit) {
            Some((cut, _)) => content.text[..cut].to_string(),
            None => content.text,
        };

        CapturedPage {
            url: content.url,
            title: content.title,
            text,
            timestamp,
        }
    }
}

/// Newest-first list with a fixed capacity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapturedPages {
    pub pages: Vec<CapturedPage>,
}

impl CapturedPages {
    pub fn new() -> Self {
        CapturedPages { pages: Vec::new() }
    }

    /// Insert at the head, evicting from the tail past `limit`
    pub fn push_front_capped(&mut self, page: CapturedPage, limit: usize) {
        self.pages.insert(0, page);
        self.pages.truncate(limit);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Accessor over the local partition.
///
/// `append` is a read-prepend-truncate-write sequence with no atomic
/// primitive underneath; callers serialize appends (the background
/// controller does so through its write gate).
pub struct CaptureLog<S> {
    store: S,
    limit: usize,
}

impl<S: KeyValueStore> CaptureLog<S> {
    pub fn new(store: S, limit: usize) -> Self {
        CaptureLog { store, limit }
    }

    pub async fn load(&self) -> Result<CapturedPages> {
        let mut map = self.store.get(&[CAPTURED_PAGES_KEY]).await?;
        match map.remove(CAPTURED_PAGES_KEY) {
            Some(Value::Null) | None => Ok(CapturedPages::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub async fn append(&self, page: CapturedPage) -> Result<usize> {
        let mut pages = self.load().await?;
        pages.push_front_capped(page, self.limit);

        let mut items = Map::new();
        items.insert(CAPTURED_PAGES_KEY.to_string(), serde_json::to_value(&pages)?);
        self.store.set(items).await?;

        Ok(pages.len())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
