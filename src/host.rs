/// Narrow capability interfaces over the browser host.
///
/// Controllers take these as type parameters so they can run against the
/// real `chrome.*` bindings (see `chrome.rs`) or against in-memory fakes.
/// Futures are `?Send`: every implementation lives on the single JS thread.
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::messages::Message;
use crate::tab_data::TabInfo;

/// One partition of the host key-value store
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// Fetch the given keys; absent keys are simply missing from the map
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;

    /// Merge the given items into the partition
    async fn set(&self, items: Map<String, Value>) -> Result<()>;

    /// Remove every key in the partition
    async fn clear(&self) -> Result<()>;
}

#[async_trait(?Send)]
pub trait TabQuery {
    /// The active tab of the current window, if any
    async fn active_tab(&self) -> Result<Option<TabInfo>>;

    async fn create_tab(&self, url: &str) -> Result<()>;

    async fn open_options_page(&self) -> Result<()>;
}

#[async_trait(?Send)]
pub trait ScriptInjector {
    /// Inject the page capture function into the tab. The page reports
    /// back through the messaging channel, not through this call.
    async fn inject_capture(&self, tab_id: i32) -> Result<()>;
}

#[async_trait(?Send)]
pub trait BadgeSetter {
    async fn set_badge(&self, text: &str, color: &str) -> Result<()>;
}

/// Sends envelopes to the background context
#[async_trait(?Send)]
pub trait Messenger {
    async fn send(&self, message: Message) -> Result<Value>;
}

pub trait Clock {
    /// Current time as an ISO-8601 string
    fn now_iso(&self) -> String;
}
