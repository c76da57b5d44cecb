/// Host capabilities backed by the chrome.* extension APIs.
///
/// The JS side (`extension.js`) only forwards calls; all decisions are
/// made in Rust.
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;

use crate::error::{ExtensionError, Result};
use crate::host::{BadgeSetter, Clock, KeyValueStore, Messenger, ScriptInjector, TabQuery};
use crate::messages::{Message, Reply};
use crate::tab_data::TabInfo;

mod bridge {
    use wasm_bindgen::prelude::*;

    // Import JS bridge functions
    #[wasm_bindgen(module = "/extension.js")]
    extern "C" {
        #[wasm_bindgen(catch)]
        pub async fn storageGet(area: &str, keys: JsValue) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn storageSet(area: &str, items: JsValue) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn storageClear(area: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn queryActiveTab() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn createTab(url: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn openOptionsPage() -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn injectCapture(tab_id: i32) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn setBadge(text: &str, color: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;
    }
}

/// Convert to plain JS objects rather than `Map`s
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn host_error(e: JsValue) -> ExtensionError {
    ExtensionError::Host(format!("{:?}", e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Sync,
    Local,
}

impl StorageArea {
    fn as_str(self) -> &'static str {
        match self {
            StorageArea::Sync => "sync",
            StorageArea::Local => "local",
        }
    }
}

/// chrome.storage.sync or chrome.storage.local
#[derive(Debug, Clone, Copy)]
pub struct ChromeStorage {
    area: StorageArea,
}

impl ChromeStorage {
    pub fn sync() -> Self {
        ChromeStorage { area: StorageArea::Sync }
    }

    pub fn local() -> Self {
        ChromeStorage { area: StorageArea::Local }
    }

    fn unavailable(&self, e: JsValue) -> ExtensionError {
        ExtensionError::StoreUnavailable(format!("storage.{}: {:?}", self.area.as_str(), e))
    }
}

#[async_trait(?Send)]
impl KeyValueStore for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let result = bridge::storageGet(self.area.as_str(), to_js(&keys)?)
            .await
            .map_err(|e| self.unavailable(e))?;

        if result.is_null() || result.is_undefined() {
            return Ok(Map::new());
        }
        Ok(serde_wasm_bindgen::from_value(result)?)
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        bridge::storageSet(self.area.as_str(), to_js(&items)?)
            .await
            .map_err(|e| self.unavailable(e))
    }

    async fn clear(&self) -> Result<()> {
        bridge::storageClear(self.area.as_str()).await.map_err(|e| self.unavailable(e))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabQuery for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>> {
        let tab = bridge::queryActiveTab().await.map_err(host_error)?;
        if tab.is_null() || tab.is_undefined() {
            return Ok(None);
        }
        Ok(Some(serde_wasm_bindgen::from_value(tab)?))
    }

    async fn create_tab(&self, url: &str) -> Result<()> {
        bridge::createTab(url).await.map_err(host_error)
    }

    async fn open_options_page(&self) -> Result<()> {
        bridge::openOptionsPage().await.map_err(host_error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeScripting;

#[async_trait(?Send)]
impl ScriptInjector for ChromeScripting {
    async fn inject_capture(&self, tab_id: i32) -> Result<()> {
        bridge::injectCapture(tab_id).await.map_err(host_error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeBadge;

#[async_trait(?Send)]
impl BadgeSetter for ChromeBadge {
    async fn set_badge(&self, text: &str, color: &str) -> Result<()> {
        bridge::setBadge(text, color).await.map_err(host_error)
    }
}

/// chrome.runtime.sendMessage to the background worker
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeRuntime;

#[async_trait(?Send)]
impl Messenger for ChromeRuntime {
    async fn send(&self, message: Message) -> Result<Value> {
        let response = bridge::sendMessage(to_js(&message)?).await.map_err(host_error)?;
        if response.is_null() || response.is_undefined() {
            return Err(ExtensionError::Host("background worker sent no response".to_string()));
        }

        let reply: Reply = serde_wasm_bindgen::from_value(response)?;
        reply.into_result()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_iso(&self) -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }
}
