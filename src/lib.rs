/// Page Companion - Chrome Extension for quick notes, page capture and usage stats
/// Built with Rust + WASM + Yew

mod background;
mod chrome;
mod config;
mod debounce;
mod error;
mod host;
mod messages;
mod popup;
mod settings;
mod storage;
mod tab_data;
pub mod ui;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::background::{BackgroundController, InstallReason};
use crate::chrome::{to_js, BrowserClock, ChromeBadge, ChromeStorage};
use crate::config::ExtensionConfig;
use crate::error::ExtensionError;
use crate::messages::{Message, Reply};

type ChromeBackground = BackgroundController<ChromeStorage, ChromeStorage, ChromeBadge, BrowserClock>;

thread_local! {
    static BACKGROUND: RefCell<Option<Rc<ChromeBackground>>> = const { RefCell::new(None) };
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn load_config(value: JsValue) -> ExtensionConfig {
    ExtensionConfig::from_js(value).unwrap_or_else(|e| {
        warn!("Ignoring invalid config: {}", e);
        ExtensionConfig::default()
    })
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup(config: JsValue) {
    let props = ui::popup::AppProps {
        config: load_config(config),
    };
    yew::Renderer::<ui::popup::App>::with_props(props).render();
}

// Create the background controller for this service worker instance
#[wasm_bindgen]
pub fn start_background(config: JsValue) {
    let controller = new_background(load_config(config));
    BACKGROUND.with(|slot| *slot.borrow_mut() = Some(controller));
}

fn new_background(config: ExtensionConfig) -> Rc<ChromeBackground> {
    Rc::new(BackgroundController::new(
        ChromeStorage::sync(),
        ChromeStorage::local(),
        ChromeBadge,
        BrowserClock,
        config,
    ))
}

fn background() -> Rc<ChromeBackground> {
    BACKGROUND.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(|| new_background(ExtensionConfig::default()))
            .clone()
    })
}

/// Background failures have no user to report to: log and move on
fn log_failure(handler: &str, result: Result<(), ExtensionError>) -> Result<JsValue, JsValue> {
    if let Err(e) = result {
        error!("{} failed: {}", handler, e);
    }
    Ok(JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn handle_installed(reason: String) -> js_sys::Promise {
    let controller = background();
    future_to_promise(async move {
        let result = controller.on_installed(InstallReason::from(reason.as_str())).await;
        log_failure("onInstalled", result)
    })
}

/// Resolves with the reply envelope passed to `sendResponse`
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> js_sys::Promise {
    let controller = background();
    future_to_promise(async move {
        let result = match serde_wasm_bindgen::from_value::<Message>(message) {
            Ok(message) => controller.on_message(message).await,
            Err(e) => Err(ExtensionError::from(e)),
        };
        if let Err(e) = &result {
            error!("onMessage failed: {}", e);
        }

        to_js(&Reply::from(result)).map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

#[wasm_bindgen]
pub fn handle_tab_updated(tab_id: i32, status: Option<String>, url: Option<String>) -> js_sys::Promise {
    let controller = background();
    future_to_promise(async move {
        let result = controller
            .on_tab_updated(tab_id, status.as_deref(), url.as_deref())
            .await
            .map(|_| ());
        log_failure("tabs.onUpdated", result)
    })
}

#[wasm_bindgen]
pub fn handle_startup() -> js_sys::Promise {
    let controller = background();
    future_to_promise(async move {
        let result = controller.on_startup().await.map(|_| ());
        log_failure("onStartup", result)
    })
}

#[wasm_bindgen]
pub fn handle_suspend() {
    background().on_suspend();
}
