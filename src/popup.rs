/// Popup actions, independent of the DOM.
///
/// The Yew component in `ui::popup` owns rendering and event wiring and
/// calls into `PopupController` for everything that touches the browser.
/// Writes are sent to the background worker so they outlive the popup.
use std::fmt;

use log::{debug, warn};
use url::Url;

use crate::config::ExtensionConfig;
use crate::error::{ExtensionError, Result};
use crate::host::{KeyValueStore, Messenger, ScriptInjector, TabQuery};
use crate::messages::{Message, Stats, StatsDelta};
use crate::settings::{PartialSettings, SettingKey, SettingsStore};

/// A blocking acknowledgment shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Notice {
            message: message.to_string(),
            is_error: false,
        }
    }

    pub fn error(message: &str) -> Self {
        Notice {
            message: message.to_string(),
            is_error: true,
        }
    }

    /// User-facing text for a failed action; `fallback` covers store and
    /// host failures that have no specific wording
    pub fn from_error(err: &ExtensionError, fallback: &str) -> Self {
        match err {
            ExtensionError::RestrictedPage(_) => Notice::error("Cannot capture Chrome system pages"),
            ExtensionError::InvalidUrl(input) if input.is_empty() => Notice::error("Enter URL"),
            ExtensionError::InvalidUrl(_) => Notice::error("Invalid URL"),
            ExtensionError::NoActiveTab => Notice::error("No active tab to capture"),
            _ => Notice::error(fallback),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_error { "❌" } else { "✅" };
        write!(f, "{} {}", marker, self.message)
    }
}

/// The user-editable part of the settings, as read from the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub auto_save: bool,
    pub notifications: bool,
    pub analytics: bool,
    pub quick_note: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        SettingsForm {
            auto_save: true,
            notifications: false,
            analytics: true,
            quick_note: String::new(),
        }
    }
}

impl From<SettingsForm> for PartialSettings {
    fn from(form: SettingsForm) -> Self {
        PartialSettings {
            auto_save: Some(form.auto_save),
            notifications: Some(form.notifications),
            analytics: Some(form.analytics),
            quick_note: Some(form.quick_note),
            ..Default::default()
        }
    }
}

/// Everything the popup renders from the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupView {
    pub form: SettingsForm,
    pub stats: Stats,
}

impl PopupView {
    /// Unset toggles fall back to the install defaults; a cleared store
    /// therefore shows auto-save and analytics on, notifications off
    pub fn from_stored(stored: PartialSettings) -> Self {
        PopupView {
            form: SettingsForm {
                auto_save: stored.auto_save != Some(false),
                notifications: stored.notifications == Some(true),
                analytics: stored.analytics != Some(false),
                quick_note: stored.quick_note.unwrap_or_default(),
            },
            stats: Stats {
                page_views: stored.page_views.unwrap_or(0),
                time_saved: stored.time_saved.unwrap_or(0),
            },
        }
    }
}

/// Ctrl+S / Cmd+S saves the note instead of the page
pub fn is_save_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
    (ctrl || meta) && key == "s"
}

/// Accept only absolute URLs
pub fn parse_absolute_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtensionError::InvalidUrl(String::new()));
    }
    Url::parse(trimmed).map_err(|e| ExtensionError::InvalidUrl(format!("{}: {}", trimmed, e)))
}

pub struct PopupController<S, T, I, M> {
    settings: SettingsStore<S>,
    tabs: T,
    injector: I,
    messenger: M,
    config: ExtensionConfig,
}

impl<S, T, I, M> PopupController<S, T, I, M>
where
    S: KeyValueStore,
    T: TabQuery,
    I: ScriptInjector,
    M: Messenger,
{
    pub fn new(store: S, tabs: T, injector: I, messenger: M, config: ExtensionConfig) -> Self {
        PopupController {
            settings: SettingsStore::new(store),
            tabs,
            injector,
            messenger,
            config,
        }
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub async fn load(&self) -> Result<PopupView> {
        let stored = self
            .settings
            .get(&[
                SettingKey::AutoSave,
                SettingKey::Notifications,
                SettingKey::Analytics,
                SettingKey::QuickNote,
                SettingKey::PageViews,
                SettingKey::TimeSaved,
            ])
            .await?;
        Ok(PopupView::from_stored(stored))
    }

    /// Opening the popup counts as one view and one unit of time saved.
    /// The form loads even when the count fails; that failure comes back
    /// alongside the view.
    pub async fn open(&self) -> Result<(PopupView, Option<ExtensionError>)> {
        let mut view = self.load().await?;
        match self.record_view().await {
            Ok(stats) => {
                view.stats = stats;
                Ok((view, None))
            }
            Err(e) => {
                warn!("Could not count popup view: {}", e);
                Ok((view, Some(e)))
            }
        }
    }

    pub async fn record_view(&self) -> Result<Stats> {
        let reply = self
            .messenger
            .send(Message::UpdateStats { data: StatsDelta::new(1, 1) })
            .await?;
        Ok(serde_json::from_value(reply)?)
    }

    pub async fn save_settings(&self, form: SettingsForm) -> Result<Notice> {
        self.messenger.send(Message::SaveSettings { data: form.into() }).await?;
        Ok(Notice::success("Settings saved successfully!"))
    }

    pub async fn save_note(&self, form: SettingsForm) -> Result<Notice> {
        self.save_settings(form).await?;
        Ok(Notice::success("Note saved!"))
    }

    pub async fn capture_page(&self) -> Result<Notice> {
        let tab = self.tabs.active_tab().await?.ok_or(ExtensionError::NoActiveTab)?;

        let url = tab.url.as_deref().unwrap_or_default();
        if url.is_empty() || self.config.is_restricted(url) {
            warn!("Refusing to capture restricted page {:?}", url);
            return Err(ExtensionError::RestrictedPage(url.to_string()));
        }

        self.injector.inject_capture(tab.id).await?;
        debug!("Capture script injected into tab {}", tab.id);
        Ok(Notice::success("Page captured successfully!"))
    }

    /// Runs after the user confirmed; returns the reloaded form
    pub async fn clear_data(&self) -> Result<PopupView> {
        self.messenger.send(Message::ClearData).await?;
        self.load().await
    }

    pub async fn refresh(&self) -> Result<(Stats, Notice)> {
        let stats = self.record_view().await?;
        Ok((stats, Notice::success("All data refreshed!")))
    }

    /// Opens the URL as typed once it parses as absolute
    pub async fn process_url(&self, input: &str) -> Result<()> {
        parse_absolute_url(input)?;
        self.tabs.create_tab(input.trim()).await
    }

    pub async fn open_settings(&self) -> Result<()> {
        self.tabs.open_options_page().await
    }

    pub async fn open_help(&self) -> Result<()> {
        self.tabs.create_tab(&self.config.help_url).await
    }
}
