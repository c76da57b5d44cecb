/// Background service worker logic.
///
/// Holds no state across suspensions: every handler re-reads the store.
/// All read-modify-write sequences run behind one async write gate, so
/// overlapping events within the worker cannot lose an update. The popup
/// routes its writes here for the same reason.
use futures_util::lock::Mutex;
use log::{debug, info};
use serde_json::Value;

use crate::config::{ClearScope, ExtensionConfig};
use crate::error::Result;
use crate::host::{BadgeSetter, Clock, KeyValueStore};
use crate::messages::{Message, Stats, StatsDelta};
use crate::settings::{PartialSettings, SettingKey, SettingsStore};
use crate::storage::{CaptureLog, CapturedPage};
use crate::tab_data::PageContent;

/// `runtime.onInstalled` reasons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
    Other(String),
}

impl From<&str> for InstallReason {
    fn from(reason: &str) -> Self {
        match reason {
            "install" => InstallReason::Install,
            "update" => InstallReason::Update,
            "chrome_update" => InstallReason::ChromeUpdate,
            "shared_module_update" => InstallReason::SharedModuleUpdate,
            other => InstallReason::Other(other.to_string()),
        }
    }
}

pub struct BackgroundController<Synced, Local, Badge, Time> {
    settings: SettingsStore<Synced>,
    captures: CaptureLog<Local>,
    badge: Badge,
    clock: Time,
    config: ExtensionConfig,
    writes: Mutex<()>,
}

impl<Synced, Local, Badge, Time> BackgroundController<Synced, Local, Badge, Time>
where
    Synced: KeyValueStore,
    Local: KeyValueStore,
    Badge: BadgeSetter,
    Time: Clock,
{
    pub fn new(sync: Synced, local: Local, badge: Badge, clock: Time, config: ExtensionConfig) -> Self {
        BackgroundController {
            settings: SettingsStore::new(sync),
            captures: CaptureLog::new(local, config.capture_limit),
            badge,
            clock,
            config,
            writes: Mutex::new(()),
        }
    }

    /// Seeds defaults on a fresh install only; updates keep user values
    pub async fn on_installed(&self, reason: InstallReason) -> Result<()> {
        info!("Extension installed: {:?}", reason);
        if reason != InstallReason::Install {
            return Ok(());
        }

        let _gate = self.writes.lock().await;
        self.settings.seed_defaults().await?;
        info!("Default settings initialized");
        Ok(())
    }

    /// Dispatch one envelope; the returned value is the response payload
    pub async fn on_message(&self, message: Message) -> Result<Value> {
        debug!("Background received message: {:?}", message);

        match message {
            Message::UpdateStats { data } => {
                let stats = self.update_stats(data).await?;
                Ok(serde_json::to_value(stats)?)
            }
            Message::CapturePage { data } => {
                self.capture_page(data).await?;
                Ok(Value::Null)
            }
            Message::GetData { key } => Ok(self.settings.get_raw(&key).await?.unwrap_or(Value::Null)),
            Message::SaveSettings { data } => {
                self.save_settings(data).await?;
                Ok(Value::Null)
            }
            Message::ClearData => {
                self.clear_data().await?;
                Ok(Value::Null)
            }
        }
    }

    pub async fn update_stats(&self, delta: StatsDelta) -> Result<Stats> {
        let _gate = self.writes.lock().await;

        let stats = self.settings.stats().await?.apply(delta);
        self.settings
            .set(PartialSettings {
                page_views: Some(stats.page_views),
                time_saved: Some(stats.time_saved),
                ..Default::default()
            })
            .await?;

        Ok(stats)
    }

    pub async fn capture_page(&self, content: PageContent) -> Result<()> {
        let page = CapturedPage::new(content, self.clock.now_iso(), self.config.capture_text_limit);

        let _gate = self.writes.lock().await;
        let count = self.captures.append(page).await?;
        debug!("Captured page stored ({} in log)", count);
        Ok(())
    }

    pub async fn save_settings(&self, patch: PartialSettings) -> Result<()> {
        let _gate = self.writes.lock().await;
        self.settings.set(patch).await
    }

    pub async fn clear_data(&self) -> Result<()> {
        let _gate = self.writes.lock().await;

        self.settings.clear().await?;
        if self.config.clear_scope == ClearScope::SettingsAndCaptures {
            self.captures.clear().await?;
        }
        if self.config.reseed_after_clear {
            self.settings.seed_defaults().await?;
        }

        info!("Cleared stored data ({:?})", self.config.clear_scope);
        Ok(())
    }

    /// Counts a completed navigation; returns the new view count when counted
    pub async fn on_tab_updated(&self, tab_id: i32, status: Option<&str>, url: Option<&str>) -> Result<Option<u64>> {
        let has_url = url.is_some_and(|u| !u.is_empty());
        if status != Some("complete") || !has_url {
            return Ok(None);
        }

        let _gate = self.writes.lock().await;

        let current = self
            .settings
            .get(&[SettingKey::Analytics, SettingKey::PageViews, SettingKey::ShowBadge])
            .await?;
        if current.analytics != Some(true) {
            return Ok(None);
        }

        let views = current.page_views.unwrap_or(0).saturating_add(1);
        self.settings
            .set(PartialSettings {
                page_views: Some(views),
                ..Default::default()
            })
            .await?;
        debug!("Tab {} loaded, page views now {}", tab_id, views);

        if current.show_badge == Some(true) {
            self.badge.set_badge(&views.to_string(), &self.config.badge_color).await?;
        }

        Ok(Some(views))
    }

    /// Returns true when the synced partition was cleared
    pub async fn on_startup(&self) -> Result<bool> {
        let _gate = self.writes.lock().await;

        let current = self.settings.get(&[SettingKey::ClearOnExit]).await?;
        if current.clear_on_exit == Some(true) {
            self.settings.clear().await?;
            info!("Settings cleared on startup (clearOnExit)");
            return Ok(true);
        }
        Ok(false)
    }

    pub fn on_suspend(&self) {
        info!("Service worker suspended");
    }
}
