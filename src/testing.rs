/// In-memory host capabilities for unit tests
use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::background::BackgroundController;
use crate::config::ExtensionConfig;
use crate::error::{ExtensionError, Result};
use crate::host::{BadgeSetter, Clock, KeyValueStore, Messenger, ScriptInjector, TabQuery};
use crate::messages::{Message, Reply};
use crate::tab_data::TabInfo;

#[derive(Default)]
struct MemoryState {
    items: Map<String, Value>,
    failure: Option<String>,
}

/// A store partition; clones share the same contents
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.state.borrow_mut().items.insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.state.borrow().items.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Make every later call reject
    pub fn fail_with(&self, reason: &str) {
        self.state.borrow_mut().failure = Some(reason.to_string());
    }

    fn check(&self) -> Result<()> {
        match &self.state.borrow().failure {
            Some(reason) => Err(ExtensionError::StoreUnavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        self.check()?;
        let state = self.state.borrow();
        Ok(keys
            .iter()
            .filter_map(|k| state.items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.check()?;
        self.state.borrow_mut().items.extend(items);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check()?;
        self.state.borrow_mut().items.clear();
        Ok(())
    }
}

#[derive(Default)]
struct TabsState {
    active: Option<TabInfo>,
    created: Vec<String>,
    options_opened: usize,
}

#[derive(Clone, Default)]
pub struct FakeTabs {
    state: Rc<RefCell<TabsState>>,
}

impl FakeTabs {
    pub fn new(active: Option<TabInfo>) -> Self {
        FakeTabs {
            state: Rc::new(RefCell::new(TabsState {
                active,
                ..Default::default()
            })),
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.state.borrow().created.clone()
    }

    pub fn options_opened(&self) -> usize {
        self.state.borrow().options_opened
    }
}

#[async_trait(?Send)]
impl TabQuery for FakeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>> {
        Ok(self.state.borrow().active.clone())
    }

    async fn create_tab(&self, url: &str) -> Result<()> {
        self.state.borrow_mut().created.push(url.to_string());
        Ok(())
    }

    async fn open_options_page(&self) -> Result<()> {
        self.state.borrow_mut().options_opened += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeInjector {
    injected: Rc<RefCell<Vec<i32>>>,
}

impl FakeInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn injected(&self) -> Vec<i32> {
        self.injected.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ScriptInjector for FakeInjector {
    async fn inject_capture(&self, tab_id: i32) -> Result<()> {
        self.injected.borrow_mut().push(tab_id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeBadge {
    calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl FakeBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<(String, String)> {
        self.calls.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl BadgeSetter for FakeBadge {
    async fn set_badge(&self, text: &str, color: &str) -> Result<()> {
        self.calls.borrow_mut().push((text.to_string(), color.to_string()));
        Ok(())
    }
}

pub struct FixedClock(String);

impl FixedClock {
    pub fn new(iso: &str) -> Self {
        FixedClock(iso.to_string())
    }
}

impl Clock for FixedClock {
    fn now_iso(&self) -> String {
        self.0.clone()
    }
}

/// Delivers popup messages to a real background controller, passing the
/// envelope and the reply through JSON like the runtime channel does
pub struct LoopbackMessenger {
    background: BackgroundController<MemoryStore, MemoryStore, FakeBadge, FixedClock>,
}

impl LoopbackMessenger {
    pub fn new(sync: MemoryStore, local: MemoryStore) -> Self {
        LoopbackMessenger {
            background: BackgroundController::new(
                sync,
                local,
                FakeBadge::new(),
                FixedClock::new("2024-10-28T10:30:00.000Z"),
                ExtensionConfig::default(),
            ),
        }
    }
}

#[async_trait(?Send)]
impl Messenger for LoopbackMessenger {
    async fn send(&self, message: Message) -> Result<Value> {
        let wire = serde_json::to_value(&message)?;
        let message: Message = serde_json::from_value(wire)?;

        let reply = Reply::from(self.background.on_message(message).await);
        let reply: Reply = serde_json::from_value(serde_json::to_value(reply)?)?;
        reply.into_result()
    }
}
