use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{ClickTracker, ResourceStatus, StatusProvider};
use crate::error::{Result, WorkshopError};

/// Lock for a write. A panic elsewhere poisons the lock but leaves the table
/// usable, so the write still lands.
fn lock_for_write<'a, T>(lock: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!("{} lock poisoned, writing anyway", what);
        poisoned.into_inner()
    })
}

/// Click tracker fed from the terminal UI instead of the Tilt web UI
#[derive(Debug, Default)]
pub struct LocalClicks {
    clicked: Mutex<HashSet<String>>,
}

impl LocalClicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self, button_id: &str) {
        info!("Button {} clicked from keyboard", button_id);
        lock_for_write(&self.clicked, "click tracker").insert(button_id.to_string());
    }
}

#[async_trait]
impl ClickTracker for LocalClicks {
    async fn has_been_clicked(&self, button_id: &str) -> Result<bool> {
        let clicked = self
            .clicked
            .lock()
            .map_err(|_| WorkshopError::Command("click tracker lock poisoned".to_string()))?;
        Ok(clicked.contains(button_id))
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Status(ResourceStatus),
    Error(String),
}

/// Status provider answering from a fixed table; anything not in the table
/// reports the default status. Used for dryrun.
#[derive(Debug)]
pub struct StaticStatus {
    default: ResourceStatus,
    overrides: Mutex<HashMap<String, Canned>>,
}

impl Default for StaticStatus {
    fn default() -> Self {
        Self::new(ResourceStatus::ok())
    }
}

impl StaticStatus {
    pub fn new(default: ResourceStatus) -> Self {
        Self {
            default,
            overrides: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, name: &str, status: ResourceStatus) {
        lock_for_write(&self.overrides, "status table")
            .insert(name.to_string(), Canned::Status(status));
    }

    pub fn fail(&self, name: &str, message: &str) {
        lock_for_write(&self.overrides, "status table")
            .insert(name.to_string(), Canned::Error(message.to_string()));
    }

    pub fn clear(&self, name: &str) {
        lock_for_write(&self.overrides, "status table").remove(name);
    }
}

#[async_trait]
impl StatusProvider for StaticStatus {
    async fn resource_status(&self, name: &str) -> Result<ResourceStatus> {
        debug!("Static status lookup for {}", name);
        let overrides = self
            .overrides
            .lock()
            .map_err(|_| WorkshopError::Command("status table lock poisoned".to_string()))?;
        match overrides.get(name) {
            Some(Canned::Status(status)) => Ok(status.clone()),
            Some(Canned::Error(message)) => Err(WorkshopError::Command(message.clone())),
            None => Ok(self.default.clone()),
        }
    }
}
