mod local;
mod tilt;

pub use local::{LocalClicks, StaticStatus};
pub use tilt::TiltCli;

use async_trait::async_trait;

use crate::error::Result;

/// Status dimensions reported for a tracked resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    pub runtime_status: String,
    pub update_status: String,
}

impl ResourceStatus {
    pub fn new(runtime_status: impl Into<String>, update_status: impl Into<String>) -> Self {
        Self {
            runtime_status: runtime_status.into(),
            update_status: update_status.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new("ok", "ok")
    }
}

/// Reports the health of named resources
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn resource_status(&self, name: &str) -> Result<ResourceStatus>;
}

/// Reports whether a button was clicked since the workshop started
#[async_trait]
pub trait ClickTracker: Send + Sync {
    async fn has_been_clicked(&self, button_id: &str) -> Result<bool>;
}
