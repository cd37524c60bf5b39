use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{ClickTracker, ResourceStatus, StatusProvider};
use crate::error::{Result, WorkshopError};

/// Queries a running Tilt through its CLI (`tilt get ... -o json`)
#[derive(Debug, Clone)]
pub struct TiltCli {
    program: String,
    base_args: Vec<String>,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UiResourceStatus {
    runtime_status: String,
    update_status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UiResource {
    status: UiResourceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UiButtonStatus {
    last_clicked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UiButton {
    status: UiButtonStatus,
}

impl TiltCli {
    /// `command` is the CLI prefix, e.g. `tilt` or `tilt --port 10351`.
    /// Clicks older than `started_at` are ignored.
    pub fn new(command: &str, started_at: DateTime<Utc>) -> Result<Self> {
        let mut words = shell_words::split(command)
            .map_err(|e| WorkshopError::Command(format!("invalid tilt command {command:?}: {e}")))?;
        if words.is_empty() {
            return Err(WorkshopError::Command("Empty command".to_string()));
        }
        let program = words.remove(0);

        Ok(Self {
            program,
            base_args: words,
            started_at,
        })
    }

    async fn get_json(&self, kind: &str, name: &str) -> Result<Vec<u8>> {
        debug!("Running: {} {:?} get {} -o json {}", self.program, self.base_args, kind, name);

        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(["get", kind, "-o", "json", name])
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(WorkshopError::Command(if stderr.is_empty() {
                format!("tilt get {kind} exited with code {:?}", output.status.code())
            } else {
                stderr
            }))
        }
    }
}

fn parse_resource_status(json: &[u8]) -> Result<ResourceStatus> {
    let resource: UiResource = serde_json::from_slice(json)?;
    Ok(ResourceStatus::new(
        resource.status.runtime_status,
        resource.status.update_status,
    ))
}

fn parse_clicked_since(json: &[u8], started_at: DateTime<Utc>) -> Result<bool> {
    let button: UiButton = serde_json::from_slice(json)?;
    Ok(button
        .status
        .last_clicked_at
        .is_some_and(|clicked| clicked >= started_at))
}

#[async_trait]
impl StatusProvider for TiltCli {
    async fn resource_status(&self, name: &str) -> Result<ResourceStatus> {
        let json = self.get_json("uiresource", name).await?;
        parse_resource_status(&json)
    }
}

#[async_trait]
impl ClickTracker for TiltCli {
    async fn has_been_clicked(&self, button_id: &str) -> Result<bool> {
        let json = self.get_json("uibutton", button_id).await?;
        parse_clicked_since(&json, self.started_at)
    }
}
