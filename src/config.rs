use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::Result;
use crate::probe::DEFAULT_ENDPOINT;
use crate::workshop::RESOURCES;

const CONFIG_DIR: &str = "tilt-workshop";
const CONFIG_FILE: &str = "workshop.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkshopConfig {
    pub general: GeneralConfig,
    pub tilt: TiltConfig,
    pub endpoint: EndpointConfig,
    pub poll: PollConfig,
    /// Resources whose health gates progress, in display order
    pub resources: Vec<String>,
    /// Where to keep progress between runs (not persisted if unset)
    pub state_file: Option<PathBuf>,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            tilt: TiltConfig::default(),
            endpoint: EndpointConfig::default(),
            poll: PollConfig::default(),
            resources: RESOURCES.iter().map(|r| r.to_string()).collect(),
            state_file: None,
        }
    }
}

impl WorkshopConfig {
    /// `<config dir>/tilt-workshop/workshop.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => {
                info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WorkshopConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Simulate Tilt and the deployed app instead of talking to them
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Tilt Workshop".to_string(),
            dryrun: false,
        }
    }
}

/// Where button clicks come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickSource {
    /// UIButtons in the Tilt web UI. The Tiltfile has to declare the
    /// `workshop-*-advance` buttons; nothing here creates them.
    Tilt,
    /// Enter key in this terminal
    #[default]
    Keyboard,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Command prefix used to query Tilt, split like a shell would
    pub command: String,
    pub clicks: ClickSource,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            command: "tilt".to_string(),
            clicks: ClickSource::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 1000,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkshopConfig::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.general.title, "Tilt Workshop");
        assert_eq!(config.endpoint.url, "http://localhost:8080");
        assert_eq!(config.endpoint.timeout(), Duration::from_secs(1));
        assert_eq!(config.resources.len(), 7);
        assert_eq!(config.tilt.clicks, ClickSource::Keyboard);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
resources = ["frontend", "muxer"]
state_file = "/tmp/workshop.json"

[tilt]
command = "tilt --port 10351"
clicks = "tilt"

[poll]
interval_ms = 250
"#
        )
        .unwrap();

        let config = WorkshopConfig::load_from(file.path()).unwrap();
        assert_eq!(config.resources, vec!["frontend", "muxer"]);
        assert_eq!(config.tilt.command, "tilt --port 10351");
        assert_eq!(config.tilt.clicks, ClickSource::Tilt);
        assert_eq!(config.poll.interval(), Duration::from_millis(250));
        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/workshop.json")));
        assert!(!config.general.dryrun);
        assert_eq!(config.endpoint.timeout_ms, 1000);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tilt\ncommand = ").unwrap();
        assert!(WorkshopConfig::load_from(file.path()).is_err());
    }
}
