use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::workshop::State;

/// Read saved progress. A missing file means no progress yet.
pub fn load_state(path: &Path) -> Result<Option<State>> {
    if !path.exists() {
        debug!("No saved state at {:?}", path);
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let state: State = serde_json::from_str(&content)?;
    info!("Resuming workshop at {:?} from {:?}", state.state_name.friendly_name(), path);
    Ok(Some(state))
}

/// Write progress next to `path` first, then move it into place.
pub fn save_state(path: &Path, state: &State) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
