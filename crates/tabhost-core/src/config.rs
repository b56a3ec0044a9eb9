use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Controller behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Prevent a window close while it holds a loaded pinned tab and request
    /// the close again once that tab has left, instead of hiding the window
    pub defer_close_for_pinned: bool,
    /// Destroy placeholders that have been replaced out of their slot
    pub reap_orphaned_placeholders: bool,
    /// Upper bound on notification/task pump iterations per `run_until_idle`
    pub max_dispatch_rounds: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            defer_close_for_pinned: false,
            reap_orphaned_placeholders: true,
            max_dispatch_rounds: 1024,
        }
    }
}

impl ControllerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading controller config from: {}", path.display());

        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
