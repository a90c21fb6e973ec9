//! Workflow configuration file

use std::path::Path;

use vinflow_core::WorkflowConfig;

/// Read the TOML configuration at `path`, falling back to defaults when the
/// file does not exist
pub fn load(path: &Path) -> Result<WorkflowConfig, Box<dyn std::error::Error>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(WorkflowConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    let config: WorkflowConfig = toml::from_str(&text)
        .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
    Ok(config)
}
