use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use chase_core::SessionConfig;

/// Reads a session description from a TOML file.
pub(crate) fn load(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid session file {}", path.display()))
}

/// Parses a session description, filling omitted fields with the defaults.
pub(crate) fn parse(contents: &str) -> Result<SessionConfig> {
    let config: SessionConfig =
        toml::from_str(contents).context("failed to parse session toml contents")?;
    if config.layout.is_empty() {
        bail!("session layout must contain at least one row");
    }
    if config.timing.adversary_step_period == 0 {
        bail!("adversary_step_period must be at least 1");
    }
    Ok(config)
}
