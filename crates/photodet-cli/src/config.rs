//! TOML loading of detector descriptions.
//!
//! Every field of [`DetectorConfig`] has a default, so a file only lists
//! what it changes:
//!
//! ```toml
//! check_overlaps = true
//!
//! [photocathode]
//! enabled = true
//!
//! [[extra_volumes]]
//! name = "Window"
//! material = "G4_PYREX_GLASS"
//! parent = "Envelope"
//! position = [0.0, 0.0, 89.0]
//! shape = { type = "Tube", rmax = 9.3, half_z = 1.0 }
//! ```

use anyhow::Context;
use photodet_core::DetectorConfig;

/// Load and parse a TOML detector description.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<DetectorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: DetectorConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}
