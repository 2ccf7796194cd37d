use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{info, warn};

/// Reads a whole ROM file into memory
pub fn load(path: &Path) -> anyhow::Result<Vec<u8>> {
    let program =
        fs::read(path).with_context(|| format!("unable to read ROM {}", path.display()))?;

    if program.is_empty() {
        warn!("{} is empty", path.display());
    } else {
        info!("read {} bytes from {}", program.len(), path.display());
    }
    Ok(program)
}
