//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists, creating it when missing.
pub fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    if data_dir.is_dir() {
        return Ok(());
    }
    if data_dir.exists() {
        warn!(data_dir = %data_dir.display(), "data path exists but is not a directory");
        return Err(anyhow::anyhow!("{} is not a directory", data_dir.display()));
    }
    std::fs::create_dir_all(data_dir).map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    info!(data_dir = %data_dir.display(), "created data directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_dir_and_rejects_files() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let nested = root.join("a").join("b");
        ensure_data_dir(&nested)?;
        assert!(nested.is_dir());
        ensure_data_dir(&nested)?;

        let file = root.join("plain.txt");
        std::fs::write(&file, "x")?;
        assert!(ensure_data_dir(&file).is_err());

        let _ = std::fs::remove_dir_all(&root);
        Ok(())
    }
}
