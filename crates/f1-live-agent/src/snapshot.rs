//! Page snapshots on disk.

use anyhow::{Context, Result};
use f1_live_core::Page;
use std::path::Path;

/// Write the page as a standalone HTML document.
///
/// The document is written next to `path` and renamed over it, so readers
/// never see a partial file.
///
/// # Errors
///
/// Returns error if the temporary file cannot be written or renamed.
pub async fn write_snapshot(path: &Path, page: &Page) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    tokio::fs::write(&tmp, page.to_html())
        .await
        .with_context(|| format!("Failed to write {}", Path::new(&tmp).display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::trace!(path = %path.display(), "Snapshot written");
    Ok(())
}
