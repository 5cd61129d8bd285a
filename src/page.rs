use std::path::Path;

use anyhow::{Context, Result};
use focus_shield_dom::Document;
use tokio::fs;

/// Reads and parses an HTML file.
pub async fn read_document(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Document::parse_html(&source))
}

pub async fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, html)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
