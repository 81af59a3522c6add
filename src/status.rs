// System status display — shows the store location and claimed link counts.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::RegistryStore;

/// Display system status to the terminal.
///
/// `store_display` is the SQLite path or a redacted PostgreSQL URL;
/// file size is only shown when it names a file on disk.
pub async fn show(store: &Arc<dyn RegistryStore>, store_display: &str) -> Result<()> {
    match std::fs::metadata(Path::new(store_display)) {
        Ok(meta) => println!("Database: {} ({})", store_display, format_bytes(meta.len())),
        Err(_) => println!("Database: {}", store_display),
    }

    let counts = store.record_counts().await?;
    println!("Claimed links: {} total", counts.total());
    println!("  twitter:  {}", counts.twitter);
    println!("  telegram: {}", counts.telegram);
    println!("  website:  {}", counts.website);

    if counts.total() == 0 {
        println!("\nNo links claimed yet. Submit a token with `socialguard check` or POST /verify-socials.");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
