use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::Database;

/// Returns the path to the leadzen database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/leadzen/leadzen.db`
/// - **Linux**: `~/.local/share/leadzen/leadzen.db`
/// - **Windows**: `%LOCALAPPDATA%\leadzen\leadzen.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("leadzen").join("leadzen.db"))
}

/// Open (creating if needed) and migrate the database at `db_path`
pub fn initialize_database_at(db_path: &Path) -> anyhow::Result<Arc<Database>> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(db_path)?;
    Ok(Arc::new(db))
}

pub fn initialize_database() -> anyhow::Result<Arc<Database>> {
    initialize_database_at(&get_db_path()?)
}
