use crate::error::SetupError;
use std::path::{Path, PathBuf};

pub const LOG_FOLDER_NAME: &str = "Wizard_Log";

/// Resolve deployment folder (absolute path)
pub fn resolve_deployment_folder() -> PathBuf {
    // Prefer the folder where the binary is running from
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            return dir.to_path_buf();
        }
    }

    // Fallback: current working directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve log folder (absolute path)
///
/// Order: explicit `configured` folder, an existing `Wizard_Log/` found walking up from the CWD,
/// the per-user data dir, then next to the binary.
pub fn resolve_log_folder(configured: Option<&Path>) -> Result<PathBuf, SetupError> {
    if let Some(dir) = configured {
        return ensure_dir(dir.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(existing) = find_existing_log_folder(&cwd) {
            return Ok(existing);
        }
    }

    if let Some(data) = dirs::data_local_dir() {
        if let Ok(dir) = ensure_dir(data.join("blueprint-wizard").join("logs")) {
            return Ok(dir);
        }
    }

    ensure_dir(resolve_deployment_folder().join(LOG_FOLDER_NAME))
}

/// Walks up from `start` (at most 12 levels) looking for an existing `Wizard_Log/`.
pub fn find_existing_log_folder(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(12)
        .map(|dir| dir.join(LOG_FOLDER_NAME))
        .find(|candidate| candidate.is_dir())
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, SetupError> {
    std::fs::create_dir_all(&dir).map_err(|e| {
        SetupError::LogFolder(format!("Failed to create log folder {:?}: {}", dir, e))
    })?;
    Ok(dir)
}
