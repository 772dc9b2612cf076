//! Effect boundary collaborators: the file sink and the document viewer.
//!
//! Structure:
//! - Constants: directory and file names
//! - Pure functions: path construction, viewer command selection
//! - Effect functions: write files, spawn the system viewer

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::types::ExportArtifact;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Subdirectory under the user cache/data dirs owned by this tool.
pub const APP_DIR: &str = "sensory-survey";

/// File name the preview document is written to before opening.
pub const PREVIEW_FILE: &str = "preview.html";

/// Log file name used in TUI mode.
pub const LOG_FILE: &str = "sensory-survey.log";

// ============================================================================
// PURE FUNCTIONS (Path Construction)
// ============================================================================

/// Where exported spreadsheets go when no directory is given:
/// the download dir, or the current directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Default log file location under the local data dir.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join(LOG_FILE)
}

/// Path the preview document is written to.
pub fn preview_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join(PREVIEW_FILE)
}

/// Target path for `filename` inside `dir`.
///
/// Only the final component of `filename` is used, so a crafted label
/// cannot escape `dir`.
pub fn artifact_path(dir: &Path, filename: &str) -> PathBuf {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "export.xlsx".into());
    dir.join(name)
}

/// Program and leading args that open a file with the system viewer.
pub fn viewer_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Write the artifact's bytes into `dir`, creating it if needed.
///
/// Returns the full path written. An existing file of the same name is
/// overwritten.
pub fn save_artifact(dir: &Path, artifact: &ExportArtifact) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = artifact_path(dir, &artifact.filename);
    fs::write(&path, &artifact.bytes)?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "export saved");
    Ok(path)
}

/// Write `html` to `path`, creating parent directories.
pub fn write_document(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}

/// Write `html` to the preview file and hand it to the system viewer.
///
/// Fire-and-forget: the viewer process is spawned, not awaited.
pub fn open_document(html: &str) -> io::Result<PathBuf> {
    let path = preview_path();
    write_document(&path, html)?;
    let (program, args) = viewer_command();
    debug!(program, path = %path.display(), "opening document");
    Command::new(program).args(args).arg(&path).spawn()?;
    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn artifact(name: &str) -> ExportArtifact {
        ExportArtifact {
            filename: name.to_string(),
            bytes: vec![1, 2, 3, 4],
            rows: 1,
        }
    }

    #[test]
    fn artifact_path_joins_filename() {
        let path = artifact_path(Path::new("/data"), "survey_2026-01-02.xlsx");
        assert_eq!(path, PathBuf::from("/data/survey_2026-01-02.xlsx"));
    }

    #[test]
    fn artifact_path_strips_directories() {
        let path = artifact_path(Path::new("/data"), "../../etc/x.xlsx");
        assert_eq!(path, PathBuf::from("/data/x.xlsx"));
    }

    #[test]
    fn save_artifact_writes_bytes() {
        let dir = tempdir().unwrap();
        let path = save_artifact(dir.path(), &artifact("a.xlsx")).unwrap();
        assert_eq!(path, dir.path().join("a.xlsx"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn save_artifact_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("exports").join("2026");
        let path = save_artifact(&nested, &artifact("b.xlsx")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_artifact_overwrites() {
        let dir = tempdir().unwrap();
        save_artifact(dir.path(), &artifact("c.xlsx")).unwrap();
        let second = ExportArtifact {
            bytes: vec![9],
            ..artifact("c.xlsx")
        };
        let path = save_artifact(dir.path(), &second).unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![9]);
    }

    #[test]
    fn write_document_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache").join(PREVIEW_FILE);
        write_document(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }

    #[test]
    fn preview_and_log_paths_live_under_app_dir() {
        assert!(preview_path().ends_with(Path::new(APP_DIR).join(PREVIEW_FILE)));
        assert!(default_log_path().ends_with(Path::new(APP_DIR).join(LOG_FILE)));
    }

    #[test]
    fn viewer_command_is_known() {
        let (program, _) = viewer_command();
        assert!(["open", "cmd", "xdg-open"].contains(&program));
    }
}
